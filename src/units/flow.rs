use serde::{Deserialize, Serialize};

/// 질량 유량 단위. 내부 기준은 kg/s이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassFlowUnit {
    /// ton/hr (= 1000 kg/h)
    #[default]
    TonPerHour,
    KgPerSecond,
    KgPerHour,
}

impl MassFlowUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            MassFlowUnit::TonPerHour => "ton/hr",
            MassFlowUnit::KgPerSecond => "kg/s",
            MassFlowUnit::KgPerHour => "kg/h",
        }
    }
}

fn to_kg_s(value: f64, unit: MassFlowUnit) -> f64 {
    match unit {
        MassFlowUnit::TonPerHour => value / 3.6,
        MassFlowUnit::KgPerSecond => value,
        MassFlowUnit::KgPerHour => value / 3600.0,
    }
}

fn from_kg_s(value: f64, unit: MassFlowUnit) -> f64 {
    match unit {
        MassFlowUnit::TonPerHour => value * 3.6,
        MassFlowUnit::KgPerSecond => value,
        MassFlowUnit::KgPerHour => value * 3600.0,
    }
}

/// 질량 유량을 변환한다.
pub fn convert_mass_flow(value: f64, from: MassFlowUnit, to: MassFlowUnit) -> f64 {
    from_kg_s(to_kg_s(value, from), to)
}

/// ton/hr → kg/s
pub fn ton_hr_to_kg_s(ton_hr: f64) -> f64 {
    to_kg_s(ton_hr, MassFlowUnit::TonPerHour)
}

/// kg/s → ton/hr
pub fn kg_s_to_ton_hr(kg_s: f64) -> f64 {
    from_kg_s(kg_s, MassFlowUnit::TonPerHour)
}

/// 질량 유량(kg/s)과 밀도(kg/m³)로 체적 유량(m³/s)을 구한다.
pub fn mass_to_volumetric_flow(kg_s: f64, density_kg_m3: f64) -> f64 {
    kg_s / density_kg_m3
}

/// ton/hr → m³/s
pub fn ton_hr_to_m3_s(ton_hr: f64, density_kg_m3: f64) -> f64 {
    mass_to_volumetric_flow(ton_hr_to_kg_s(ton_hr), density_kg_m3)
}
