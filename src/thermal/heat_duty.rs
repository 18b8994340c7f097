use serde::{Deserialize, Serialize};

use crate::error::{CalcError, ValidationReport};
use crate::properties::PropertyProvider;
use crate::units::ton_hr_to_kg_s;

/// 열량 계산 방식.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeatDutyInput {
    /// 현열: Q = ṁ·Cp·ΔT. Cp는 입출구 평균온도에서 평가한다.
    Sensible {
        mass_flow_ton_hr: f64,
        inlet_temperature_c: f64,
        outlet_temperature_c: f64,
        /// 0이면 순수
        #[serde(default)]
        salinity_ppm: f64,
    },
    /// 잠열: Q = ṁ·h_fg
    Latent {
        mass_flow_ton_hr: f64,
        saturation_temperature_c: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatDutyResult {
    /// 열량 [kW]. 가열이면 양수, 냉각이면 음수
    pub heat_duty_kw: f64,
    pub mass_flow_kg_s: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_heat_kj_kgk: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latent_heat_kj_kg: Option<f64>,
}

pub fn validate_heat_duty(input: &HeatDutyInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    match *input {
        HeatDutyInput::Sensible {
            mass_flow_ton_hr,
            salinity_ppm,
            ..
        } => {
            if mass_flow_ton_hr <= 0.0 {
                report.error("Mass flow must be greater than 0 ton/hr");
            }
            if salinity_ppm < 0.0 {
                report.error("Salinity cannot be negative");
            }
        }
        HeatDutyInput::Latent {
            mass_flow_ton_hr, ..
        } => {
            if mass_flow_ton_hr <= 0.0 {
                report.error("Mass flow must be greater than 0 ton/hr");
            }
        }
    }
    report
}

pub fn calculate_heat_duty(
    input: &HeatDutyInput,
    props: &dyn PropertyProvider,
) -> Result<HeatDutyResult, CalcError> {
    validate_heat_duty(input).into_result()?;
    match *input {
        HeatDutyInput::Sensible {
            mass_flow_ton_hr,
            inlet_temperature_c,
            outlet_temperature_c,
            salinity_ppm,
        } => {
            let mass_flow_kg_s = ton_hr_to_kg_s(mass_flow_ton_hr);
            let mean = 0.5 * (inlet_temperature_c + outlet_temperature_c);
            let cp = props.seawater_specific_heat(salinity_ppm, mean)?;
            Ok(HeatDutyResult {
                heat_duty_kw: mass_flow_kg_s * cp * (outlet_temperature_c - inlet_temperature_c),
                mass_flow_kg_s,
                mean_temperature_c: Some(mean),
                specific_heat_kj_kgk: Some(cp),
                latent_heat_kj_kg: None,
            })
        }
        HeatDutyInput::Latent {
            mass_flow_ton_hr,
            saturation_temperature_c,
        } => {
            let mass_flow_kg_s = ton_hr_to_kg_s(mass_flow_ton_hr);
            let h_fg = props.latent_heat(saturation_temperature_c)?;
            Ok(HeatDutyResult {
                heat_duty_kw: mass_flow_kg_s * h_fg,
                mass_flow_kg_s,
                mean_temperature_c: None,
                specific_heat_kj_kgk: None,
                latent_heat_kj_kg: Some(h_fg),
            })
        }
    }
}
