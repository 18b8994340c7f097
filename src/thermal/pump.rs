//! 펌프 전양정(TDH)과 소요 동력, IEC 표준 모터 선정.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, ValidationReport};
use crate::units::{bar_to_head, ton_hr_to_m3_s, GRAVITY_M_S2};

/// IEC 표준 모터 출력 [kW], 오름차순
pub const IEC_MOTOR_SIZES_KW: [f64; 30] = [
    0.37, 0.55, 0.75, 1.1, 1.5, 2.2, 3.0, 4.0, 5.5, 7.5, 11.0, 15.0, 18.5, 22.0, 30.0, 37.0, 45.0,
    55.0, 75.0, 90.0, 110.0, 132.0, 160.0, 200.0, 250.0, 315.0, 355.0, 400.0, 450.0, 500.0,
];

pub const DEFAULT_PUMP_EFFICIENCY: f64 = 0.70;
pub const DEFAULT_MOTOR_EFFICIENCY: f64 = 0.95;

fn default_pump_efficiency() -> f64 {
    DEFAULT_PUMP_EFFICIENCY
}
fn default_motor_efficiency() -> f64 {
    DEFAULT_MOTOR_EFFICIENCY
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpInput {
    pub flow_rate_ton_hr: f64,
    pub density_kg_m3: f64,
    /// 토출 액면 - 흡입 액면 [m]
    pub static_head_m: f64,
    /// 흡입 용기 압력 [bar abs]
    pub suction_pressure_bar: f64,
    /// 토출 용기 압력 [bar abs]
    pub discharge_pressure_bar: f64,
    #[serde(default)]
    pub suction_friction_head_m: f64,
    #[serde(default)]
    pub discharge_friction_head_m: f64,
    #[serde(default = "default_pump_efficiency")]
    pub pump_efficiency: f64,
    #[serde(default = "default_motor_efficiency")]
    pub motor_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpResult {
    pub volumetric_flow_m3_h: f64,
    pub pressure_head_m: f64,
    pub friction_head_m: f64,
    pub total_differential_head_m: f64,
    pub hydraulic_power_kw: f64,
    pub brake_power_kw: f64,
    pub motor_power_kw: f64,
    /// 선정된 IEC 모터 [kW]
    pub motor_rating_kw: f64,
    pub warnings: Vec<String>,
}

/// 소요 동력 이상인 가장 작은 IEC 모터. 모두 작으면 최대 규격.
pub fn select_motor_kw(required_kw: f64) -> f64 {
    IEC_MOTOR_SIZES_KW
        .iter()
        .copied()
        .find(|&size| size >= required_kw)
        .unwrap_or(IEC_MOTOR_SIZES_KW[IEC_MOTOR_SIZES_KW.len() - 1])
}

pub fn validate_pump(input: &PumpInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.flow_rate_ton_hr <= 0.0 {
        report.error("Flow rate must be greater than 0 ton/hr");
    }
    if input.density_kg_m3 <= 0.0 {
        report.error("Density must be greater than 0 kg/m³");
    }
    if input.suction_pressure_bar < 0.0 || input.discharge_pressure_bar < 0.0 {
        report.error("Absolute pressures cannot be negative");
    }
    if input.suction_friction_head_m < 0.0 || input.discharge_friction_head_m < 0.0 {
        report.error("Friction heads cannot be negative");
    }
    for (name, eta) in [
        ("Pump efficiency", input.pump_efficiency),
        ("Motor efficiency", input.motor_efficiency),
    ] {
        if !(eta > 0.0 && eta <= 1.0) {
            report.error(format!("{name} must be within (0, 1], got {eta}"));
        }
    }
    report
}

pub fn calculate_pump(input: &PumpInput) -> Result<PumpResult, CalcError> {
    let mut warnings = validate_pump(input).into_result()?;

    let rho = input.density_kg_m3;
    let pressure_head_m =
        bar_to_head(input.discharge_pressure_bar, rho) - bar_to_head(input.suction_pressure_bar, rho);
    let friction_head_m = input.suction_friction_head_m + input.discharge_friction_head_m;
    let tdh = input.static_head_m + pressure_head_m + friction_head_m;
    if tdh < 0.0 {
        warnings.push(format!(
            "Negative TDH ({tdh:.2} m): gravity flow may suffice without a pump"
        ));
    }

    let q_m3_s = ton_hr_to_m3_s(input.flow_rate_ton_hr, rho);
    let hydraulic_power_kw = rho * GRAVITY_M_S2 * q_m3_s * tdh / 1000.0;
    let brake_power_kw = hydraulic_power_kw / input.pump_efficiency;
    let motor_power_kw = brake_power_kw / input.motor_efficiency;
    let motor_rating_kw = select_motor_kw(motor_power_kw);
    if motor_power_kw > motor_rating_kw {
        warnings.push(format!(
            "Required motor power {motor_power_kw:.1} kW exceeds the largest standard size {motor_rating_kw} kW"
        ));
    }

    Ok(PumpResult {
        volumetric_flow_m3_h: q_m3_s * 3600.0,
        pressure_head_m,
        friction_head_m,
        total_differential_head_m: tdh,
        hydraulic_power_kw,
        brake_power_kw,
        motor_power_kw,
        motor_rating_kw,
        warnings,
    })
}
