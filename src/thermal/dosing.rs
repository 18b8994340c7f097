use serde::{Deserialize, Serialize};

use crate::error::{CalcError, ValidationReport};

/// 정량 펌프 최소 토출 [L/h]. 이보다 작으면 희석을 권한다.
const MIN_METERING_FLOW_L_H: f64 = 0.1;

fn default_concentration_pct() -> f64 {
    100.0
}
fn default_solution_density() -> f64 {
    1.0
}

/// 약품(스케일 방지제 등) 주입량 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DosingInput {
    /// 처리 대상 유량 [m³/h]
    pub feed_flow_m3_h: f64,
    /// 주입 농도 [mg/L]
    pub dose_mg_l: f64,
    /// 원액 유효성분 농도 [wt%]
    #[serde(default = "default_concentration_pct")]
    pub product_concentration_pct: f64,
    /// 원액 밀도 [kg/L]
    #[serde(default = "default_solution_density")]
    pub solution_density_kg_l: f64,
    /// 저장 일수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosingResult {
    pub chemical_kg_h: f64,
    pub solution_kg_h: f64,
    pub solution_l_h: f64,
    pub daily_chemical_kg: f64,
    pub daily_solution_l: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_volume_m3: Option<f64>,
    pub warnings: Vec<String>,
}

pub fn validate_dosing(input: &DosingInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.feed_flow_m3_h <= 0.0 {
        report.error("Feed flow must be greater than 0 m³/h");
    }
    if input.dose_mg_l < 0.0 {
        report.error("Dose cannot be negative");
    }
    if !(input.product_concentration_pct > 0.0 && input.product_concentration_pct <= 100.0) {
        report.error("Product concentration must be within (0, 100] %");
    }
    if input.solution_density_kg_l <= 0.0 {
        report.error("Solution density must be greater than 0 kg/L");
    }
    if let Some(days) = input.storage_days {
        if days <= 0.0 {
            report.error("Storage days must be greater than 0");
        }
    }
    report
}

pub fn calculate_dosing(input: &DosingInput) -> Result<DosingResult, CalcError> {
    let mut warnings = validate_dosing(input).into_result()?;

    // m³/h × mg/L = g/h
    let chemical_kg_h = input.feed_flow_m3_h * input.dose_mg_l / 1000.0;
    let solution_kg_h = chemical_kg_h / (input.product_concentration_pct / 100.0);
    let solution_l_h = solution_kg_h / input.solution_density_kg_l;
    let daily_solution_l = solution_l_h * 24.0;

    if solution_l_h > 0.0 && solution_l_h < MIN_METERING_FLOW_L_H {
        warnings.push(format!(
            "Solution flow {solution_l_h:.3} L/h is below {MIN_METERING_FLOW_L_H} L/h; dilute the product for pump turndown"
        ));
    }

    Ok(DosingResult {
        chemical_kg_h,
        solution_kg_h,
        solution_l_h,
        daily_chemical_kg: chemical_kg_h * 24.0,
        daily_solution_l,
        storage_volume_m3: input.storage_days.map(|d| daily_solution_l * d / 1000.0),
        warnings,
    })
}
