//! 비응축성 가스(NCG, 공기로 가정)와 수증기 포화 혼합물.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, ValidationReport};
use crate::properties::PropertyProvider;

pub const MOLAR_MASS_WATER: f64 = 18.015;
pub const MOLAR_MASS_AIR: f64 = 28.96;
/// 일반 기체상수 [J/kmol·K]
const UNIVERSAL_GAS_CONSTANT: f64 = 8314.462;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NcgInput {
    pub total_pressure_bar: f64,
    pub temperature_c: f64,
    /// 건공기 유량 [kg/h]
    pub dry_ncg_flow_kg_h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NcgResult {
    pub vapor_partial_pressure_bar: f64,
    pub ncg_partial_pressure_bar: f64,
    pub vapor_mole_fraction: f64,
    pub ncg_mole_fraction: f64,
    pub vapor_mass_fraction: f64,
    pub mixture_molar_mass_kg_kmol: f64,
    pub mixture_density_kg_m3: f64,
    /// NCG와 함께 배출되는 수증기 [kg/h]
    pub vapor_carried_kg_h: f64,
    pub total_mixture_kg_h: f64,
    pub volumetric_flow_m3_h: f64,
    pub warnings: Vec<String>,
}

pub fn validate_ncg(input: &NcgInput, props: &dyn PropertyProvider) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.total_pressure_bar <= 0.0 {
        report.error("Total pressure must be greater than 0 bar(a)");
        return report;
    }
    if input.dry_ncg_flow_kg_h < 0.0 {
        report.error("NCG flow cannot be negative");
    }
    match props.saturation_pressure(input.temperature_c) {
        Ok(pv) if pv >= input.total_pressure_bar => report.error(format!(
            "Water vapour pressure {pv:.4} bar(a) at {:.1} °C reaches the total pressure; no NCG partial pressure remains",
            input.temperature_c
        )),
        Ok(_) => {}
        Err(e) => report.error(format!("Temperature: {e}")),
    }
    report
}

pub fn calculate_ncg(input: &NcgInput, props: &dyn PropertyProvider) -> Result<NcgResult, CalcError> {
    let mut warnings = validate_ncg(input, props).into_result()?;

    let p = input.total_pressure_bar;
    let pv = props.saturation_pressure(input.temperature_c)?;
    let pa = p - pv;
    let y_v = pv / p;
    let y_a = pa / p;
    let molar_mass = y_v * MOLAR_MASS_WATER + y_a * MOLAR_MASS_AIR;
    let vapor_mass_fraction = y_v * MOLAR_MASS_WATER / molar_mass;
    let t_k = input.temperature_c + 273.15;
    let density = p * 1e5 * molar_mass / (UNIVERSAL_GAS_CONSTANT * t_k);

    let vapor_carried = input.dry_ncg_flow_kg_h * (pv / pa) * (MOLAR_MASS_WATER / MOLAR_MASS_AIR);
    let total = input.dry_ncg_flow_kg_h + vapor_carried;

    if y_v > 0.9 {
        warnings.push(format!(
            "Vapour mole fraction {y_v:.2} is high; subcool the vent stream to reduce vapour loss"
        ));
    }

    Ok(NcgResult {
        vapor_partial_pressure_bar: pv,
        ncg_partial_pressure_bar: pa,
        vapor_mole_fraction: y_v,
        ncg_mole_fraction: y_a,
        vapor_mass_fraction,
        mixture_molar_mass_kg_kmol: molar_mass,
        mixture_density_kg_m3: density,
        vapor_carried_kg_h: vapor_carried,
        total_mixture_kg_h: total,
        volumetric_flow_m3_h: total / density,
        warnings,
    })
}
