use serde::{Deserialize, Serialize};

use crate::error::{CalcError, ValidationReport};
use crate::properties::{FluidState, PropertyProvider};
use crate::units::{kg_s_to_ton_hr, ton_hr_to_kg_s};

/// 목표 온도가 포화온도에 이만큼 가까우면 습증기 위험 경고 [°C]
const SATURATION_APPROACH_C: f64 = 3.0;

/// 분무식 과열저감기 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesuperheatInput {
    pub steam_flow_ton_hr: f64,
    pub steam_pressure_bar: f64,
    pub inlet_temperature_c: f64,
    pub target_temperature_c: f64,
    pub spray_water_temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesuperheatResult {
    pub saturation_temperature_c: f64,
    pub inlet_enthalpy_kj_kg: f64,
    pub outlet_enthalpy_kj_kg: f64,
    pub spray_water_enthalpy_kj_kg: f64,
    pub spray_water_ton_hr: f64,
    pub outlet_steam_ton_hr: f64,
    pub heat_removed_kw: f64,
    pub warnings: Vec<String>,
}

pub fn validate_desuperheat(
    input: &DesuperheatInput,
    props: &dyn PropertyProvider,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.steam_flow_ton_hr <= 0.0 {
        report.error("Steam flow must be greater than 0 ton/hr");
    }
    if input.steam_pressure_bar <= 0.0 {
        report.error("Steam pressure must be greater than 0 bar(a)");
        return report;
    }
    let t_sat = match props.saturation_temperature(input.steam_pressure_bar) {
        Ok(t) => t,
        Err(e) => {
            report.error(format!("Steam pressure: {e}"));
            return report;
        }
    };
    match props.is_superheated(input.steam_pressure_bar, input.inlet_temperature_c) {
        Ok(true) => {}
        Ok(false) => report.error(format!(
            "Inlet steam must be superheated (inlet {:.1} °C <= saturation {t_sat:.1} °C)",
            input.inlet_temperature_c
        )),
        Err(e) => report.error(format!("Inlet steam: {e}")),
    }
    if input.target_temperature_c < t_sat || input.target_temperature_c >= input.inlet_temperature_c
    {
        report.error(format!(
            "Target temperature must lie between saturation ({t_sat:.1} °C) and the inlet temperature"
        ));
    } else if input.target_temperature_c - t_sat < SATURATION_APPROACH_C {
        report.warn(format!(
            "Target temperature within {SATURATION_APPROACH_C} °C of saturation; downstream steam may carry moisture"
        ));
    }
    if input.spray_water_temperature_c >= t_sat {
        report.error(format!(
            "Spray water temperature must be below saturation ({t_sat:.1} °C)"
        ));
    }
    report
}

/// 에너지 수지로 분무수량을 구한다: ṁ_w = ṁ_s·(h_in - h_out)/(h_out - h_w)
pub fn calculate_desuperheat(
    input: &DesuperheatInput,
    props: &dyn PropertyProvider,
) -> Result<DesuperheatResult, CalcError> {
    let warnings = validate_desuperheat(input, props).into_result()?;

    let p = input.steam_pressure_bar;
    let t_sat = props.saturation_temperature(p)?;
    let h_in = FluidState::vapour(p, input.inlet_temperature_c, props)?.enthalpy(props)?;
    let h_out = FluidState::vapour(p, input.target_temperature_c, props)?.enthalpy(props)?;
    let h_w = props.enthalpy_liquid(input.spray_water_temperature_c)?;

    let steam_kg_s = ton_hr_to_kg_s(input.steam_flow_ton_hr);
    let spray_kg_s = steam_kg_s * (h_in - h_out) / (h_out - h_w);

    Ok(DesuperheatResult {
        saturation_temperature_c: t_sat,
        inlet_enthalpy_kj_kg: h_in,
        outlet_enthalpy_kj_kg: h_out,
        spray_water_enthalpy_kj_kg: h_w,
        spray_water_ton_hr: kg_s_to_ton_hr(spray_kg_s),
        outlet_steam_ton_hr: kg_s_to_ton_hr(steam_kg_s + spray_kg_s),
        heat_removed_kw: steam_kg_s * (h_in - h_out),
        warnings,
    })
}
