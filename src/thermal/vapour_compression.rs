//! 기계식(MVC) / 열압축식(TVC) 증기 압축 계산.
//!
//! 토출 온도는 고정 압력에서 엔트로피·엔탈피가 온도에 대해 증가한다는 가정 하에
//! [`Bisection`]으로 구한다. 임계점 근처처럼 단조성이 깨지는 영역은 검사하지 않는다.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CalcError, ValidationReport};
use crate::properties::{FluidState, PropertyProvider};
use crate::solver::{Bisection, ENTHALPY_TOLERANCE_KJ_KG, ENTROPY_TOLERANCE_KJ_KGK};
use crate::units::ton_hr_to_kg_s;

/// 흡입 온도 미지정 시 포화온도에 더하는 과열도 [°C]
pub const DEFAULT_SUCTION_SUPERHEAT_C: f64 = 0.5;
pub const DEFAULT_ISENTROPIC_EFFICIENCY: f64 = 0.75;
pub const DEFAULT_MECHANICAL_EFFICIENCY: f64 = 0.95;
/// 토출 온도 탐색 구간 폭 [°C]
const SEARCH_SPAN_C: f64 = 400.0;

const MVC_MAX_COMPRESSION_RATIO: f64 = 3.0;
const MVC_TYPICAL_EFFICIENCY: (f64, f64) = (0.6, 0.9);

const TVC_MAX_COMPRESSION_RATIO: f64 = 4.0;
const TVC_MAX_EXPANSION_RATIO: f64 = 100.0;
pub const DEFAULT_NOZZLE_EFFICIENCY: f64 = 0.90;
pub const DEFAULT_MIXING_EFFICIENCY: f64 = 0.90;
pub const DEFAULT_DIFFUSER_EFFICIENCY: f64 = 0.85;

fn default_isentropic_efficiency() -> f64 {
    DEFAULT_ISENTROPIC_EFFICIENCY
}
fn default_mechanical_efficiency() -> f64 {
    DEFAULT_MECHANICAL_EFFICIENCY
}
fn default_nozzle_efficiency() -> f64 {
    DEFAULT_NOZZLE_EFFICIENCY
}
fn default_mixing_efficiency() -> f64 {
    DEFAULT_MIXING_EFFICIENCY
}
fn default_diffuser_efficiency() -> f64 {
    DEFAULT_DIFFUSER_EFFICIENCY
}

/// 고정 압력에서 엔트로피가 `target_entropy`가 되는 과열 증기 온도.
fn temperature_at_entropy(
    pressure_bar: f64,
    target_entropy: f64,
    lower_c: f64,
    upper_c: f64,
    props: &dyn PropertyProvider,
) -> Result<f64, CalcError> {
    let outcome = Bisection::new(lower_c, upper_c, ENTROPY_TOLERANCE_KJ_KGK)
        .solve(target_entropy, |t| props.entropy_superheated(pressure_bar, t))?;
    if !outcome.converged {
        warn!(pressure_bar, target_entropy, "entropy bisection did not converge");
    }
    Ok(outcome.root)
}

/// 고정 압력에서 엔탈피가 `target_enthalpy`가 되는 과열 증기 온도.
fn temperature_at_enthalpy(
    pressure_bar: f64,
    target_enthalpy: f64,
    lower_c: f64,
    upper_c: f64,
    props: &dyn PropertyProvider,
) -> Result<f64, CalcError> {
    let outcome = Bisection::new(lower_c, upper_c, ENTHALPY_TOLERANCE_KJ_KG)
        .solve(target_enthalpy, |t| props.enthalpy_superheated(pressure_bar, t))?;
    if !outcome.converged {
        warn!(pressure_bar, target_enthalpy, "enthalpy bisection did not converge");
    }
    Ok(outcome.root)
}

fn check_efficiency(report: &mut ValidationReport, name: &str, value: f64) {
    if !(value > 0.0 && value <= 1.0) {
        report.error(format!("{name} must be within (0, 1], got {value}"));
    }
}

// ---------------------------------------------------------------------------
// MVC
// ---------------------------------------------------------------------------

/// 기계식 증기 압축기 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MvcInput {
    /// 흡입 압력 [bar abs]
    pub suction_pressure_bar: f64,
    /// 토출 압력 [bar abs]
    pub discharge_pressure_bar: f64,
    /// 증기 유량 [ton/hr]
    pub flow_rate_ton_hr: f64,
    /// 흡입 증기 온도 [°C]. 없으면 Tsat + 0.5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction_temperature_c: Option<f64>,
    #[serde(default = "default_isentropic_efficiency")]
    pub isentropic_efficiency: f64,
    #[serde(default = "default_mechanical_efficiency")]
    pub mechanical_efficiency: f64,
}

impl MvcInput {
    /// 기본 효율로 입력을 만든다.
    pub fn new(suction_pressure_bar: f64, discharge_pressure_bar: f64, flow_rate_ton_hr: f64) -> Self {
        Self {
            suction_pressure_bar,
            discharge_pressure_bar,
            flow_rate_ton_hr,
            suction_temperature_c: None,
            isentropic_efficiency: DEFAULT_ISENTROPIC_EFFICIENCY,
            mechanical_efficiency: DEFAULT_MECHANICAL_EFFICIENCY,
        }
    }
}

/// 기계식 증기 압축기 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvcResult {
    pub compression_ratio: f64,
    pub suction_saturation_temperature_c: f64,
    pub suction_temperature_c: f64,
    pub suction_enthalpy_kj_kg: f64,
    pub suction_entropy_kj_kgk: f64,
    /// 흡입 체적 유량 [m³/h]
    pub suction_volumetric_flow_m3_h: f64,
    pub discharge_saturation_temperature_c: f64,
    pub isentropic_discharge_temperature_c: f64,
    pub isentropic_discharge_enthalpy_kj_kg: f64,
    pub discharge_temperature_c: f64,
    pub discharge_enthalpy_kj_kg: f64,
    /// 토출 과열도 [°C]
    pub discharge_superheat_c: f64,
    pub isentropic_power_kw: f64,
    pub shaft_power_kw: f64,
    pub electrical_power_kw: f64,
    /// 증기 1 ton 당 전력 [kWh/ton]
    pub specific_energy_kwh_ton: f64,
    pub warnings: Vec<String>,
}

pub fn validate_mvc(input: &MvcInput, props: &dyn PropertyProvider) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.suction_pressure_bar <= 0.0 {
        report.error("Suction pressure must be greater than 0 bar(a)");
    }
    if input.discharge_pressure_bar <= 0.0 {
        report.error("Discharge pressure must be greater than 0 bar(a)");
    }
    if input.discharge_pressure_bar <= input.suction_pressure_bar {
        report.error("Discharge pressure must be greater than suction pressure");
    }
    if input.flow_rate_ton_hr <= 0.0 {
        report.error("Flow rate must be greater than 0 ton/hr");
    }
    check_efficiency(&mut report, "Isentropic efficiency", input.isentropic_efficiency);
    check_efficiency(&mut report, "Mechanical efficiency", input.mechanical_efficiency);

    if let (Some(t), true) = (input.suction_temperature_c, input.suction_pressure_bar > 0.0) {
        match props.saturation_temperature(input.suction_pressure_bar) {
            Ok(t_sat) if t <= t_sat => report.error(format!(
                "Suction temperature {t:.2} °C must be above the saturation temperature {t_sat:.2} °C"
            )),
            Ok(_) => {}
            Err(e) => report.error(format!("Suction pressure: {e}")),
        }
    }

    if report.is_valid() {
        let ratio = input.discharge_pressure_bar / input.suction_pressure_bar;
        if ratio > MVC_MAX_COMPRESSION_RATIO {
            report.warn(format!(
                "Compression ratio {ratio:.2} exceeds {MVC_MAX_COMPRESSION_RATIO} for a single stage; consider multi-stage compression"
            ));
        }
        let (lo, hi) = MVC_TYPICAL_EFFICIENCY;
        if input.isentropic_efficiency < lo || input.isentropic_efficiency > hi {
            report.warn(format!(
                "Isentropic efficiency {:.2} is outside the typical range {lo}-{hi}",
                input.isentropic_efficiency
            ));
        }
    }
    report
}

/// MVC 토출 상태와 동력을 계산한다.
pub fn calculate_mvc(input: &MvcInput, props: &dyn PropertyProvider) -> Result<MvcResult, CalcError> {
    let warnings = validate_mvc(input, props).into_result()?;

    let p_s = input.suction_pressure_bar;
    let p_d = input.discharge_pressure_bar;

    let t_sat_s = props.saturation_temperature(p_s)?;
    let t_s = input
        .suction_temperature_c
        .unwrap_or(t_sat_s + DEFAULT_SUCTION_SUPERHEAT_C);
    let suction = FluidState::vapour(p_s, t_s, props)?;
    let h_s = suction.enthalpy(props)?;
    let s_s = suction.entropy(props)?;
    let v_s = props.specific_volume_superheated(p_s, t_s)?;

    let t_sat_d = props.saturation_temperature(p_d)?;
    let t_is = temperature_at_entropy(p_d, s_s, t_sat_d, t_sat_d + SEARCH_SPAN_C, props)?;
    let h_is = props.enthalpy_superheated(p_d, t_is)?;

    let h_d = h_s + (h_is - h_s) / input.isentropic_efficiency;
    let t_d = temperature_at_enthalpy(p_d, h_d, t_is, t_is + SEARCH_SPAN_C, props)?;
    debug!(t_is, t_d, h_is, h_d, "mvc discharge state");

    let m = ton_hr_to_kg_s(input.flow_rate_ton_hr);
    let isentropic_power_kw = m * (h_is - h_s);
    let shaft_power_kw = isentropic_power_kw / input.isentropic_efficiency;
    let electrical_power_kw = shaft_power_kw / input.mechanical_efficiency;

    Ok(MvcResult {
        compression_ratio: p_d / p_s,
        suction_saturation_temperature_c: t_sat_s,
        suction_temperature_c: t_s,
        suction_enthalpy_kj_kg: h_s,
        suction_entropy_kj_kgk: s_s,
        suction_volumetric_flow_m3_h: m * v_s * 3600.0,
        discharge_saturation_temperature_c: t_sat_d,
        isentropic_discharge_temperature_c: t_is,
        isentropic_discharge_enthalpy_kj_kg: h_is,
        discharge_temperature_c: t_d,
        discharge_enthalpy_kj_kg: h_d,
        discharge_superheat_c: t_d - t_sat_d,
        isentropic_power_kw,
        shaft_power_kw,
        electrical_power_kw,
        specific_energy_kwh_ton: electrical_power_kw / input.flow_rate_ton_hr,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// TVC
// ---------------------------------------------------------------------------

/// 열압축기(이젝터) 입력.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TvcInput {
    pub motive_pressure_bar: f64,
    /// 없으면 포화 증기
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motive_temperature_c: Option<f64>,
    pub suction_pressure_bar: f64,
    pub discharge_pressure_bar: f64,
    /// 흡입(동반) 증기 유량 [ton/hr]
    pub entrained_flow_ton_hr: f64,
    #[serde(default = "default_nozzle_efficiency")]
    pub nozzle_efficiency: f64,
    #[serde(default = "default_mixing_efficiency")]
    pub mixing_efficiency: f64,
    #[serde(default = "default_diffuser_efficiency")]
    pub diffuser_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvcResult {
    pub compression_ratio: f64,
    pub expansion_ratio: f64,
    pub motive_temperature_c: f64,
    pub motive_enthalpy_kj_kg: f64,
    /// 노즐 등엔트로피 팽창 후 엔탈피 [kJ/kg]
    pub expanded_enthalpy_kj_kg: f64,
    /// 팽창 후 건도. 과열이면 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_quality: Option<f64>,
    pub nozzle_enthalpy_drop_kj_kg: f64,
    pub diffuser_enthalpy_rise_kj_kg: f64,
    /// 동반 증기 / 구동 증기
    pub entrainment_ratio: f64,
    pub motive_flow_ton_hr: f64,
    pub discharge_flow_ton_hr: f64,
    pub discharge_enthalpy_kj_kg: f64,
    pub discharge_temperature_c: f64,
    pub discharge_saturation_temperature_c: f64,
    pub warnings: Vec<String>,
}

pub fn validate_tvc(input: &TvcInput, props: &dyn PropertyProvider) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.suction_pressure_bar <= 0.0 {
        report.error("Suction pressure must be greater than 0 bar(a)");
    }
    if input.discharge_pressure_bar <= input.suction_pressure_bar {
        report.error("Discharge pressure must be greater than suction pressure");
    }
    if input.motive_pressure_bar <= input.discharge_pressure_bar {
        report.error("Motive pressure must be greater than discharge pressure");
    }
    if input.entrained_flow_ton_hr <= 0.0 {
        report.error("Entrained vapour flow must be greater than 0 ton/hr");
    }
    check_efficiency(&mut report, "Nozzle efficiency", input.nozzle_efficiency);
    check_efficiency(&mut report, "Mixing efficiency", input.mixing_efficiency);
    check_efficiency(&mut report, "Diffuser efficiency", input.diffuser_efficiency);

    if let (Some(t), true) = (input.motive_temperature_c, input.motive_pressure_bar > 0.0) {
        match props.saturation_temperature(input.motive_pressure_bar) {
            Ok(t_sat) if t < t_sat => report.error(format!(
                "Motive steam temperature {t:.2} °C is below saturation {t_sat:.2} °C"
            )),
            Ok(_) => {}
            Err(e) => report.error(format!("Motive pressure: {e}")),
        }
    }

    if report.is_valid() {
        let cr = input.discharge_pressure_bar / input.suction_pressure_bar;
        if cr > TVC_MAX_COMPRESSION_RATIO {
            report.warn(format!(
                "Compression ratio {cr:.2} exceeds {TVC_MAX_COMPRESSION_RATIO}; ejector performance will be poor"
            ));
        }
        let er = input.motive_pressure_bar / input.suction_pressure_bar;
        if er > TVC_MAX_EXPANSION_RATIO {
            report.warn(format!(
                "Expansion ratio {er:.1} exceeds {TVC_MAX_EXPANSION_RATIO}; check motive steam conditions"
            ));
        }
    }
    report
}

pub fn calculate_tvc(input: &TvcInput, props: &dyn PropertyProvider) -> Result<TvcResult, CalcError> {
    let mut warnings = validate_tvc(input, props).into_result()?;

    let p_m = input.motive_pressure_bar;
    let p_s = input.suction_pressure_bar;
    let p_d = input.discharge_pressure_bar;

    // 구동 증기
    let t_sat_m = props.saturation_temperature(p_m)?;
    let t_m = input.motive_temperature_c.unwrap_or(t_sat_m);
    let (h_m, s_m) = if t_m > t_sat_m {
        (
            props.enthalpy_superheated(p_m, t_m)?,
            props.entropy_superheated(p_m, t_m)?,
        )
    } else {
        (props.enthalpy_vapor(t_sat_m)?, props.entropy_vapor(t_sat_m)?)
    };

    // 노즐: 흡입 압력까지 등엔트로피 팽창
    let t_sat_s = props.saturation_temperature(p_s)?;
    let s_g = props.entropy_vapor(t_sat_s)?;
    let (h_exp, quality) = if s_m < s_g {
        let s_f = props.entropy_liquid(t_sat_s)?;
        let x = (s_m - s_f) / (s_g - s_f);
        (FluidState::wet(p_s, x, props)?.enthalpy(props)?, Some(x))
    } else {
        let t_exp = temperature_at_entropy(p_s, s_m, t_sat_s, t_m.max(t_sat_s), props)?;
        (props.enthalpy_superheated(p_s, t_exp)?, None)
    };
    let dh_nozzle = h_m - h_exp;

    // 디퓨저: 동반 증기(흡입 포화 증기)를 토출 압력까지 등엔트로피 압축
    let h_e = props.enthalpy_vapor(t_sat_s)?;
    let t_sat_d = props.saturation_temperature(p_d)?;
    let t_is = temperature_at_entropy(p_d, s_g, t_sat_d, t_sat_d + SEARCH_SPAN_C, props)?;
    let dh_diffuser = props.enthalpy_superheated(p_d, t_is)? - h_e;

    let eta = input.nozzle_efficiency * input.mixing_efficiency * input.diffuser_efficiency;
    let w = (eta * dh_nozzle / dh_diffuser).sqrt() - 1.0;
    if !(w > 0.0) {
        return Err(CalcError::invalid(format!(
            "Entrainment ratio {w:.3} is not positive; motive steam cannot achieve the requested compression"
        )));
    }

    let entrained = input.entrained_flow_ton_hr;
    let motive = entrained / w;
    let discharge = motive + entrained;
    let h_d = (motive * h_m + entrained * h_e) / discharge;

    let h_g_d = props.enthalpy_vapor(t_sat_d)?;
    let t_d = if h_d > h_g_d {
        temperature_at_enthalpy(p_d, h_d, t_sat_d, t_sat_d + SEARCH_SPAN_C, props)?
    } else {
        warnings.push("Discharge vapour is wet at the discharge pressure".to_string());
        t_sat_d
    };
    debug!(w, motive, t_d, "tvc balance");

    Ok(TvcResult {
        compression_ratio: p_d / p_s,
        expansion_ratio: p_m / p_s,
        motive_temperature_c: t_m,
        motive_enthalpy_kj_kg: h_m,
        expanded_enthalpy_kj_kg: h_exp,
        expanded_quality: quality,
        nozzle_enthalpy_drop_kj_kg: dh_nozzle,
        diffuser_enthalpy_rise_kj_kg: dh_diffuser,
        entrainment_ratio: w,
        motive_flow_ton_hr: motive,
        discharge_flow_ton_hr: discharge,
        discharge_enthalpy_kj_kg: h_d,
        discharge_temperature_c: t_d,
        discharge_saturation_temperature_c: t_sat_d,
        warnings,
    })
}
