//! Darcy-Weisbach 기반 배관 압력손실.
//!
//! 마찰계수
//! - Re ≤ 2300: 층류 f = 64/Re
//! - 2300 < Re < 4000: Re=2300 층류값과 Re=4000 난류값 사이 선형 보간
//! - Re ≥ 4000: Swamee-Jain (Colebrook-White 근사)
//!
//! 총 손실은 m 수두로 합산한 뒤 한 번만 압력으로 환산하므로
//! `mbar == bar * 1000`, `kPa == bar * 100`이 항상 정확히 성립한다.

use serde::{Deserialize, Serialize};

use super::fittings::{FittingSpec, FittingType};
use crate::error::{CalcError, ValidationReport};
use crate::units::pressure::{from_bar, PressureUnit};
use crate::units::{head_to_bar, ton_hr_to_m3_s, GRAVITY_M_S2};

pub const LAMINAR_RE_LIMIT: f64 = 2300.0;
pub const TURBULENT_RE_LIMIT: f64 = 4000.0;
/// 상용 탄소강관 절대조도 [mm]
pub const DEFAULT_ROUGHNESS_MM: f64 = 0.045;
/// 권장 유속 범위 [m/s]
pub const MIN_RECOMMENDED_VELOCITY_M_S: f64 = 0.3;
pub const MAX_RECOMMENDED_VELOCITY_M_S: f64 = 5.0;

fn default_roughness_mm() -> f64 {
    DEFAULT_ROUGHNESS_MM
}

/// 유동 영역.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

/// 압력손실 계산 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureDropInput {
    /// 배관 내경 [mm]
    pub inner_diameter_mm: f64,
    /// 직관 길이 [m]
    pub length_m: f64,
    /// 질량 유량 [ton/hr]
    pub flow_rate_ton_hr: f64,
    /// 밀도 [kg/m³]
    pub density_kg_m3: f64,
    /// 점도 [Pa·s]
    pub viscosity_pa_s: f64,
    /// 절대조도 [mm]
    #[serde(default = "default_roughness_mm")]
    pub roughness_mm: f64,
    /// 고도 변화 [m], 상향(+)
    #[serde(default)]
    pub elevation_change_m: f64,
    #[serde(default)]
    pub fittings: Vec<FittingSpec>,
}

/// 피팅별 손실.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittingLoss {
    pub name: String,
    pub count: u32,
    pub k_factor: f64,
    pub total_k: f64,
    pub loss_m: f64,
}

/// 압력손실 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureDropResult {
    pub velocity_m_s: f64,
    pub velocity_head_m: f64,
    pub reynolds_number: f64,
    pub flow_regime: FlowRegime,
    pub friction_factor: f64,
    pub straight_pipe_loss_m: f64,
    pub fittings: Vec<FittingLoss>,
    pub total_k_factor: f64,
    pub fittings_loss_m: f64,
    pub elevation_head_m: f64,
    pub total_pressure_drop_mh2o: f64,
    pub total_pressure_drop_bar: f64,
    pub total_pressure_drop_mbar: f64,
    pub total_pressure_drop_kpa: f64,
    pub warnings: Vec<String>,
}

/// Swamee-Jain 난류 마찰계수.
pub fn swamee_jain(reynolds: f64, relative_roughness: f64) -> f64 {
    let log_term = (relative_roughness / 3.7 + 5.74 / reynolds.powf(0.9)).log10();
    0.25 / (log_term * log_term)
}

/// 레이놀즈수와 상대조도(ε/D)로 마찰계수와 유동 영역을 구한다.
pub fn friction_factor(reynolds: f64, relative_roughness: f64) -> (f64, FlowRegime) {
    if reynolds <= LAMINAR_RE_LIMIT {
        (64.0 / reynolds, FlowRegime::Laminar)
    } else if reynolds < TURBULENT_RE_LIMIT {
        let f_laminar = 64.0 / LAMINAR_RE_LIMIT;
        let f_turbulent = swamee_jain(TURBULENT_RE_LIMIT, relative_roughness);
        let ratio = (reynolds - LAMINAR_RE_LIMIT) / (TURBULENT_RE_LIMIT - LAMINAR_RE_LIMIT);
        (
            f_laminar + ratio * (f_turbulent - f_laminar),
            FlowRegime::Transitional,
        )
    } else {
        (
            swamee_jain(reynolds, relative_roughness),
            FlowRegime::Turbulent,
        )
    }
}

pub fn validate_pressure_drop(input: &PressureDropInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.inner_diameter_mm <= 0.0 {
        report.error("Inner diameter must be greater than 0 mm");
    }
    if input.length_m < 0.0 {
        report.error("Pipe length cannot be negative");
    }
    if input.flow_rate_ton_hr <= 0.0 {
        report.error("Flow rate must be greater than 0 ton/hr");
    }
    if input.density_kg_m3 <= 0.0 || input.viscosity_pa_s <= 0.0 {
        report.error("Density and viscosity must be greater than 0");
    }
    if input.roughness_mm < 0.0 {
        report.error("Pipe roughness cannot be negative");
    }
    for item in &input.fittings {
        if let FittingType::Reducer { beta, .. } | FittingType::Expander { beta, .. } =
            item.fitting
        {
            if !(beta > 0.0 && beta <= 1.0) {
                report.error(format!(
                    "{} diameter ratio must be in (0, 1], got {beta}",
                    item.fitting.name()
                ));
            }
        }
    }
    report
}

/// 직관 + 피팅 + 고도 손실을 계산한다.
pub fn calculate_pressure_drop(input: &PressureDropInput) -> Result<PressureDropResult, CalcError> {
    let mut warnings = validate_pressure_drop(input).into_result()?;

    let diameter_m = input.inner_diameter_mm / 1000.0;
    let area_m2 = std::f64::consts::PI * diameter_m * diameter_m / 4.0;
    let velocity = ton_hr_to_m3_s(input.flow_rate_ton_hr, input.density_kg_m3) / area_m2;
    let velocity_head = velocity * velocity / (2.0 * GRAVITY_M_S2);
    let reynolds = input.density_kg_m3 * velocity * diameter_m / input.viscosity_pa_s;
    let (f, regime) = friction_factor(reynolds, input.roughness_mm / input.inner_diameter_mm);

    let straight_pipe_loss_m = f * (input.length_m / diameter_m) * velocity_head;

    let fittings: Vec<FittingLoss> = input
        .fittings
        .iter()
        .map(|item| {
            let total_k = item.total_k();
            FittingLoss {
                name: item.fitting.name(),
                count: item.count,
                k_factor: item.fitting.k_factor(),
                total_k,
                loss_m: total_k * velocity_head,
            }
        })
        .collect();
    let total_k_factor: f64 = fittings.iter().map(|l| l.total_k).sum();
    let fittings_loss_m = total_k_factor * velocity_head;

    let total_m = straight_pipe_loss_m + fittings_loss_m + input.elevation_change_m;
    let total_bar = head_to_bar(total_m, input.density_kg_m3);

    if velocity < MIN_RECOMMENDED_VELOCITY_M_S {
        warnings.push(format!(
            "Velocity {velocity:.2} m/s is below the recommended minimum of {MIN_RECOMMENDED_VELOCITY_M_S} m/s (risk of sedimentation)"
        ));
    } else if velocity > MAX_RECOMMENDED_VELOCITY_M_S {
        warnings.push(format!(
            "Velocity {velocity:.2} m/s exceeds the recommended maximum of {MAX_RECOMMENDED_VELOCITY_M_S} m/s (erosion and noise)"
        ));
    }
    if regime == FlowRegime::Transitional {
        warnings.push(format!(
            "Transitional flow (Re = {reynolds:.0}); friction factor is interpolated"
        ));
    }

    Ok(PressureDropResult {
        velocity_m_s: velocity,
        velocity_head_m: velocity_head,
        reynolds_number: reynolds,
        flow_regime: regime,
        friction_factor: f,
        straight_pipe_loss_m,
        fittings,
        total_k_factor,
        fittings_loss_m,
        elevation_head_m: input.elevation_change_m,
        total_pressure_drop_mh2o: total_m,
        total_pressure_drop_bar: total_bar,
        total_pressure_drop_mbar: from_bar(total_bar, PressureUnit::MilliBar),
        total_pressure_drop_kpa: from_bar(total_bar, PressureUnit::KiloPascal),
        warnings,
    })
}
