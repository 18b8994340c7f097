//! 관내 대류, 막응축, 총괄 열전달계수.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::properties::PropertyProvider;
use crate::units::GRAVITY_M_S2;

const LAMINAR_NUSSELT: f64 = 3.66;
const LAMINAR_RE_LIMIT: f64 = 2300.0;
const FULLY_TURBULENT_RE: f64 = 10_000.0;
/// 막응축 ΔT 하한 [K]
pub const MIN_CONDENSATION_DELTA_T_K: f64 = 0.5;

/// 관내 유체가 가열되는지 냉각되는지 (Dittus-Boelter 지수 결정).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingMode {
    #[default]
    Heating,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeSideInput {
    pub velocity_m_s: f64,
    pub inner_diameter_mm: f64,
    pub bulk_temperature_c: f64,
    #[serde(default)]
    pub salinity_ppm: f64,
    #[serde(default)]
    pub mode: HeatingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TubeSideResult {
    pub reynolds_number: f64,
    pub prandtl_number: f64,
    pub nusselt_number: f64,
    /// [W/m²·K]
    pub htc_w_m2k: f64,
    pub warnings: Vec<String>,
}

/// Dittus-Boelter (난류) 또는 완전발달 층류 Nu = 3.66.
pub fn tube_side_htc(
    input: &TubeSideInput,
    props: &dyn PropertyProvider,
) -> Result<TubeSideResult, CalcError> {
    if input.velocity_m_s <= 0.0 || input.inner_diameter_mm <= 0.0 {
        return Err(CalcError::invalid(
            "Tube velocity and inner diameter must be greater than 0",
        ));
    }
    let d = input.inner_diameter_mm / 1000.0;
    let rho = props.seawater_density(input.salinity_ppm, input.bulk_temperature_c)?;
    let mu = props.seawater_viscosity(input.salinity_ppm, input.bulk_temperature_c)?;
    let cp_j = props.seawater_specific_heat(input.salinity_ppm, input.bulk_temperature_c)? * 1000.0;
    let k = props.thermal_conductivity_liquid(input.bulk_temperature_c)?;

    let re = rho * input.velocity_m_s * d / mu;
    let pr = cp_j * mu / k;
    let mut warnings = Vec::new();

    let nu = if re < LAMINAR_RE_LIMIT {
        LAMINAR_NUSSELT
    } else {
        if re < FULLY_TURBULENT_RE {
            warnings.push(format!(
                "Transitional flow (Re = {re:.0}); Dittus-Boelter may overpredict the coefficient"
            ));
        }
        let n = match input.mode {
            HeatingMode::Heating => 0.4,
            HeatingMode::Cooling => 0.3,
        };
        0.023 * re.powf(0.8) * pr.powf(n)
    };

    Ok(TubeSideResult {
        reynolds_number: re,
        prandtl_number: pr,
        nusselt_number: nu,
        htc_w_m2k: nu * k / d,
        warnings,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CondensingSurface {
    /// 수평관 외면. 특성길이 = 관 외경
    #[default]
    HorizontalTube,
    /// 수직면. 특성길이 = 높이
    VerticalSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondensationInput {
    pub saturation_temperature_c: f64,
    pub wall_temperature_c: f64,
    /// 수평관: 외경 [m], 수직면: 높이 [m]
    pub characteristic_length_m: f64,
    #[serde(default)]
    pub surface: CondensingSurface,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensationResult {
    pub delta_t_k: f64,
    pub film_temperature_c: f64,
    pub htc_w_m2k: f64,
    pub warnings: Vec<String>,
}

/// Nusselt 막응축 열전달계수.
pub fn condensation_htc(
    input: &CondensationInput,
    props: &dyn PropertyProvider,
) -> Result<CondensationResult, CalcError> {
    if input.characteristic_length_m <= 0.0 {
        return Err(CalcError::invalid(
            "Characteristic length must be greater than 0 m",
        ));
    }
    let mut warnings = Vec::new();
    let raw_dt = input.saturation_temperature_c - input.wall_temperature_c;
    let dt = if raw_dt < MIN_CONDENSATION_DELTA_T_K {
        warnings.push(format!(
            "Wall-to-vapour ΔT {raw_dt:.2} K is below {MIN_CONDENSATION_DELTA_T_K} K; clamped"
        ));
        MIN_CONDENSATION_DELTA_T_K
    } else {
        raw_dt
    };
    let t_sat = input.saturation_temperature_c;
    let t_film = t_sat - 0.5 * dt;

    let rho_l = props.density_liquid(t_film)?;
    let rho_v = props.density_vapor(t_sat)?;
    let h_fg = props.latent_heat(t_sat)? * 1000.0;
    let k_l = props.thermal_conductivity_liquid(t_film)?;
    let mu_l = props.seawater_viscosity(0.0, t_film)?;

    let c = match input.surface {
        CondensingSurface::HorizontalTube => 0.725,
        CondensingSurface::VerticalSurface => 0.943,
    };
    let group = rho_l * (rho_l - rho_v) * GRAVITY_M_S2 * h_fg * k_l.powi(3)
        / (mu_l * dt * input.characteristic_length_m);

    Ok(CondensationResult {
        delta_t_k: dt,
        film_temperature_c: t_film,
        htc_w_m2k: c * group.powf(0.25),
        warnings,
    })
}

fn default_wall_conductivity() -> f64 {
    // 90/10 CuNi
    50.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallHtcInput {
    pub inside_htc_w_m2k: f64,
    pub outside_htc_w_m2k: f64,
    pub tube_outer_diameter_mm: f64,
    pub tube_inner_diameter_mm: f64,
    #[serde(default = "default_wall_conductivity")]
    pub wall_conductivity_w_mk: f64,
    /// [m²·K/W]
    #[serde(default)]
    pub inside_fouling_m2kw: f64,
    #[serde(default)]
    pub outside_fouling_m2kw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallHtcResult {
    /// 외면 기준 [W/m²·K]
    pub overall_htc_w_m2k: f64,
    pub inside_resistance_m2kw: f64,
    pub outside_resistance_m2kw: f64,
    pub wall_resistance_m2kw: f64,
    pub fouling_resistance_m2kw: f64,
}

/// 외면적 기준 직렬 저항의 합으로 총괄 열전달계수를 구한다.
pub fn overall_htc(input: &OverallHtcInput) -> Result<OverallHtcResult, CalcError> {
    if input.inside_htc_w_m2k <= 0.0 || input.outside_htc_w_m2k <= 0.0 {
        return Err(CalcError::invalid("Film coefficients must be greater than 0"));
    }
    if input.tube_inner_diameter_mm <= 0.0
        || input.tube_outer_diameter_mm <= input.tube_inner_diameter_mm
    {
        return Err(CalcError::invalid(
            "Tube outer diameter must exceed inner diameter (both > 0)",
        ));
    }
    if input.wall_conductivity_w_mk <= 0.0 {
        return Err(CalcError::invalid("Wall conductivity must be greater than 0"));
    }
    if input.inside_fouling_m2kw < 0.0 || input.outside_fouling_m2kw < 0.0 {
        return Err(CalcError::invalid("Fouling resistances cannot be negative"));
    }

    let d_o = input.tube_outer_diameter_mm / 1000.0;
    let d_i = input.tube_inner_diameter_mm / 1000.0;
    let ratio = d_o / d_i;

    let outside = 1.0 / input.outside_htc_w_m2k;
    let inside = ratio / input.inside_htc_w_m2k;
    let wall = d_o * ratio.ln() / (2.0 * input.wall_conductivity_w_mk);
    let fouling = input.outside_fouling_m2kw + input.inside_fouling_m2kw * ratio;

    Ok(OverallHtcResult {
        overall_htc_w_m2k: 1.0 / (outside + inside + wall + fouling),
        inside_resistance_m2kw: inside,
        outside_resistance_m2kw: outside,
        wall_resistance_m2kw: wall,
        fouling_resistance_m2kw: fouling,
    })
}
