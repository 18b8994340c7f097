//! 펌프 흡입측 유효 NPSH(NPSHa).
//!
//! NPSHa = 정수두 + 압력수두 - 증기압수두 - 마찰손실.
//! 해수의 증기압은 비점상승만큼 낮은 온도의 순수 포화압력으로 본다.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, ValidationReport};
use crate::properties::PropertyProvider;
use crate::units::pressure::ATMOSPHERIC_PRESSURE_BAR;
use crate::units::bar_to_head;

/// 권장 NPSH 여유 단계 [m]
const TIER_LOW_M: f64 = 1.0;
const TIER_MODERATE_M: f64 = 2.0;
const TIER_GOOD_M: f64 = 5.0;
const MODERATE_MARGIN_M: f64 = 0.5;
const GOOD_MARGIN_M: f64 = 1.0;

/// 흡입 용기 압력 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VesselPressure {
    /// 대기 개방. 기본 1.01325 bar(a)
    Open {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        atmospheric_pressure_bar: Option<f64>,
    },
    /// 밀폐 가압
    Closed { pressure_bar: f64 },
    /// 진공. 용기 압력만 구동 수두가 된다
    Vacuum { pressure_bar: f64 },
}

impl VesselPressure {
    pub fn absolute_pressure_bar(&self) -> f64 {
        match *self {
            VesselPressure::Open {
                atmospheric_pressure_bar,
            } => atmospheric_pressure_bar.unwrap_or(ATMOSPHERIC_PRESSURE_BAR),
            VesselPressure::Closed { pressure_bar } | VesselPressure::Vacuum { pressure_bar } => {
                pressure_bar
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpshaInput {
    pub vessel: VesselPressure,
    /// 액면 - 펌프 중심 [m]. 흡입 양정이면 음수
    pub static_head_m: f64,
    pub liquid_temperature_c: f64,
    #[serde(default)]
    pub salinity_ppm: f64,
    #[serde(default)]
    pub friction_loss_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npshr_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpshaResult {
    pub vessel_pressure_bar: f64,
    pub density_kg_m3: f64,
    pub static_head_m: f64,
    pub pressure_head_m: f64,
    pub vapor_pressure_bar: f64,
    pub vapor_pressure_head_m: f64,
    pub friction_loss_m: f64,
    pub npsha_m: f64,
    /// NPSHa - NPSHr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_m: Option<f64>,
    pub recommendation: String,
    pub warnings: Vec<String>,
}

pub fn validate_npsha(input: &NpshaInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    let p = input.vessel.absolute_pressure_bar();
    if p <= 0.0 {
        report.error("Vessel pressure must be greater than 0 bar(a)");
    }
    if let VesselPressure::Vacuum { pressure_bar } = input.vessel {
        if pressure_bar >= ATMOSPHERIC_PRESSURE_BAR {
            report.warn(format!(
                "Vacuum vessel pressure {pressure_bar:.3} bar(a) is not below atmospheric"
            ));
        }
    }
    if input.friction_loss_m < 0.0 {
        report.error("Friction loss cannot be negative");
    }
    if let Some(npshr) = input.npshr_m {
        if npshr < 0.0 {
            report.error("NPSHr cannot be negative");
        }
    }
    report
}

/// NPSHa 크기에 따른 권장 문구.
pub fn recommendation(npsha_m: f64) -> String {
    if npsha_m < 0.0 {
        "CRITICAL: NPSHa is negative; the pump will cavitate. Raise the liquid level or reduce suction losses".to_string()
    } else if npsha_m < TIER_LOW_M {
        "WARNING: NPSHa is below 1 m; very few pumps can operate. Consider raising the vessel or a low-NPSH pump".to_string()
    } else if npsha_m < TIER_MODERATE_M {
        format!(
            "Select a pump with NPSHr below {:.2} m (NPSHa - {MODERATE_MARGIN_M} m margin)",
            npsha_m - MODERATE_MARGIN_M
        )
    } else if npsha_m < TIER_GOOD_M {
        format!(
            "Select a pump with NPSHr below {:.2} m (NPSHa - {GOOD_MARGIN_M} m margin)",
            npsha_m - GOOD_MARGIN_M
        )
    } else {
        "Excellent: NPSHa is ample for standard centrifugal pumps".to_string()
    }
}

pub fn calculate_npsha(
    input: &NpshaInput,
    props: &dyn PropertyProvider,
) -> Result<NpshaResult, CalcError> {
    let mut warnings = validate_npsha(input).into_result()?;

    let vessel_pressure_bar = input.vessel.absolute_pressure_bar();
    let density = props.seawater_density(input.salinity_ppm, input.liquid_temperature_c)?;
    let bpe = props.boiling_point_elevation(input.salinity_ppm, input.liquid_temperature_c)?;
    let vapor_pressure_bar = props.saturation_pressure(input.liquid_temperature_c - bpe)?;

    let pressure_head_m = bar_to_head(vessel_pressure_bar, density);
    let vapor_pressure_head_m = bar_to_head(vapor_pressure_bar, density);
    let npsha_m =
        input.static_head_m + pressure_head_m - vapor_pressure_head_m - input.friction_loss_m;

    let margin_m = input.npshr_m.map(|npshr| npsha_m - npshr);
    if let Some(margin) = margin_m {
        if margin < 0.0 {
            warnings.push(format!(
                "NPSHa {npsha_m:.2} m is below NPSHr; cavitation expected (margin {margin:.2} m)"
            ));
        } else if margin < MODERATE_MARGIN_M {
            warnings.push(format!(
                "NPSH margin {margin:.2} m is below the recommended {MODERATE_MARGIN_M} m"
            ));
        }
    }

    Ok(NpshaResult {
        vessel_pressure_bar,
        density_kg_m3: density,
        static_head_m: input.static_head_m,
        pressure_head_m,
        vapor_pressure_bar,
        vapor_pressure_head_m,
        friction_loss_m: input.friction_loss_m,
        npsha_m,
        margin_m,
        recommendation: recommendation(npsha_m),
        warnings,
    })
}
