//! 진공 효용에서 빼내는 펌프 흡입 계통 설계.
//!
//! 노즐 배관(저유속) → 편심 리듀서 → 흡입 배관, 밸브와 스트레이너는 배관 규격으로 자동 선정한다.
//! 스트레이너 청정/막힘 두 조건의 압력손실과 NPSHa를 모두 계산한다.
//! 마찰손실이 고도와 무관하므로 필요 고도는 반복 없이 대수적으로 구한다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcError, ValidationReport};
use crate::piping::catalog::PipeCatalog;
use crate::piping::fittings::{FittingSpec, FittingType, StrainerCondition, StrainerType};
use crate::piping::pressure_drop::{
    calculate_pressure_drop, PressureDropInput, PressureDropResult, DEFAULT_ROUGHNESS_MM,
};
use crate::piping::selector::{select_by_velocity, SizedPipe, VelocityLimits, VelocityStatus};
use crate::properties::{FluidState, PropertyProvider};
use crate::thermal::npsha::{calculate_npsha, NpshaInput, NpshaResult, VesselPressure};
use crate::units::ton_hr_to_m3_s;

/// 이 NPS 이상이면 게이트 밸브 + 버킷 스트레이너
pub const LARGE_BORE_NPS_INCHES: f64 = 4.0;
pub const NOZZLE_VELOCITY_LIMITS: VelocityLimits = VelocityLimits::new(0.05, 0.15);
pub const SUCTION_VELOCITY_LIMITS: VelocityLimits = VelocityLimits::new(0.5, 1.5);
/// 여유 판정 시 부동소수 반올림 허용치 [m]
const MARGIN_TOLERANCE_M: f64 = 1e-6;

fn default_nozzle_velocity() -> f64 {
    0.1
}
fn default_suction_velocity() -> f64 {
    1.0
}
fn default_elbow_count() -> u32 {
    2
}
fn default_residence_time_s() -> f64 {
    30.0
}
fn default_min_column_height() -> f64 {
    0.5
}
fn default_safety_margin() -> f64 {
    0.5
}
fn default_roughness_mm() -> f64 {
    DEFAULT_ROUGHNESS_MM
}

/// 고도 계산 모드.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ElevationMode {
    /// 필요한 최소 고도를 구한다
    FindElevation,
    /// 주어진 고도에서 NPSHa 여유를 검토한다
    VerifyElevation { elevation_m: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuctionInput {
    pub effect_pressure_mbar: f64,
    pub salinity_ppm: f64,
    pub flow_rate_ton_hr: f64,
    pub npshr_m: f64,
    #[serde(flatten)]
    pub mode: ElevationMode,
    /// 흡입 배관 수평 길이 [m]. 수직 낙차는 마찰 길이에 넣지 않는다
    pub suction_pipe_length_m: f64,
    #[serde(default = "default_elbow_count")]
    pub elbow_count: u32,
    #[serde(default = "default_nozzle_velocity")]
    pub nozzle_velocity_m_s: f64,
    #[serde(default = "default_suction_velocity")]
    pub suction_velocity_m_s: f64,
    #[serde(default = "default_residence_time_s")]
    pub residence_time_s: f64,
    #[serde(default = "default_min_column_height")]
    pub min_column_height_m: f64,
    #[serde(default = "default_safety_margin")]
    pub safety_margin_m: f64,
    #[serde(default = "default_roughness_mm")]
    pub roughness_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldupConstraint {
    ResidenceTime,
    MinimumColumnHeight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holdup {
    pub residence_height_m: f64,
    pub height_m: f64,
    pub volume_m3: f64,
    pub governing: HoldupConstraint,
}

/// 자동 선정된 밸브/스트레이너/리듀서.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuctionComponents {
    pub valve: FittingType,
    pub strainer: StrainerType,
    /// 노즐과 흡입 배관이 같은 규격이면 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reducer_beta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reducer_k: Option<f64>,
}

/// 스트레이너 상태 하나에 대한 평가.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuctionCase {
    pub condition: StrainerCondition,
    pub pressure_drop: PressureDropResult,
    pub npsha: NpshaResult,
    pub margin_m: f64,
    pub is_adequate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuctionResult {
    pub fluid: FluidState,
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
    pub nozzle_pipe: SizedPipe,
    pub suction_pipe: SizedPipe,
    pub components: SuctionComponents,
    pub holdup: Holdup,
    /// 액면 - 펌프 중심 [m]
    pub elevation_m: f64,
    /// find 모드에서 계산된 최소 고도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_elevation_m: Option<f64>,
    pub clean: SuctionCase,
    pub dirty: SuctionCase,
    pub warnings: Vec<String>,
}

pub fn validate_suction(input: &SuctionInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.effect_pressure_mbar <= 0.0 {
        report.error("Effect pressure must be greater than 0 mbar(a)");
    }
    if input.salinity_ppm < 0.0 {
        report.error("Salinity cannot be negative");
    }
    if input.flow_rate_ton_hr <= 0.0 {
        report.error("Flow rate must be greater than 0 ton/hr");
    }
    if input.npshr_m < 0.0 {
        report.error("NPSHr cannot be negative");
    }
    if input.suction_pipe_length_m < 0.0 {
        report.error("Suction pipe length cannot be negative");
    }
    if input.nozzle_velocity_m_s <= 0.0 || input.suction_velocity_m_s <= 0.0 {
        report.error("Target velocities must be greater than 0 m/s");
    }
    if input.residence_time_s < 0.0 || input.min_column_height_m < 0.0 {
        report.error("Residence time and minimum column height cannot be negative");
    }
    if input.safety_margin_m < 0.0 {
        report.error("NPSH safety margin cannot be negative");
    }
    if input.nozzle_velocity_m_s > NOZZLE_VELOCITY_LIMITS.max_m_s {
        report.warn(format!(
            "Nozzle target velocity {:.2} m/s exceeds {} m/s; vapour entrainment at the outlet is likely",
            input.nozzle_velocity_m_s, NOZZLE_VELOCITY_LIMITS.max_m_s
        ));
    }
    report
}

/// 흡입 배관 규격에 따른 밸브/스트레이너 선정.
pub fn select_components(suction_nps_inches: f64) -> (FittingType, StrainerType) {
    if suction_nps_inches >= LARGE_BORE_NPS_INCHES {
        (FittingType::GateValve, StrainerType::Bucket)
    } else {
        (FittingType::BallValve, StrainerType::YType)
    }
}

pub fn calculate_suction(
    input: &SuctionInput,
    props: &dyn PropertyProvider,
    catalog: &PipeCatalog,
) -> Result<SuctionResult, CalcError> {
    let mut warnings = validate_suction(input).into_result()?;

    let p_bar = input.effect_pressure_mbar / 1000.0;
    let fluid = FluidState::saturated_liquid(p_bar, input.salinity_ppm, props)?;
    let rho = fluid.density(props)?;
    let mu = fluid.viscosity(props)?;
    let q_m3_s = ton_hr_to_m3_s(input.flow_rate_ton_hr, rho);

    let nozzle_pipe = select_by_velocity(
        q_m3_s,
        input.nozzle_velocity_m_s,
        NOZZLE_VELOCITY_LIMITS,
        catalog,
    )?;
    let suction_pipe = select_by_velocity(
        q_m3_s,
        input.suction_velocity_m_s,
        SUCTION_VELOCITY_LIMITS,
        catalog,
    )?;
    for (label, sized) in [("Nozzle", &nozzle_pipe), ("Suction", &suction_pipe)] {
        if !sized.selected.is_exact_match {
            warnings.push(format!(
                "{label} pipe is limited to the largest catalogue size {}",
                sized.selected.display_name
            ));
        }
        if sized.velocity_status != VelocityStatus::Ok {
            warnings.push(format!(
                "{label} pipe velocity {:.3} m/s is {:?}",
                sized.actual_velocity_m_s, sized.velocity_status
            ));
        }
    }

    let (valve, strainer) = select_components(suction_pipe.pipe().nps_inches);
    let beta = suction_pipe.pipe().inner_diameter_mm / nozzle_pipe.pipe().inner_diameter_mm;
    let reducer = (beta < 1.0).then_some(FittingType::Reducer {
        beta,
        eccentric: true,
    });

    // 노즐 배관 내 체류 높이
    let nozzle_area_m2 = nozzle_pipe.pipe().area_m2();
    let residence_height_m = q_m3_s * input.residence_time_s / nozzle_area_m2;
    let (height_m, governing) = if residence_height_m >= input.min_column_height_m {
        (residence_height_m, HoldupConstraint::ResidenceTime)
    } else {
        (input.min_column_height_m, HoldupConstraint::MinimumColumnHeight)
    };
    let holdup = Holdup {
        residence_height_m,
        height_m,
        volume_m3: height_m * nozzle_area_m2,
        governing,
    };

    let pressure_drop_with = |condition: StrainerCondition| {
        let mut fittings = vec![
            FittingSpec::new(FittingType::EntranceSharp, 1),
            FittingSpec::new(valve, 1),
            FittingSpec::new(
                FittingType::Strainer {
                    kind: strainer,
                    condition,
                },
                1,
            ),
        ];
        if let Some(r) = reducer {
            fittings.push(FittingSpec::new(r, 1));
        }
        if input.elbow_count > 0 {
            fittings.push(FittingSpec::new(FittingType::Elbow90LongRadius, input.elbow_count));
        }
        calculate_pressure_drop(&PressureDropInput {
            inner_diameter_mm: suction_pipe.pipe().inner_diameter_mm,
            length_m: input.suction_pipe_length_m,
            flow_rate_ton_hr: input.flow_rate_ton_hr,
            density_kg_m3: rho,
            viscosity_pa_s: mu,
            roughness_mm: input.roughness_mm,
            elevation_change_m: 0.0,
            fittings,
        })
    };
    let clean_drop = pressure_drop_with(StrainerCondition::Clean)?;
    let dirty_drop = pressure_drop_with(StrainerCondition::Dirty)?;

    let npsha_at = |static_head_m: f64, friction_loss_m: f64| {
        calculate_npsha(
            &NpshaInput {
                vessel: VesselPressure::Vacuum {
                    pressure_bar: p_bar,
                },
                static_head_m,
                liquid_temperature_c: fluid.temperature_c,
                salinity_ppm: input.salinity_ppm,
                friction_loss_m,
                npshr_m: Some(input.npshr_m),
            },
            props,
        )
    };

    let (elevation_m, required_elevation_m) = match input.mode {
        ElevationMode::FindElevation => {
            // Hp - Hv
            let pressure_margin = npsha_at(0.0, 0.0)?.npsha_m;
            let required = input.npshr_m + input.safety_margin_m - pressure_margin
                + dirty_drop.total_pressure_drop_mh2o;
            let elevation = required.max(0.0);
            debug!(required, "suction elevation solved");
            (elevation, Some(required))
        }
        ElevationMode::VerifyElevation { elevation_m } => (elevation_m, None),
    };

    let evaluate = |condition: StrainerCondition,
                    drop: PressureDropResult|
     -> Result<SuctionCase, CalcError> {
        let npsha = npsha_at(elevation_m, drop.total_pressure_drop_mh2o)?;
        let margin_m = npsha.npsha_m - input.npshr_m;
        Ok(SuctionCase {
            condition,
            is_adequate: margin_m >= input.safety_margin_m - MARGIN_TOLERANCE_M,
            margin_m,
            pressure_drop: drop,
            npsha,
        })
    };
    let clean = evaluate(StrainerCondition::Clean, clean_drop)?;
    let dirty = evaluate(StrainerCondition::Dirty, dirty_drop)?;

    if !clean.is_adequate {
        warnings.push(format!(
            "NPSH margin {:.2} m with a clean strainer is below the required {:.2} m",
            clean.margin_m, input.safety_margin_m
        ));
    }
    if !dirty.is_adequate {
        warnings.push(format!(
            "NPSH margin {:.2} m with a dirty strainer is below the required {:.2} m; raise the vessel or clean the strainer more often",
            dirty.margin_m, input.safety_margin_m
        ));
    }

    Ok(SuctionResult {
        fluid,
        density_kg_m3: rho,
        viscosity_pa_s: mu,
        components: SuctionComponents {
            valve,
            strainer,
            reducer_beta: reducer.map(|_| beta),
            reducer_k: reducer.map(|r| r.k_factor()),
        },
        nozzle_pipe,
        suction_pipe,
        holdup,
        elevation_m,
        required_elevation_m,
        clean,
        dirty,
        warnings,
    })
}
