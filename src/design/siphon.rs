//! 효용 간 사이펀(U-bend) 배관 설계.
//!
//! 사이펀 높이가 배관 길이를, 길이가 마찰손실을, 마찰손실이 다시 높이를 정하므로
//! 고정점 반복으로 푼다. 반복은 10회로 제한하며 수렴을 보장하지 않는다.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CalcError, ValidationReport};
use crate::piping::catalog::{CatalogError, PipeCatalog, PipeVariant};
use crate::piping::fittings::{FittingSpec, FittingType};
use crate::piping::pressure_drop::{
    calculate_pressure_drop, PressureDropInput, PressureDropResult, DEFAULT_ROUGHNESS_MM,
};
use crate::piping::selector::{select_by_velocity, SizedPipe, VelocityLimits, VelocityStatus};
use crate::properties::{FluidState, PropertyProvider};
use crate::thermal::flash::flash_at_pressure;
use crate::units::{bar_to_head, ton_hr_to_m3_s};

pub const MAX_SIPHON_ITERATIONS: usize = 10;
pub const SIPHON_HEIGHT_TOLERANCE_M: f64 = 0.01;
/// 초기 추정 높이 = 정압 수두 × 1.3
pub const INITIAL_HEIGHT_FACTOR: f64 = 1.3;
pub const DEFAULT_SAFETY_FACTOR: f64 = 0.2;
pub const DEFAULT_SIPHON_VELOCITY_M_S: f64 = 1.0;
pub const DEFAULT_SIPHON_VELOCITY_LIMITS: VelocityLimits = VelocityLimits::new(0.5, 2.0);
/// 하강관 2상류 경고 기준 플래시 분율
const HIGH_FLASH_FRACTION: f64 = 0.05;

fn default_safety_factor() -> f64 {
    DEFAULT_SAFETY_FACTOR
}
fn default_roughness_mm() -> f64 {
    DEFAULT_ROUGHNESS_MM
}

/// 엘보 구성. 엘보 수와 횡방향 오프셋 기여가 함께 정해진다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElbowConfig {
    /// 평면 U자, 오프셋 없음
    #[default]
    Two,
    /// 오프셋 1회
    Three,
    /// 오프셋 2회
    Four,
}

impl ElbowConfig {
    pub fn elbow_count(self) -> u32 {
        match self {
            ElbowConfig::Two => 2,
            ElbowConfig::Three => 3,
            ElbowConfig::Four => 4,
        }
    }

    /// 배관 길이에 더해지는 횡방향 길이 [m]
    pub fn lateral_length_m(self, lateral_offset_m: f64) -> f64 {
        match self {
            ElbowConfig::Two => 0.0,
            ElbowConfig::Three => lateral_offset_m,
            ElbowConfig::Four => 2.0 * lateral_offset_m,
        }
    }
}

/// 배관 규격 지정 방식.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipeChoice {
    /// 목표 유속으로 자동 선정
    Auto {
        target_velocity_m_s: f64,
        min_velocity_m_s: f64,
        max_velocity_m_s: f64,
    },
    /// 카탈로그 NPS 지정
    Nps { nps: String },
    /// 사용자 내경
    Custom { inner_diameter_mm: f64 },
}

impl Default for PipeChoice {
    fn default() -> Self {
        PipeChoice::Auto {
            target_velocity_m_s: DEFAULT_SIPHON_VELOCITY_M_S,
            min_velocity_m_s: DEFAULT_SIPHON_VELOCITY_LIMITS.min_m_s,
            max_velocity_m_s: DEFAULT_SIPHON_VELOCITY_LIMITS.max_m_s,
        }
    }
}

impl PipeChoice {
    fn limits(&self) -> VelocityLimits {
        match *self {
            PipeChoice::Auto {
                min_velocity_m_s,
                max_velocity_m_s,
                ..
            } => VelocityLimits::new(min_velocity_m_s, max_velocity_m_s),
            _ => DEFAULT_SIPHON_VELOCITY_LIMITS,
        }
    }

    fn resolve(&self, q_m3_s: f64, catalog: &PipeCatalog) -> Result<SizedPipe, CalcError> {
        let limits = self.limits();
        match self {
            PipeChoice::Auto {
                target_velocity_m_s,
                ..
            } => Ok(select_by_velocity(q_m3_s, *target_velocity_m_s, limits, catalog)?),
            PipeChoice::Nps { nps } => {
                let pipe = catalog.find_by_nps(nps).cloned().ok_or_else(|| {
                    CatalogError::SizeNotFound(format!("NPS {nps} (Sch {})", catalog.schedule))
                })?;
                Ok(SizedPipe::fixed(pipe, q_m3_s, limits))
            }
            PipeChoice::Custom { inner_diameter_mm } => Ok(SizedPipe::fixed(
                PipeVariant::custom(*inner_diameter_mm),
                q_m3_s,
                limits,
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiphonInput {
    pub upstream_pressure_mbar: f64,
    pub downstream_pressure_mbar: f64,
    pub flow_rate_ton_hr: f64,
    pub salinity_ppm: f64,
    /// 두 효용 노즐 사이 수평 거리 [m]
    pub horizontal_distance_m: f64,
    #[serde(default)]
    pub lateral_offset_m: f64,
    #[serde(default)]
    pub elbow_config: ElbowConfig,
    #[serde(default)]
    pub pipe: PipeChoice,
    #[serde(default = "default_safety_factor")]
    pub safety_factor: f64,
    #[serde(default = "default_roughness_mm")]
    pub roughness_mm: f64,
}

/// 하류 압력에서의 플래시.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiphonFlash {
    pub flash_occurs: bool,
    pub flash_vapor_fraction: f64,
    pub flash_vapor_ton_hr: f64,
    pub remaining_liquid_ton_hr: f64,
    pub downstream_temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiphonResult {
    pub fluid: FluidState,
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
    /// 압력차 수두 [m]
    pub static_head_m: f64,
    pub pipe: SizedPipe,
    /// 요구 U-bend 높이 [m]
    pub siphon_height_m: f64,
    pub pipe_length_m: f64,
    pub friction_head_m: f64,
    pub pressure_drop: PressureDropResult,
    pub iterations: usize,
    pub converged: bool,
    pub flash: SiphonFlash,
    pub warnings: Vec<String>,
}

pub fn validate_siphon(input: &SiphonInput) -> ValidationReport {
    let mut report = ValidationReport::new();
    if input.downstream_pressure_mbar <= 0.0 {
        report.error("Downstream pressure must be greater than 0 mbar(a)");
    }
    if input.upstream_pressure_mbar <= input.downstream_pressure_mbar {
        report.error("Upstream pressure must be greater than downstream pressure");
    }
    if input.flow_rate_ton_hr <= 0.0 {
        report.error("Flow rate must be greater than 0 ton/hr");
    }
    if input.salinity_ppm < 0.0 {
        report.error("Salinity cannot be negative");
    }
    if input.horizontal_distance_m < 0.0 || input.lateral_offset_m < 0.0 {
        report.error("Horizontal distance and lateral offset cannot be negative");
    }
    if input.safety_factor < 0.0 {
        report.error("Safety factor cannot be negative");
    }
    match &input.pipe {
        PipeChoice::Auto {
            target_velocity_m_s,
            min_velocity_m_s,
            max_velocity_m_s,
        } => {
            if *target_velocity_m_s <= 0.0 {
                report.error("Target velocity must be greater than 0 m/s");
            }
            if min_velocity_m_s > max_velocity_m_s {
                report.error("Minimum velocity cannot exceed maximum velocity");
            }
        }
        PipeChoice::Nps { nps } if nps.trim().is_empty() => report.error("NPS must not be empty"),
        PipeChoice::Nps { .. } => {}
        PipeChoice::Custom { inner_diameter_mm } => {
            if *inner_diameter_mm <= 0.0 {
                report.error("Custom inner diameter must be greater than 0 mm");
            }
        }
    }
    if input.elbow_config == ElbowConfig::Two && input.lateral_offset_m > 0.0 {
        report.warn("Lateral offset is ignored with the two-elbow configuration");
    }
    report
}

pub fn calculate_siphon(
    input: &SiphonInput,
    props: &dyn PropertyProvider,
    catalog: &PipeCatalog,
) -> Result<SiphonResult, CalcError> {
    let mut warnings = validate_siphon(input).into_result()?;

    let p_up = input.upstream_pressure_mbar / 1000.0;
    let p_down = input.downstream_pressure_mbar / 1000.0;
    let fluid = FluidState::saturated_liquid(p_up, input.salinity_ppm, props)?;
    let rho = fluid.density(props)?;
    let mu = fluid.viscosity(props)?;

    let q_m3_s = ton_hr_to_m3_s(input.flow_rate_ton_hr, rho);
    let pipe = input.pipe.resolve(q_m3_s, catalog)?;
    if pipe.velocity_status != VelocityStatus::Ok {
        warnings.push(format!(
            "Siphon velocity {:.2} m/s is {:?} for {}",
            pipe.actual_velocity_m_s,
            pipe.velocity_status,
            pipe.selected.display_name
        ));
    }

    let static_head_m = bar_to_head(p_up - p_down, rho);
    let fittings = vec![
        FittingSpec::new(FittingType::EntranceSharp, 1),
        FittingSpec::new(FittingType::Elbow90Standard, input.elbow_config.elbow_count()),
        FittingSpec::new(FittingType::Exit, 1),
    ];
    let fixed_length = input.horizontal_distance_m
        + input.elbow_config.lateral_length_m(input.lateral_offset_m);
    let pressure_drop_at = |height_m: f64| {
        calculate_pressure_drop(&PressureDropInput {
            inner_diameter_mm: pipe.pipe().inner_diameter_mm,
            length_m: fixed_length + 2.0 * height_m,
            flow_rate_ton_hr: input.flow_rate_ton_hr,
            density_kg_m3: rho,
            viscosity_pa_s: mu,
            roughness_mm: input.roughness_mm,
            elevation_change_m: 0.0,
            fittings: fittings.clone(),
        })
    };

    let mut height = INITIAL_HEIGHT_FACTOR * static_head_m;
    let mut iterations = 0;
    let mut converged = false;
    while iterations < MAX_SIPHON_ITERATIONS {
        iterations += 1;
        let friction = pressure_drop_at(height)?.total_pressure_drop_mh2o;
        let next = (static_head_m + friction) * (1.0 + input.safety_factor);
        let delta = (next - height).abs();
        debug!(iterations, height, next, "siphon iteration");
        height = next;
        if delta < SIPHON_HEIGHT_TOLERANCE_M {
            converged = true;
            break;
        }
    }
    if !converged {
        warn!(iterations, height, "siphon height did not converge");
        warnings.push(format!(
            "Siphon height did not converge within {MAX_SIPHON_ITERATIONS} iterations; last estimate {height:.3} m"
        ));
    }

    let pressure_drop = pressure_drop_at(height)?;
    warnings.extend(pressure_drop.warnings.iter().cloned());

    // 상류 포화 액은 하류 압력에서 항상 과열 상태이므로 플래시가 발생한다
    let h_in = fluid.enthalpy(props)?;
    let split = flash_at_pressure(h_in, p_down, input.salinity_ppm, props)?;
    let downstream_t_sat = props.saturation_temperature(p_down)?;
    let downstream_temperature_c =
        downstream_t_sat + props.boiling_point_elevation(input.salinity_ppm, downstream_t_sat)?;
    if split.vapor_fraction > HIGH_FLASH_FRACTION {
        warnings.push(format!(
            "Flash fraction {:.1}% at the downstream effect; expect two-phase flow at the outlet",
            split.vapor_fraction * 100.0
        ));
    }
    let flash_vapor_ton_hr = input.flow_rate_ton_hr * split.vapor_fraction;

    Ok(SiphonResult {
        fluid,
        density_kg_m3: rho,
        viscosity_pa_s: mu,
        static_head_m,
        siphon_height_m: height,
        pipe_length_m: fixed_length + 2.0 * height,
        friction_head_m: pressure_drop.total_pressure_drop_mh2o,
        pressure_drop,
        pipe,
        iterations,
        converged,
        flash: SiphonFlash {
            flash_occurs: split.flash_occurs(),
            flash_vapor_fraction: split.vapor_fraction,
            flash_vapor_ton_hr,
            remaining_liquid_ton_hr: input.flow_rate_ton_hr - flash_vapor_ton_hr,
            downstream_temperature_c,
        },
        warnings,
    })
}
