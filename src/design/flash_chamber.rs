//! 플래시 챔버 설계.
//!
//! 단일 패스 계산이다.
//! 1. 입력 검증
//! 2. 열/물질 수지 (급수량 기준 또는 증기량 역산)
//! 3. 증기 부하 2 ton/hr·m²로 동체 직경 결정, 100 mm 단위 올림
//! 4. 체류/플래싱/분무 구간 높이
//! 5. 입구/농축수/증기 노즐 선정
//! 6. 농축수 펌프 NPSHa (진공 용기)
//! 7. BTL 기준 고도표

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalcError, ValidationReport};
use crate::piping::catalog::PipeCatalog;
use crate::piping::selector::{select_by_velocity, SizedPipe, VelocityLimits, VelocityStatus};
use crate::properties::seawater::MAX_SALINITY_PPM;
use crate::properties::PropertyProvider;
use crate::thermal::flash::flash_split;
use crate::thermal::npsha::{calculate_npsha, NpshaInput, NpshaResult, VesselPressure};
use crate::units::flow::{convert_mass_flow, MassFlowUnit};
use crate::units::ton_hr_to_kg_s;

/// 단면 증기 부하 [ton/hr per m²]
pub const VAPOR_LOADING_TON_HR_M2: f64 = 2.0;
pub const MIN_OPERATING_PRESSURE_MBAR: f64 = 50.0;
pub const MAX_OPERATING_PRESSURE_MBAR: f64 = 1000.0;
pub const MIN_WATER_FLOW_TON_HR: f64 = 0.1;
pub const MAX_WATER_FLOW_TON_HR: f64 = 10_000.0;
pub const MIN_VAPOR_FLOW_TON_HR: f64 = 0.01;
pub const MAX_VAPOR_FLOW_TON_HR: f64 = 1_000.0;
/// 직경 올림 단위 [mm]
pub const DIAMETER_STEP_MM: f64 = 100.0;
pub const FLASHING_ZONE_HEIGHT_M: f64 = 0.5;
pub const VAPOR_HEADSPACE_M: f64 = 0.5;
pub const MIN_RETENTION_HEIGHT_M: f64 = 0.3;
/// BTL에서 액면계 하부 탭까지 [m]
pub const LEVEL_GAUGE_LOW_OFFSET_M: f64 = 0.1;
/// 흡입 배관 마찰손실 추정치 [m]
pub const NPSHA_FRICTION_ESTIMATE_M: f64 = 0.5;
pub const NPSH_MARGIN_M: f64 = 0.5;
/// 이 이상의 플래시 분율은 비말 동반 위험 경고
pub const HIGH_FLASH_FRACTION: f64 = 0.1;

pub const INLET_VELOCITY_LIMITS: VelocityLimits = VelocityLimits::new(1.0, 3.0);
pub const BRINE_VELOCITY_LIMITS: VelocityLimits = VelocityLimits::new(0.5, 1.5);
pub const VAPOR_VELOCITY_LIMITS: VelocityLimits = VelocityLimits::new(15.0, 30.0);

fn default_retention_time_min() -> f64 {
    2.0
}
fn default_spray_angle_deg() -> f64 {
    90.0
}
fn default_inlet_velocity() -> f64 {
    2.0
}
fn default_brine_velocity() -> f64 {
    1.0
}
fn default_vapor_velocity() -> f64 {
    20.0
}
fn default_pump_offset_m() -> f64 {
    1.0
}

/// 주어진 유량의 종류.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FlashMode {
    /// 급수량을 주고 플래시 증기량을 구한다
    WaterFlow { water_flow: f64 },
    /// 필요한 증기량을 주고 급수량을 역산한다
    VaporQuantity { vapor_flow: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashChamberInput {
    #[serde(flatten)]
    pub mode: FlashMode,
    /// `mode` 유량의 단위
    #[serde(default)]
    pub flow_unit: MassFlowUnit,
    pub operating_pressure_mbar: f64,
    pub inlet_temperature_c: f64,
    pub salinity_ppm: f64,
    #[serde(default = "default_retention_time_min")]
    pub retention_time_min: f64,
    /// 분무 노즐 전각 [deg]
    #[serde(default = "default_spray_angle_deg")]
    pub spray_angle_deg: f64,
    #[serde(default = "default_inlet_velocity")]
    pub inlet_velocity_m_s: f64,
    #[serde(default = "default_brine_velocity")]
    pub brine_velocity_m_s: f64,
    #[serde(default = "default_vapor_velocity")]
    pub vapor_velocity_m_s: f64,
    /// BTL 아래 펌프 중심 깊이 [m]
    #[serde(default = "default_pump_offset_m")]
    pub pump_centerline_below_btl_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npshr_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatBalanceRow {
    pub stream: String,
    pub flow_ton_hr: f64,
    pub temperature_c: f64,
    pub pressure_mbar: f64,
    pub salinity_ppm: f64,
    pub enthalpy_kj_kg: f64,
    /// ṁ·h [kW]
    pub energy_kw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChamberSizing {
    pub required_area_m2: f64,
    pub diameter_m: f64,
    pub cross_section_area_m2: f64,
    pub actual_loading_ton_hr_m2: f64,
    pub brine_holdup_m3: f64,
    pub retention_height_m: f64,
    pub flashing_zone_height_m: f64,
    pub spray_zone_height_m: f64,
    pub headspace_height_m: f64,
    /// BTL-TTL
    pub total_height_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NozzleService {
    Inlet,
    BrineOutlet,
    VaporOutlet,
}

impl NozzleService {
    pub fn name(self) -> &'static str {
        match self {
            NozzleService::Inlet => "Feed inlet",
            NozzleService::BrineOutlet => "Brine outlet",
            NozzleService::VaporOutlet => "Vapour outlet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nozzle {
    pub service: NozzleService,
    pub mass_flow_ton_hr: f64,
    pub density_kg_m3: f64,
    pub volumetric_flow_m3_h: f64,
    pub target_velocity_m_s: f64,
    pub sizing: SizedPipe,
}

/// BTL = 0 기준 고도 [m].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationMap {
    pub ttl_m: f64,
    pub vapor_outlet_m: f64,
    pub inlet_nozzle_m: f64,
    pub level_gauge_high_m: f64,
    pub normal_liquid_level_m: f64,
    pub level_gauge_low_m: f64,
    pub brine_outlet_m: f64,
    pub btl_m: f64,
    pub pump_centerline_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlashChamberResult {
    pub operating_pressure_bar: f64,
    pub saturation_temperature_c: f64,
    pub boiling_point_elevation_c: f64,
    pub brine_temperature_c: f64,
    pub flash_fraction: f64,
    pub water_flow_ton_hr: f64,
    pub vapor_flow_ton_hr: f64,
    pub brine_flow_ton_hr: f64,
    pub brine_salinity_ppm: f64,
    pub heat_balance: Vec<HeatBalanceRow>,
    pub chamber: ChamberSizing,
    pub nozzles: Vec<Nozzle>,
    pub npsha: NpshaResult,
    /// NPSHa - 여유 [m]. 펌프 NPSHr은 이보다 작아야 한다
    pub max_allowable_npshr_m: f64,
    pub elevations: ElevationMap,
    pub warnings: Vec<String>,
}

fn check_velocity(report: &mut ValidationReport, label: &str, value: f64, limits: VelocityLimits) {
    if value <= 0.0 {
        report.error(format!("{label} velocity must be greater than 0 m/s"));
    } else if limits.classify(value) != VelocityStatus::Ok {
        report.warn(format!(
            "{label} velocity {value:.2} m/s is outside the recommended range {}-{} m/s",
            limits.min_m_s, limits.max_m_s
        ));
    }
}

pub fn validate_flash_chamber(
    input: &FlashChamberInput,
    props: &dyn PropertyProvider,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    let p_mbar = input.operating_pressure_mbar;
    let pressure_ok = (MIN_OPERATING_PRESSURE_MBAR..=MAX_OPERATING_PRESSURE_MBAR).contains(&p_mbar);
    if !pressure_ok {
        report.error(format!(
            "Operating pressure must be between {MIN_OPERATING_PRESSURE_MBAR} and {MAX_OPERATING_PRESSURE_MBAR} mbar(a), got {p_mbar}"
        ));
    }

    match input.mode {
        FlashMode::WaterFlow { water_flow } => {
            let t_h = convert_mass_flow(water_flow, input.flow_unit, MassFlowUnit::TonPerHour);
            if !(MIN_WATER_FLOW_TON_HR..=MAX_WATER_FLOW_TON_HR).contains(&t_h) {
                report.error(format!(
                    "Water flow rate must be between {MIN_WATER_FLOW_TON_HR} and {MAX_WATER_FLOW_TON_HR} ton/hr, got {t_h:.3}"
                ));
            }
        }
        FlashMode::VaporQuantity { vapor_flow } => {
            let t_h = convert_mass_flow(vapor_flow, input.flow_unit, MassFlowUnit::TonPerHour);
            if !(MIN_VAPOR_FLOW_TON_HR..=MAX_VAPOR_FLOW_TON_HR).contains(&t_h) {
                report.error(format!(
                    "Vapour flow rate must be between {MIN_VAPOR_FLOW_TON_HR} and {MAX_VAPOR_FLOW_TON_HR} ton/hr, got {t_h:.3}"
                ));
            }
        }
    }

    if !(0.0..=MAX_SALINITY_PPM).contains(&input.salinity_ppm) {
        report.error(format!(
            "Salinity must be between 0 and {MAX_SALINITY_PPM} ppm"
        ));
    }
    if input.retention_time_min <= 0.0 {
        report.error("Retention time must be greater than 0 min");
    }
    if !(input.spray_angle_deg > 0.0 && input.spray_angle_deg < 180.0) {
        report.error("Spray angle must be between 0 and 180 degrees");
    }
    if input.pump_centerline_below_btl_m < 0.0 {
        report.error("Pump centreline depth below BTL cannot be negative");
    }

    if pressure_ok && report.is_valid() {
        let p_bar = p_mbar / 1000.0;
        let saturation = props
            .saturation_temperature(p_bar)
            .and_then(|t| props.boiling_point_elevation(input.salinity_ppm, t).map(|b| t + b));
        match saturation {
            Ok(t_boil) if input.inlet_temperature_c <= t_boil => report.error(format!(
                "Inlet temperature {:.2} °C must exceed the saturation temperature {t_boil:.2} °C (incl. BPE) at the operating pressure",
                input.inlet_temperature_c
            )),
            Ok(_) => {}
            Err(e) => report.error(format!("Operating conditions: {e}")),
        }
    }

    check_velocity(&mut report, "Inlet nozzle", input.inlet_velocity_m_s, INLET_VELOCITY_LIMITS);
    check_velocity(&mut report, "Brine nozzle", input.brine_velocity_m_s, BRINE_VELOCITY_LIMITS);
    check_velocity(&mut report, "Vapour nozzle", input.vapor_velocity_m_s, VAPOR_VELOCITY_LIMITS);

    report
}

fn round_up_diameter_m(diameter_m: f64) -> f64 {
    (diameter_m * 1000.0 / DIAMETER_STEP_MM).ceil() * DIAMETER_STEP_MM / 1000.0
}

fn size_nozzle(
    service: NozzleService,
    mass_flow_ton_hr: f64,
    density_kg_m3: f64,
    target_velocity_m_s: f64,
    limits: VelocityLimits,
    catalog: &PipeCatalog,
    warnings: &mut Vec<String>,
) -> Result<Nozzle, CalcError> {
    let q_m3_s = ton_hr_to_kg_s(mass_flow_ton_hr) / density_kg_m3;
    let sizing = select_by_velocity(q_m3_s, target_velocity_m_s, limits, catalog)?;
    if !sizing.selected.is_exact_match {
        warnings.push(format!(
            "{} requires more area than the largest catalogue pipe; {} selected",
            service.name(),
            sizing.selected.display_name
        ));
    }
    match sizing.velocity_status {
        VelocityStatus::Ok => {}
        status => warnings.push(format!(
            "{} velocity {:.2} m/s is {:?} (range {}-{} m/s)",
            service.name(),
            sizing.actual_velocity_m_s,
            status,
            limits.min_m_s,
            limits.max_m_s
        )),
    }
    Ok(Nozzle {
        service,
        mass_flow_ton_hr,
        density_kg_m3,
        volumetric_flow_m3_h: q_m3_s * 3600.0,
        target_velocity_m_s,
        sizing,
    })
}

pub fn calculate_flash_chamber(
    input: &FlashChamberInput,
    props: &dyn PropertyProvider,
    catalog: &PipeCatalog,
) -> Result<FlashChamberResult, CalcError> {
    let mut warnings = validate_flash_chamber(input, props).into_result()?;

    // 열/물질 수지
    let p_bar = input.operating_pressure_mbar / 1000.0;
    let t_sat = props.saturation_temperature(p_bar)?;
    let bpe = props.boiling_point_elevation(input.salinity_ppm, t_sat)?;
    let t_brine = t_sat + bpe;

    let h_inlet = props.seawater_enthalpy(input.salinity_ppm, input.inlet_temperature_c)?;
    let h_brine = props.seawater_enthalpy(input.salinity_ppm, t_brine)?;
    let h_vapor = props.enthalpy_superheated(p_bar, t_brine)?;
    let split = flash_split(h_inlet, h_brine, h_vapor)?;
    let fraction = split.vapor_fraction;
    if fraction <= 0.0 {
        return Err(CalcError::invalid(
            "Inlet enthalpy does not exceed brine enthalpy; no flashing occurs",
        ));
    }

    let (water_flow, vapor_flow) = match input.mode {
        FlashMode::WaterFlow { water_flow } => {
            let w = convert_mass_flow(water_flow, input.flow_unit, MassFlowUnit::TonPerHour);
            (w, w * fraction)
        }
        FlashMode::VaporQuantity { vapor_flow } => {
            let v = convert_mass_flow(vapor_flow, input.flow_unit, MassFlowUnit::TonPerHour);
            (v / fraction, v)
        }
    };
    let brine_flow = water_flow - vapor_flow;
    let brine_salinity = props.brine_salinity(input.salinity_ppm, water_flow, vapor_flow);
    debug!(fraction, water_flow, vapor_flow, brine_flow, "flash chamber balance");

    if fraction > HIGH_FLASH_FRACTION {
        warnings.push(format!(
            "High flash fraction {:.1}%; check demister capacity for carry-over",
            fraction * 100.0
        ));
    }
    let brine_salinity_eval = if brine_salinity > MAX_SALINITY_PPM {
        warnings.push(format!(
            "Brine salinity {brine_salinity:.0} ppm exceeds the property correlation limit; properties evaluated at {MAX_SALINITY_PPM} ppm"
        ));
        MAX_SALINITY_PPM
    } else {
        brine_salinity
    };

    let heat_balance = vec![
        HeatBalanceRow {
            stream: "Feed".to_string(),
            flow_ton_hr: water_flow,
            temperature_c: input.inlet_temperature_c,
            pressure_mbar: input.operating_pressure_mbar,
            salinity_ppm: input.salinity_ppm,
            enthalpy_kj_kg: h_inlet,
            energy_kw: ton_hr_to_kg_s(water_flow) * h_inlet,
        },
        HeatBalanceRow {
            stream: "Vapour".to_string(),
            flow_ton_hr: vapor_flow,
            temperature_c: t_brine,
            pressure_mbar: input.operating_pressure_mbar,
            salinity_ppm: 0.0,
            enthalpy_kj_kg: h_vapor,
            energy_kw: ton_hr_to_kg_s(vapor_flow) * h_vapor,
        },
        HeatBalanceRow {
            stream: "Brine".to_string(),
            flow_ton_hr: brine_flow,
            temperature_c: t_brine,
            pressure_mbar: input.operating_pressure_mbar,
            salinity_ppm: brine_salinity,
            enthalpy_kj_kg: h_brine,
            energy_kw: ton_hr_to_kg_s(brine_flow) * h_brine,
        },
    ];

    // 동체 치수
    let required_area_m2 = vapor_flow / VAPOR_LOADING_TON_HR_M2;
    let diameter_m = round_up_diameter_m((4.0 * required_area_m2 / std::f64::consts::PI).sqrt());
    let area_m2 = std::f64::consts::PI * diameter_m * diameter_m / 4.0;

    let rho_inlet = props.seawater_density(input.salinity_ppm, input.inlet_temperature_c)?;
    let rho_brine = props.seawater_density(brine_salinity_eval, t_brine)?;
    let rho_vapor = 1.0 / props.specific_volume_superheated(p_bar, t_brine)?;

    let brine_holdup_m3 = ton_hr_to_kg_s(brine_flow) / rho_brine * input.retention_time_min * 60.0;
    let retention_height_m = (brine_holdup_m3 / area_m2).max(MIN_RETENTION_HEIGHT_M);
    let half_angle = (input.spray_angle_deg / 2.0).to_radians();
    let spray_zone_height_m = (diameter_m / 2.0) / half_angle.tan();
    let total_height_m =
        retention_height_m + FLASHING_ZONE_HEIGHT_M + spray_zone_height_m + VAPOR_HEADSPACE_M;

    let chamber = ChamberSizing {
        required_area_m2,
        diameter_m,
        cross_section_area_m2: area_m2,
        actual_loading_ton_hr_m2: vapor_flow / area_m2,
        brine_holdup_m3,
        retention_height_m,
        flashing_zone_height_m: FLASHING_ZONE_HEIGHT_M,
        spray_zone_height_m,
        headspace_height_m: VAPOR_HEADSPACE_M,
        total_height_m,
    };
    debug!(diameter_m, total_height_m, "flash chamber sized");

    // 노즐
    let nozzles = vec![
        size_nozzle(
            NozzleService::Inlet,
            water_flow,
            rho_inlet,
            input.inlet_velocity_m_s,
            INLET_VELOCITY_LIMITS,
            catalog,
            &mut warnings,
        )?,
        size_nozzle(
            NozzleService::BrineOutlet,
            brine_flow,
            rho_brine,
            input.brine_velocity_m_s,
            BRINE_VELOCITY_LIMITS,
            catalog,
            &mut warnings,
        )?,
        size_nozzle(
            NozzleService::VaporOutlet,
            vapor_flow,
            rho_vapor,
            input.vapor_velocity_m_s,
            VAPOR_VELOCITY_LIMITS,
            catalog,
            &mut warnings,
        )?,
    ];

    // 농축수 펌프 NPSHa. 증기압은 t_brine과 같은 입구 염분 기준
    let npsha = calculate_npsha(
        &NpshaInput {
            vessel: VesselPressure::Vacuum {
                pressure_bar: p_bar,
            },
            static_head_m: retention_height_m + input.pump_centerline_below_btl_m,
            liquid_temperature_c: t_brine,
            salinity_ppm: input.salinity_ppm,
            friction_loss_m: NPSHA_FRICTION_ESTIMATE_M,
            npshr_m: input.npshr_m,
        },
        props,
    )?;
    warnings.extend(npsha.warnings.iter().cloned());
    let max_allowable_npshr_m = npsha.npsha_m - NPSH_MARGIN_M;

    let inlet_nozzle_m = retention_height_m + FLASHING_ZONE_HEIGHT_M + spray_zone_height_m;
    let elevations = ElevationMap {
        ttl_m: total_height_m,
        vapor_outlet_m: total_height_m,
        inlet_nozzle_m,
        level_gauge_high_m: retention_height_m,
        normal_liquid_level_m: retention_height_m,
        level_gauge_low_m: LEVEL_GAUGE_LOW_OFFSET_M,
        brine_outlet_m: 0.0,
        btl_m: 0.0,
        pump_centerline_m: -input.pump_centerline_below_btl_m,
    };

    Ok(FlashChamberResult {
        operating_pressure_bar: p_bar,
        saturation_temperature_c: t_sat,
        boiling_point_elevation_c: bpe,
        brine_temperature_c: t_brine,
        flash_fraction: fraction,
        water_flow_ton_hr: water_flow,
        vapor_flow_ton_hr: vapor_flow,
        brine_flow_ton_hr: brine_flow,
        brine_salinity_ppm: brine_salinity,
        heat_balance,
        chamber,
        nozzles,
        npsha,
        max_allowable_npshr_m,
        elevations,
        warnings,
    })
}
