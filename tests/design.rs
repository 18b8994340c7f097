use approx::assert_relative_eq;
use desal_design_toolbox::design::flash_chamber::{
    calculate_flash_chamber, validate_flash_chamber, FlashChamberInput, FlashMode,
};
use desal_design_toolbox::design::siphon::{
    calculate_siphon, validate_siphon, ElbowConfig, PipeChoice, SiphonInput,
};
use desal_design_toolbox::design::suction::{
    calculate_suction, select_components, ElevationMode, HoldupConstraint, SuctionInput,
};
use desal_design_toolbox::piping::catalog::{CatalogError, PipeCatalog};
use desal_design_toolbox::piping::fittings::{FittingType, StrainerType};
use desal_design_toolbox::properties::SteamSeawater;
use desal_design_toolbox::units::MassFlowUnit;
use desal_design_toolbox::CalcError;
use proptest::prelude::*;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "{label} expected {expected} got {actual} (tol {tol})"
    );
}

fn catalog() -> PipeCatalog {
    PipeCatalog::standard("40").expect("sch 40")
}

// ---------------- flash chamber ----------------

fn flash_input(pressure_mbar: f64, water_flow: f64) -> FlashChamberInput {
    FlashChamberInput {
        mode: FlashMode::WaterFlow { water_flow },
        flow_unit: MassFlowUnit::TonPerHour,
        operating_pressure_mbar: pressure_mbar,
        inlet_temperature_c: 70.0,
        salinity_ppm: 35_000.0,
        retention_time_min: 2.0,
        spray_angle_deg: 90.0,
        inlet_velocity_m_s: 2.0,
        brine_velocity_m_s: 1.0,
        vapor_velocity_m_s: 20.0,
        pump_centerline_below_btl_m: 1.0,
        npshr_m: None,
    }
}

#[test]
fn flash_chamber_pressure_bounds() {
    let props = SteamSeawater;
    let mut input = flash_input(50.0, 100.0);
    input.inlet_temperature_c = 45.0;
    assert!(validate_flash_chamber(&input, &props).is_valid());

    input.operating_pressure_mbar = 49.0;
    let report = validate_flash_chamber(&input, &props);
    assert!(!report.is_valid());
    assert!(report.errors.iter().any(|e| e.contains("Operating pressure")));
}

#[test]
fn flash_chamber_requires_superheated_feed() {
    let props = SteamSeawater;
    let mut input = flash_input(200.0, 100.0);
    input.inlet_temperature_c = 55.0;
    let err = calculate_flash_chamber(&input, &props, &catalog()).unwrap_err();
    assert!(err.to_string().contains("Inlet temperature"));
}

#[test]
fn flash_chamber_balances_mass_and_energy() {
    let props = SteamSeawater;
    let res = calculate_flash_chamber(&flash_input(200.0, 100.0), &props, &catalog())
        .expect("flash chamber");

    assert!(res.flash_fraction > 0.0 && res.flash_fraction < 0.05);
    assert!(
        (res.water_flow_ton_hr - res.vapor_flow_ton_hr - res.brine_flow_ton_hr).abs() < 0.1
    );
    let [feed, vapour, brine] = [&res.heat_balance[0], &res.heat_balance[1], &res.heat_balance[2]];
    assert_relative_eq!(
        feed.energy_kw,
        vapour.energy_kw + brine.energy_kw,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        res.brine_salinity_ppm * res.brine_flow_ton_hr,
        35_000.0 * res.water_flow_ton_hr,
        max_relative = 1e-9
    );
    assert_eq!(vapour.salinity_ppm, 0.0);
    assert!(res.brine_temperature_c > res.saturation_temperature_c);
}

#[test]
fn flash_chamber_geometry() {
    let props = SteamSeawater;
    let res = calculate_flash_chamber(&flash_input(200.0, 100.0), &props, &catalog())
        .expect("flash chamber");
    let c = &res.chamber;
    let steps = c.diameter_m * 10.0;
    assert_close("100 mm step", steps, steps.round(), 1e-9);
    assert!(c.cross_section_area_m2 >= c.required_area_m2);
    assert!(c.actual_loading_ton_hr_m2 <= 2.0);
    // 90° 분무각: 분무 높이 = 반경
    assert_close("spray", c.spray_zone_height_m, c.diameter_m / 2.0, 1e-9);
    assert_close(
        "total",
        c.total_height_m,
        c.retention_height_m + c.flashing_zone_height_m + c.spray_zone_height_m + c.headspace_height_m,
        1e-12,
    );

    let e = &res.elevations;
    assert_eq!(e.btl_m, 0.0);
    assert_eq!(e.pump_centerline_m, -1.0);
    assert_eq!(e.ttl_m, c.total_height_m);
    assert!(e.level_gauge_low_m < e.level_gauge_high_m);
    assert!(e.inlet_nozzle_m > e.level_gauge_high_m && e.inlet_nozzle_m < e.ttl_m);

    assert_eq!(res.nozzles.len(), 3);
    assert_close(
        "max NPSHr",
        res.max_allowable_npshr_m,
        res.npsha.npsha_m - 0.5,
        1e-12,
    );
}

#[test]
fn brine_pump_sees_no_pressure_margin_at_saturation() {
    let props = SteamSeawater;
    let res = calculate_flash_chamber(&flash_input(200.0, 100.0), &props, &catalog())
        .expect("flash chamber");
    let npsha = &res.npsha;
    // 포화 액체: Hp - Hv ≈ 0
    assert_close(
        "Hp - Hv",
        npsha.pressure_head_m - npsha.vapor_pressure_head_m,
        0.0,
        0.01,
    );
    assert_close(
        "NPSHa",
        npsha.npsha_m,
        res.chamber.retention_height_m + 1.0 - 0.5,
        0.01,
    );
}

#[test]
fn designers_are_repeatable() {
    let props = SteamSeawater;
    let flash = flash_input(200.0, 100.0);
    assert_eq!(
        calculate_flash_chamber(&flash, &props, &catalog()).unwrap(),
        calculate_flash_chamber(&flash, &props, &catalog()).unwrap()
    );

    let siphon = siphon_input(300.0, 200.0, 50.0);
    assert_eq!(
        calculate_siphon(&siphon, &props, &catalog()).unwrap(),
        calculate_siphon(&siphon, &props, &catalog()).unwrap()
    );

    let suction = suction_input(ElevationMode::FindElevation);
    assert_eq!(
        calculate_suction(&suction, &props, &catalog()).unwrap(),
        calculate_suction(&suction, &props, &catalog()).unwrap()
    );
}

#[test]
fn flash_chamber_diameter_grows_with_flow() {
    let props = SteamSeawater;
    let small = calculate_flash_chamber(&flash_input(200.0, 50.0), &props, &catalog()).unwrap();
    let large = calculate_flash_chamber(&flash_input(200.0, 500.0), &props, &catalog()).unwrap();
    assert!(large.chamber.diameter_m > small.chamber.diameter_m);
}

#[test]
fn vapour_mode_inverts_water_mode() {
    let props = SteamSeawater;
    let forward = calculate_flash_chamber(&flash_input(200.0, 100.0), &props, &catalog()).unwrap();
    let mut input = flash_input(200.0, 0.0);
    input.mode = FlashMode::VaporQuantity {
        vapor_flow: forward.vapor_flow_ton_hr,
    };
    let back = calculate_flash_chamber(&input, &props, &catalog()).unwrap();
    assert_relative_eq!(back.water_flow_ton_hr, 100.0, max_relative = 1e-9);
    assert_eq!(back.chamber.diameter_m, forward.chamber.diameter_m);
}

#[test]
fn flash_chamber_input_reads_from_toml() {
    let input: FlashChamberInput = toml::from_str(
        r#"
        mode = "vapor_quantity"
        vapor_flow = 2.5
        operating_pressure_mbar = 150.0
        inlet_temperature_c = 65.0
        salinity_ppm = 40000.0
        "#,
    )
    .expect("toml");
    assert_eq!(input.mode, FlashMode::VaporQuantity { vapor_flow: 2.5 });
    assert_eq!(input.flow_unit, MassFlowUnit::TonPerHour);
    assert_eq!(input.retention_time_min, 2.0);
    assert_eq!(input.npshr_m, None);
}

// ---------------- siphon ----------------

fn siphon_input(upstream: f64, downstream: f64, flow: f64) -> SiphonInput {
    SiphonInput {
        upstream_pressure_mbar: upstream,
        downstream_pressure_mbar: downstream,
        flow_rate_ton_hr: flow,
        salinity_ppm: 60_000.0,
        horizontal_distance_m: 5.0,
        lateral_offset_m: 0.0,
        elbow_config: ElbowConfig::Two,
        pipe: PipeChoice::default(),
        safety_factor: 0.2,
        roughness_mm: 0.045,
    }
}

#[test]
fn siphon_height_covers_static_head_and_friction() {
    let props = SteamSeawater;
    let res = calculate_siphon(&siphon_input(300.0, 200.0, 50.0), &props, &catalog())
        .expect("siphon");
    assert!(res.converged);
    assert!(res.iterations <= 10);
    assert!(res.siphon_height_m > res.static_head_m * 1.2);
    assert_close(
        "height",
        res.siphon_height_m,
        (res.static_head_m + res.friction_head_m) * 1.2,
        0.02,
    );
    assert_close("length", res.pipe_length_m, 5.0 + 2.0 * res.siphon_height_m, 1e-12);
    assert_relative_eq!(
        res.flash.flash_vapor_ton_hr + res.flash.remaining_liquid_ton_hr,
        50.0,
        max_relative = 1e-12
    );
}

#[test]
fn siphon_fixed_pipe_choices() {
    let props = SteamSeawater;
    let mut input = siphon_input(300.0, 200.0, 50.0);
    input.pipe = PipeChoice::Nps { nps: "4".into() };
    let res = calculate_siphon(&input, &props, &catalog()).expect("nps");
    assert_eq!(res.pipe.pipe().nps, "4");

    input.pipe = PipeChoice::Custom {
        inner_diameter_mm: 150.0,
    };
    let res = calculate_siphon(&input, &props, &catalog()).expect("custom");
    assert!(res.pipe.pipe().is_custom);
    assert_eq!(res.pipe.pipe().inner_diameter_mm, 150.0);

    input.pipe = PipeChoice::Nps { nps: "7".into() };
    assert!(matches!(
        calculate_siphon(&input, &props, &catalog()),
        Err(CalcError::Catalog(CatalogError::SizeNotFound(_)))
    ));
}

#[test]
fn siphon_lateral_offset_adds_length() {
    let props = SteamSeawater;
    let mut input = siphon_input(300.0, 200.0, 50.0);
    input.elbow_config = ElbowConfig::Four;
    input.lateral_offset_m = 1.5;
    let res = calculate_siphon(&input, &props, &catalog()).expect("siphon");
    assert_close(
        "length",
        res.pipe_length_m,
        5.0 + 3.0 + 2.0 * res.siphon_height_m,
        1e-12,
    );
}

#[test]
fn siphon_requires_pressure_drop_across_effects() {
    let report = validate_siphon(&siphon_input(200.0, 200.0, 50.0));
    assert!(!report.is_valid());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn saturated_siphon_flow_always_flashes(
        upstream in 150.0f64..600.0,
        ratio in 0.3f64..0.9,
        flow in 10.0f64..200.0,
        salinity in 0.0f64..70_000.0,
    ) {
        let props = SteamSeawater;
        let mut input = siphon_input(upstream, upstream * ratio, flow);
        input.salinity_ppm = salinity;
        let res = calculate_siphon(&input, &props, &catalog()).unwrap();
        prop_assert!(res.flash.flash_occurs);
        prop_assert!(res.flash.flash_vapor_fraction > 0.0 && res.flash.flash_vapor_fraction < 1.0);
    }
}

// ---------------- pump suction ----------------

fn suction_input(mode: ElevationMode) -> SuctionInput {
    SuctionInput {
        effect_pressure_mbar: 150.0,
        salinity_ppm: 35_000.0,
        flow_rate_ton_hr: 50.0,
        npshr_m: 2.0,
        mode,
        suction_pipe_length_m: 5.0,
        elbow_count: 2,
        nozzle_velocity_m_s: 0.1,
        suction_velocity_m_s: 1.0,
        residence_time_s: 30.0,
        min_column_height_m: 0.5,
        safety_margin_m: 0.5,
        roughness_mm: 0.045,
    }
}

#[test]
fn component_rule_switches_at_four_inch() {
    assert_eq!(select_components(4.0), (FittingType::GateValve, StrainerType::Bucket));
    assert_eq!(select_components(3.0), (FittingType::BallValve, StrainerType::YType));
}

#[test]
fn find_elevation_meets_margin_with_dirty_strainer() {
    let props = SteamSeawater;
    let res = calculate_suction(&suction_input(ElevationMode::FindElevation), &props, &catalog())
        .expect("suction");
    assert!(res.elevation_m > 2.0);
    assert_close("dirty margin", res.dirty.margin_m, 0.5, 1e-9);
    assert!(res.dirty.is_adequate && res.clean.is_adequate);
    assert!(res.clean.margin_m > res.dirty.margin_m);
    assert!(
        res.dirty.pressure_drop.total_k_factor > res.clean.pressure_drop.total_k_factor
    );

    // 50 t/h → 6" 흡입 배관이므로 대구경 구성
    assert_eq!(res.components.strainer, StrainerType::Bucket);
    assert_eq!(res.components.valve, FittingType::GateValve);
    let beta = res.components.reducer_beta.expect("reducer");
    assert!(beta > 0.0 && beta < 1.0);
    assert_eq!(res.holdup.governing, HoldupConstraint::ResidenceTime);
}

#[test]
fn verify_elevation_flags_inadequate_height() {
    let props = SteamSeawater;
    let low = calculate_suction(
        &suction_input(ElevationMode::VerifyElevation { elevation_m: 0.5 }),
        &props,
        &catalog(),
    )
    .expect("low");
    assert!(!low.dirty.is_adequate);
    assert!(low.warnings.iter().any(|w| w.contains("dirty strainer")));
    assert_eq!(low.required_elevation_m, None);

    let high = calculate_suction(
        &suction_input(ElevationMode::VerifyElevation { elevation_m: 10.0 }),
        &props,
        &catalog(),
    )
    .expect("high");
    assert!(high.clean.is_adequate && high.dirty.is_adequate);
}

#[test]
fn small_flow_uses_minimum_column_height() {
    let props = SteamSeawater;
    let mut input = suction_input(ElevationMode::FindElevation);
    input.flow_rate_ton_hr = 2.0;
    input.residence_time_s = 0.0;
    let res = calculate_suction(&input, &props, &catalog()).expect("suction");
    assert_eq!(res.holdup.governing, HoldupConstraint::MinimumColumnHeight);
    assert_eq!(res.holdup.height_m, 0.5);
    assert_eq!(res.components.strainer, StrainerType::YType);
}
