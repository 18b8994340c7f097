use approx::assert_relative_eq;
use desal_design_toolbox::properties::{PropertyProvider, SteamSeawater};
use desal_design_toolbox::thermal::desuperheat::{calculate_desuperheat, DesuperheatInput};
use desal_design_toolbox::thermal::dosing::{calculate_dosing, DosingInput};
use desal_design_toolbox::thermal::heat_duty::{
    calculate_heat_duty, validate_heat_duty, HeatDutyInput,
};
use desal_design_toolbox::thermal::htc::{
    condensation_htc, overall_htc, tube_side_htc, CondensationInput, CondensingSurface,
    HeatingMode, OverallHtcInput, TubeSideInput,
};
use desal_design_toolbox::thermal::ncg::{calculate_ncg, NcgInput};
use desal_design_toolbox::thermal::npsha::recommendation;
use desal_design_toolbox::thermal::pump::{calculate_pump, select_motor_kw, PumpInput};
use desal_design_toolbox::thermal::{
    calculate_lmtd, calculate_mvc, calculate_npsha, calculate_tvc, flash_split, FlowArrangement,
    LmtdInput, MvcInput, NpshaInput, TvcInput, VesselPressure,
};
use desal_design_toolbox::units::pressure::ATMOSPHERIC_PRESSURE_BAR;
use proptest::prelude::*;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "{label} expected {expected} got {actual} (tol {tol})"
    );
}

fn lmtd_input(hi: f64, ho: f64, ci: f64, co: f64, arrangement: FlowArrangement) -> LmtdInput {
    LmtdInput {
        hot_inlet_c: hi,
        hot_outlet_c: ho,
        cold_inlet_c: ci,
        cold_outlet_c: co,
        arrangement,
    }
}

// ---------------- LMTD ----------------

#[test]
fn lmtd_temperature_cross_is_reported_not_raised() {
    let res = calculate_lmtd(&lmtd_input(80.0, 60.0, 70.0, 90.0, FlowArrangement::Counter));
    assert_eq!(res.lmtd_c, 0.0);
    assert!(res
        .warnings
        .iter()
        .any(|w| w.contains("Temperature cross detected")));
}

#[test]
fn lmtd_counter_current() {
    let res = calculate_lmtd(&lmtd_input(100.0, 60.0, 20.0, 50.0, FlowArrangement::Counter));
    assert_close("dT1", res.delta_t1_c, 50.0, 1e-12);
    assert_close("dT2", res.delta_t2_c, 40.0, 1e-12);
    assert_close("LMTD", res.lmtd_c, 10.0 / 1.25f64.ln(), 1e-9);
    assert_eq!(res.correction_factor, 1.0);
    assert!(res.warnings.is_empty());
}

#[test]
fn lmtd_equal_deltas_use_arithmetic_mean() {
    let res = calculate_lmtd(&lmtd_input(90.0, 70.0, 40.0, 60.0, FlowArrangement::Counter));
    assert!(res.lmtd_c.is_finite());
    assert_close("LMTD", res.lmtd_c, 30.0, 1e-12);
}

#[test]
fn crossflow_correction_is_bounded() {
    let res = calculate_lmtd(&lmtd_input(150.0, 90.0, 30.0, 80.0, FlowArrangement::Crossflow));
    assert!(res.correction_factor >= 0.7 && res.correction_factor <= 1.0);
    assert_close(
        "corrected",
        res.corrected_lmtd_c,
        res.lmtd_c * res.correction_factor,
        1e-12,
    );
}

// ---------------- NPSHa / pump ----------------

#[test]
fn npsha_open_tank() {
    let props = SteamSeawater;
    let res = calculate_npsha(
        &NpshaInput {
            vessel: VesselPressure::Open {
                atmospheric_pressure_bar: None,
            },
            static_head_m: 3.0,
            liquid_temperature_c: 25.0,
            salinity_ppm: 0.0,
            friction_loss_m: 1.0,
            npshr_m: Some(4.0),
        },
        &props,
    )
    .expect("npsha");
    assert_close("P", res.vessel_pressure_bar, ATMOSPHERIC_PRESSURE_BAR, 1e-12);
    assert_close("NPSHa", res.npsha_m, 12.04, 0.05);
    assert_close("margin", res.margin_m.unwrap(), res.npsha_m - 4.0, 1e-12);
    assert!(res.recommendation.starts_with("Excellent"));
    assert!(res.warnings.is_empty());
}

#[test]
fn npsha_recommendation_tiers() {
    assert!(recommendation(-0.5).starts_with("CRITICAL"));
    assert!(recommendation(0.5).starts_with("WARNING"));
    assert!(recommendation(1.5).contains("1.00"));
    assert!(recommendation(3.0).contains("2.00"));
    assert!(recommendation(6.0).starts_with("Excellent"));
}

fn pump_input(static_head_m: f64) -> PumpInput {
    PumpInput {
        flow_rate_ton_hr: 100.0,
        density_kg_m3: 1000.0,
        static_head_m,
        suction_pressure_bar: 1.01325,
        discharge_pressure_bar: 1.01325,
        suction_friction_head_m: 2.0,
        discharge_friction_head_m: 3.0,
        pump_efficiency: 0.70,
        motor_efficiency: 0.95,
    }
}

#[test]
fn pump_power_and_motor() {
    let res = calculate_pump(&pump_input(20.0)).expect("pump");
    assert_close("TDH", res.total_differential_head_m, 25.0, 1e-9);
    assert_close("hydraulic", res.hydraulic_power_kw, 6.8125, 1e-3);
    assert_relative_eq!(res.motor_power_kw, res.hydraulic_power_kw / 0.7 / 0.95, max_relative = 1e-12);
    assert_eq!(res.motor_rating_kw, 11.0);
}

#[test]
fn pump_negative_head_suggests_gravity_flow() {
    let mut input = pump_input(-30.0);
    input.suction_friction_head_m = 0.0;
    input.discharge_friction_head_m = 0.0;
    let res = calculate_pump(&input).expect("pump");
    assert!(res.total_differential_head_m < 0.0);
    assert!(res.warnings.iter().any(|w| w.contains("gravity flow may suffice")));
}

#[test]
fn pump_rejects_bad_efficiency() {
    let mut input = pump_input(10.0);
    input.pump_efficiency = 1.2;
    assert!(calculate_pump(&input).is_err());
}

#[test]
fn motor_selection_uses_iec_sizes() {
    assert_eq!(select_motor_kw(7.5), 7.5);
    assert_eq!(select_motor_kw(7.6), 11.0);
    assert_eq!(select_motor_kw(1_000.0), 500.0);
}

// ---------------- vapour compression ----------------

#[test]
fn mvc_half_to_one_bar() {
    let props = SteamSeawater;
    let res = calculate_mvc(&MvcInput::new(0.5, 1.0, 10.0), &props).expect("mvc");
    assert_eq!(res.compression_ratio, 2.0);
    assert!(res.shaft_power_kw > res.isentropic_power_kw);
    assert_relative_eq!(res.electrical_power_kw, res.shaft_power_kw / 0.95, max_relative = 1e-12);
    assert!(res.warnings.is_empty(), "{:?}", res.warnings);
    assert!(res.discharge_temperature_c > res.isentropic_discharge_temperature_c);
    assert!(res.isentropic_discharge_temperature_c > res.discharge_saturation_temperature_c);
}

#[test]
fn mvc_is_repeatable() {
    let props = SteamSeawater;
    let input = MvcInput::new(0.3, 0.5, 10.0);
    let first = calculate_mvc(&input, &props).expect("first");
    let second = calculate_mvc(&input, &props).expect("second");
    assert_eq!(first, second);
}

#[test]
fn mvc_rejects_reversed_pressures() {
    let props = SteamSeawater;
    let err = calculate_mvc(&MvcInput::new(1.0, 0.5, 10.0), &props).unwrap_err();
    assert!(err.to_string().contains("Discharge pressure must be greater"));
}

#[test]
fn mvc_warns_on_high_ratio() {
    let props = SteamSeawater;
    let res = calculate_mvc(&MvcInput::new(0.2, 1.0, 5.0), &props).expect("mvc");
    assert!(res.warnings.iter().any(|w| w.contains("Compression ratio")));
}

#[test]
fn mvc_power_is_proportional_to_flow() {
    let props = SteamSeawater;
    let one = calculate_mvc(&MvcInput::new(0.3, 0.5, 5.0), &props).unwrap();
    let two = calculate_mvc(&MvcInput::new(0.3, 0.5, 10.0), &props).unwrap();
    assert_relative_eq!(two.shaft_power_kw, 2.0 * one.shaft_power_kw, max_relative = 1e-9);
    assert_relative_eq!(two.specific_energy_kwh_ton, one.specific_energy_kwh_ton, max_relative = 1e-9);
}

#[test]
fn tvc_entrainment_ratio() {
    let props = SteamSeawater;
    let res = calculate_tvc(
        &TvcInput {
            motive_pressure_bar: 10.0,
            motive_temperature_c: None,
            suction_pressure_bar: 0.3,
            discharge_pressure_bar: 0.6,
            entrained_flow_ton_hr: 5.0,
            nozzle_efficiency: 0.90,
            mixing_efficiency: 0.90,
            diffuser_efficiency: 0.85,
        },
        &props,
    )
    .expect("tvc");
    assert_close("CR", res.compression_ratio, 2.0, 1e-12);
    assert!(res.entrainment_ratio > 0.0);
    assert_relative_eq!(
        res.motive_flow_ton_hr * res.entrainment_ratio,
        5.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        res.discharge_flow_ton_hr,
        res.motive_flow_ton_hr + 5.0,
        max_relative = 1e-12
    );
    // 포화 구동 증기는 흡입 압력까지 팽창하면 습증기가 된다
    let x = res.expanded_quality.expect("wet expansion");
    assert!(x > 0.0 && x < 1.0);
}

#[test]
fn tvc_rejects_motive_below_discharge() {
    let props = SteamSeawater;
    let input = TvcInput {
        motive_pressure_bar: 0.5,
        motive_temperature_c: None,
        suction_pressure_bar: 0.3,
        discharge_pressure_bar: 0.6,
        entrained_flow_ton_hr: 5.0,
        nozzle_efficiency: 0.9,
        mixing_efficiency: 0.9,
        diffuser_efficiency: 0.85,
    };
    assert!(calculate_tvc(&input, &props).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn mvc_power_rises_with_discharge_pressure(ps in 0.1f64..0.8, ratio in 1.2f64..2.5) {
        let props = SteamSeawater;
        let lo = calculate_mvc(&MvcInput::new(ps, ps * ratio, 10.0), &props).unwrap();
        let hi = calculate_mvc(&MvcInput::new(ps, ps * ratio * 1.1, 10.0), &props).unwrap();
        prop_assert!(hi.isentropic_power_kw > lo.isentropic_power_kw);
    }
}

// ---------------- flash / desuperheat / dosing / ncg / duty ----------------

#[test]
fn flash_split_clamps_to_unit_interval() {
    assert_eq!(flash_split(100.0, 200.0, 2600.0).unwrap().vapor_fraction, 0.0);
    assert_eq!(flash_split(3000.0, 200.0, 2600.0).unwrap().vapor_fraction, 1.0);
    let mid = flash_split(440.0, 200.0, 2600.0).unwrap();
    assert_close("fraction", mid.vapor_fraction, 0.1, 1e-12);
    assert!(mid.flash_occurs());
    assert!(flash_split(300.0, 200.0, 200.0).is_err());
}

fn desuperheat_input(target: f64) -> DesuperheatInput {
    DesuperheatInput {
        steam_flow_ton_hr: 10.0,
        steam_pressure_bar: 10.0,
        inlet_temperature_c: 300.0,
        target_temperature_c: target,
        spray_water_temperature_c: 100.0,
    }
}

#[test]
fn desuperheater_energy_balance() {
    let props = SteamSeawater;
    let res = calculate_desuperheat(&desuperheat_input(200.0), &props).expect("desuperheat");
    let m_s = 10.0;
    let m_w = res.spray_water_ton_hr;
    assert!(m_w > 0.8 && m_w < 1.1, "spray={m_w}");
    assert_relative_eq!(
        m_s * res.inlet_enthalpy_kj_kg + m_w * res.spray_water_enthalpy_kj_kg,
        (m_s + m_w) * res.outlet_enthalpy_kj_kg,
        max_relative = 1e-9
    );
    assert_relative_eq!(res.outlet_steam_ton_hr, m_s + m_w, max_relative = 1e-12);
}

#[test]
fn desuperheater_target_limits() {
    let props = SteamSeawater;
    let t_sat = props.saturation_temperature(10.0).unwrap();
    assert!(calculate_desuperheat(&desuperheat_input(t_sat - 5.0), &props).is_err());
    let near = calculate_desuperheat(&desuperheat_input(t_sat + 1.0), &props).expect("near sat");
    assert!(near.warnings.iter().any(|w| w.contains("of saturation")));
}

#[test]
fn desuperheater_requires_superheated_inlet() {
    let props = SteamSeawater;
    let mut input = desuperheat_input(175.0);
    input.inlet_temperature_c = 170.0;
    let err = calculate_desuperheat(&input, &props).unwrap_err();
    assert!(err.to_string().contains("must be superheated"), "{err}");
}

#[test]
fn dosing_rates() {
    let res = calculate_dosing(&DosingInput {
        feed_flow_m3_h: 1000.0,
        dose_mg_l: 3.0,
        product_concentration_pct: 50.0,
        solution_density_kg_l: 1.2,
        storage_days: Some(30.0),
    })
    .expect("dosing");
    assert_close("chem", res.chemical_kg_h, 3.0, 1e-12);
    assert_close("solution kg", res.solution_kg_h, 6.0, 1e-12);
    assert_close("solution L", res.solution_l_h, 5.0, 1e-12);
    assert_close("daily", res.daily_solution_l, 120.0, 1e-9);
    assert_close("storage", res.storage_volume_m3.unwrap(), 3.6, 1e-9);
}

#[test]
fn ncg_mixture_fractions() {
    let props = SteamSeawater;
    let res = calculate_ncg(
        &NcgInput {
            total_pressure_bar: 0.1,
            temperature_c: 40.0,
            dry_ncg_flow_kg_h: 10.0,
        },
        &props,
    )
    .expect("ncg");
    assert_close("y", res.vapor_mole_fraction + res.ncg_mole_fraction, 1.0, 1e-12);
    assert_close("vapour carried", res.vapor_carried_kg_h, 17.57, 0.1);
    assert_close("total", res.total_mixture_kg_h, 10.0 + res.vapor_carried_kg_h, 1e-12);
}

#[test]
fn ncg_rejects_vapour_pressure_above_total() {
    let props = SteamSeawater;
    let input = NcgInput {
        total_pressure_bar: 0.1,
        temperature_c: 50.0,
        dry_ncg_flow_kg_h: 10.0,
    };
    assert!(calculate_ncg(&input, &props).is_err());
}

#[test]
fn sensible_and_latent_heat_duty() {
    let props = SteamSeawater;
    let heating = calculate_heat_duty(
        &HeatDutyInput::Sensible {
            mass_flow_ton_hr: 36.0,
            inlet_temperature_c: 20.0,
            outlet_temperature_c: 30.0,
            salinity_ppm: 0.0,
        },
        &props,
    )
    .expect("sensible");
    let cp = heating.specific_heat_kj_kgk.unwrap();
    assert_close("Q", heating.heat_duty_kw, 10.0 * cp * 10.0, 1e-9);
    assert!(heating.heat_duty_kw > 410.0 && heating.heat_duty_kw < 425.0);

    let latent = calculate_heat_duty(
        &HeatDutyInput::Latent {
            mass_flow_ton_hr: 3.6,
            saturation_temperature_c: 100.0,
        },
        &props,
    )
    .expect("latent");
    assert_close("Q latent", latent.heat_duty_kw, 2256.5, 1.5);
}

#[test]
fn heat_duty_collects_all_input_errors() {
    let props = SteamSeawater;
    let input = HeatDutyInput::Sensible {
        mass_flow_ton_hr: 0.0,
        inlet_temperature_c: 20.0,
        outlet_temperature_c: 30.0,
        salinity_ppm: -5.0,
    };
    let report = validate_heat_duty(&input);
    assert_eq!(report.errors.len(), 2);
    let err = calculate_heat_duty(&input, &props).unwrap_err();
    assert!(err.to_string().contains("; "), "{err}");
}

// ---------------- heat transfer coefficients ----------------

#[test]
fn tube_side_turbulent_and_laminar() {
    let props = SteamSeawater;
    let turbulent = tube_side_htc(
        &TubeSideInput {
            velocity_m_s: 2.0,
            inner_diameter_mm: 20.0,
            bulk_temperature_c: 40.0,
            salinity_ppm: 35_000.0,
            mode: HeatingMode::Heating,
        },
        &props,
    )
    .expect("turbulent");
    assert!(turbulent.reynolds_number > 10_000.0);
    assert!(turbulent.warnings.is_empty());
    assert!(turbulent.htc_w_m2k > 5_000.0 && turbulent.htc_w_m2k < 15_000.0);

    let laminar = tube_side_htc(
        &TubeSideInput {
            velocity_m_s: 0.05,
            inner_diameter_mm: 10.0,
            bulk_temperature_c: 40.0,
            salinity_ppm: 0.0,
            mode: HeatingMode::Cooling,
        },
        &props,
    )
    .expect("laminar");
    assert_eq!(laminar.nusselt_number, 3.66);
}

#[test]
fn condensation_clamps_small_delta_t() {
    let props = SteamSeawater;
    let input = CondensationInput {
        saturation_temperature_c: 60.0,
        wall_temperature_c: 60.0,
        characteristic_length_m: 0.025,
        surface: CondensingSurface::HorizontalTube,
    };
    let res = condensation_htc(&input, &props).expect("condensation");
    assert_eq!(res.delta_t_k, 0.5);
    assert!(res.htc_w_m2k.is_finite() && res.htc_w_m2k > 0.0);
    assert_eq!(res.warnings.len(), 1);

    let vertical = condensation_htc(
        &CondensationInput {
            surface: CondensingSurface::VerticalSurface,
            ..input
        },
        &props,
    )
    .unwrap();
    assert_relative_eq!(
        vertical.htc_w_m2k / res.htc_w_m2k,
        0.943 / 0.725,
        max_relative = 1e-12
    );
}

#[test]
fn overall_coefficient_is_series_resistance() {
    let res = overall_htc(&OverallHtcInput {
        inside_htc_w_m2k: 5_000.0,
        outside_htc_w_m2k: 10_000.0,
        tube_outer_diameter_mm: 25.4,
        tube_inner_diameter_mm: 22.9,
        wall_conductivity_w_mk: 50.0,
        inside_fouling_m2kw: 0.0001,
        outside_fouling_m2kw: 0.0,
    })
    .expect("U");
    let total = res.inside_resistance_m2kw
        + res.outside_resistance_m2kw
        + res.wall_resistance_m2kw
        + res.fouling_resistance_m2kw;
    assert_relative_eq!(res.overall_htc_w_m2k, 1.0 / total, max_relative = 1e-12);
    assert!(res.overall_htc_w_m2k < 5_000.0);
}
