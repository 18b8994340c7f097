//! IF97 기준점과 해수 상관식 회귀 테스트. IF97 값은 공식 문서 검증 예제를 kJ 단위로 옮긴 것이다.
use desal_design_toolbox::properties::if97::{self, Region};
use desal_design_toolbox::properties::{seawater, FluidState, Phase, PropertyProvider, SteamSeawater};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

#[test]
fn region1_reference_point() {
    // p = 3 MPa, T = 300 K
    let st = if97::state(30.0, 26.85, Region::Liquid).expect("region1");
    assert_close("h", st.enthalpy_kj_kg, 115.331_273, 1e-6);
    assert_close("v", st.specific_volume_m3_kg, 0.001_002_151_68, 1e-6);
    assert_close("s", st.entropy_kj_kgk, 0.392_294_792, 1e-6);
}

#[test]
fn region2_reference_points() {
    // p = 0.0035 MPa, T = 300 K / 700 K
    let low = if97::state(0.035, 26.85, Region::Vapour).expect("region2 low T");
    assert_close("h300K", low.enthalpy_kj_kg, 2_549.911_45, 1e-6);
    assert_close("v300K", low.specific_volume_m3_kg, 39.491_386_6, 1e-6);
    assert_close("s300K", low.entropy_kj_kgk, 8.522_389_67, 1e-6);

    let high = if97::state(0.035, 426.85, Region::Vapour).expect("region2 high T");
    assert_close("h700K", high.enthalpy_kj_kg, 3_335.683_75, 1e-6);
    assert_close("v700K", high.specific_volume_m3_kg, 92.301_589_8, 1e-6);
    assert_close("s700K", high.entropy_kj_kgk, 10.174_999_6, 1e-6);
}

#[test]
fn saturation_line_round_trip() {
    let p = if97::saturation_pressure_bar(100.0).expect("psat");
    assert_close("psat(100)", p, 1.014_18, 1e-4);
    let t = if97::saturation_temperature_c(p).expect("tsat");
    assert_close("tsat(psat(100))", t, 100.0, 1e-6);
}

#[test]
fn saturation_rejects_out_of_range() {
    assert!(if97::saturation_temperature_c(0.001).is_err());
    assert!(if97::saturation_temperature_c(300.0).is_err());
    assert!(if97::saturation_pressure_bar(400.0).is_err());
    assert!(if97::state(-1.0, 20.0, Region::Auto).is_err());
}

#[test]
fn latent_heat_at_atmospheric_boiling() {
    let props = SteamSeawater;
    let h_fg = props.latent_heat(100.0).expect("latent");
    assert_close("h_fg(100)", h_fg, 2_256.5, 5e-4);
    assert!(props.entropy_vapor(100.0).unwrap() > props.entropy_liquid(100.0).unwrap());
}

#[test]
fn seawater_boiling_point_elevation() {
    assert_close(
        "BPE(0 ppm)",
        seawater::boiling_point_elevation(0.0, 60.0).unwrap(),
        0.0,
        1e-12,
    );
    // 35 000 ppm, 100 °C ≈ 0.52 °C
    assert_close(
        "BPE(35000, 100)",
        seawater::boiling_point_elevation(35_000.0, 100.0).unwrap(),
        0.518_7,
        1e-3,
    );
}

#[test]
fn seawater_density_grows_with_salinity() {
    let fresh = seawater::density(0.0, 25.0).unwrap();
    let sea = seawater::density(35_000.0, 25.0).unwrap();
    let brine = seawater::density(70_000.0, 25.0).unwrap();
    assert!(fresh > 990.0 && fresh < 1000.0, "fresh={fresh}");
    assert!(sea > fresh && brine > sea);
}

#[test]
fn seawater_correlations_reject_invalid_range() {
    assert!(seawater::density(35_000.0, 200.0).is_err());
    assert!(seawater::viscosity(200_000.0, 25.0).is_err());
    assert!(seawater::enthalpy(-1.0, 25.0).is_err());
}

#[test]
fn saturated_liquid_sits_above_saturation_by_bpe() {
    let props = SteamSeawater;
    let state = FluidState::saturated_liquid(0.2, 45_000.0, &props).expect("state");
    let t_sat = props.saturation_temperature(0.2).unwrap();
    let bpe = props.boiling_point_elevation(45_000.0, t_sat).unwrap();
    assert_eq!(state.phase, Phase::Liquid);
    assert_close("T", state.temperature_c, t_sat + bpe, 1e-9);
    assert!(state.density(&props).unwrap() > 1000.0);
}

#[test]
fn brine_salinity_mass_balance() {
    let props = SteamSeawater;
    assert_close("brine", props.brine_salinity(40_000.0, 100.0, 20.0), 50_000.0, 1e-12);
    assert_close(
        "all vapour",
        props.brine_salinity(40_000.0, 10.0, 10.0),
        40_000.0,
        1e-12,
    );
}

#[test]
fn vapour_state_must_not_be_subcooled() {
    let props = SteamSeawater;
    let t_sat = props.saturation_temperature(0.3).unwrap();
    assert!(FluidState::vapour(0.3, t_sat - 1.0, &props).is_err());

    let saturated = FluidState::vapour(0.3, t_sat, &props).expect("saturated vapour");
    assert_eq!(saturated.phase, Phase::Vapour);
    assert_close("superheat", saturated.superheat(&props).unwrap(), 0.0, 1e-12);
    assert!(saturated.is_superheated(&props).unwrap());

    let hot = FluidState::vapour(0.3, t_sat + 20.0, &props).expect("superheated vapour");
    assert_close("superheat", hot.superheat(&props).unwrap(), 20.0, 1e-9);
    assert!(hot.enthalpy(&props).unwrap() > saturated.enthalpy(&props).unwrap());
    assert!(hot.entropy(&props).unwrap() > saturated.entropy(&props).unwrap());
}

#[test]
fn liquid_is_never_superheated() {
    let props = SteamSeawater;
    let mut state = FluidState::saturated_liquid(0.2, 35_000.0, &props).expect("state");
    state.temperature_c += 10.0;
    assert!(state.superheat(&props).unwrap() > 0.0);
    assert!(!state.is_superheated(&props).unwrap());
}

#[test]
fn provider_superheat_check_brackets_saturation() {
    let props = SteamSeawater;
    let t_sat = props.saturation_temperature(1.0).unwrap();
    assert!(props.is_superheated(1.0, t_sat + 1.0).unwrap());
    assert!(!props.is_superheated(1.0, t_sat - 1.0).unwrap());
    assert!(props.is_superheated(-1.0, 100.0).is_err());
}

#[test]
fn wet_steam_mixes_saturated_properties_by_quality() {
    let props = SteamSeawater;
    let t_sat = props.saturation_temperature(0.5).unwrap();
    let h_f = props.enthalpy_liquid(t_sat).unwrap();
    let h_g = props.enthalpy_vapor(t_sat).unwrap();

    let dry = FluidState::wet(0.5, 1.0, &props).expect("x = 1");
    let liquid = FluidState::wet(0.5, 0.0, &props).expect("x = 0");
    let half = FluidState::wet(0.5, 0.5, &props).expect("x = 0.5");
    assert_eq!(half.phase, Phase::TwoPhase);
    assert_eq!(half.quality, Some(0.5));
    assert_close("h(x=1)", dry.enthalpy(&props).unwrap(), h_g, 1e-12);
    assert_close("h(x=0)", liquid.enthalpy(&props).unwrap(), h_f, 1e-12);
    assert_close("h(x=0.5)", half.enthalpy(&props).unwrap(), 0.5 * (h_f + h_g), 1e-9);

    let rho = half.density(&props).unwrap();
    assert!(rho < liquid.density(&props).unwrap() && rho > dry.density(&props).unwrap());
    assert!(half.entropy(&props).unwrap() < dry.entropy(&props).unwrap());
    assert!(!half.is_superheated(&props).unwrap());
    assert!(FluidState::wet(0.5, 1.2, &props).is_err());
}
