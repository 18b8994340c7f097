use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use desal_design_toolbox::piping::catalog::{
    CatalogError, PipeCatalog, PipeCatalogCache, PipeCatalogSource, PipeVariant,
};
use desal_design_toolbox::piping::fittings::{
    contraction_k, FittingSpec, FittingType, StrainerCondition, StrainerType,
};
use desal_design_toolbox::piping::pressure_drop::{
    calculate_pressure_drop, friction_factor, validate_pressure_drop, FlowRegime, PressureDropInput,
    DEFAULT_ROUGHNESS_MM,
};
use desal_design_toolbox::piping::selector::{
    select_by_area, select_by_velocity, VelocityLimits, VelocityStatus,
};
use proptest::prelude::*;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "{label} expected {expected} got {actual} (tol {tol})"
    );
}

fn sch40() -> PipeCatalog {
    PipeCatalog::standard("40").expect("sch 40")
}

fn water_line(flow_ton_hr: f64) -> PressureDropInput {
    PressureDropInput {
        inner_diameter_mm: 102.26,
        length_m: 50.0,
        flow_rate_ton_hr: flow_ton_hr,
        density_kg_m3: 998.0,
        viscosity_pa_s: 0.001,
        roughness_mm: DEFAULT_ROUGHNESS_MM,
        elevation_change_m: 0.0,
        fittings: vec![
            FittingSpec::new(FittingType::Elbow90Standard, 4),
            FittingSpec::new(FittingType::GateValve, 2),
        ],
    }
}

#[test]
fn catalog_is_sorted_by_area_with_derived_dimensions() {
    let catalog = sch40();
    let areas: Vec<f64> = catalog.variants().iter().map(|v| v.area_mm2).collect();
    assert!(areas.windows(2).all(|w| w[0] < w[1]));
    let four = catalog.find_by_nps("4").expect("4 inch");
    assert_close("ID", four.inner_diameter_mm, 114.3 - 2.0 * 6.02, 1e-9);
    assert_close(
        "area",
        four.area_mm2,
        std::f64::consts::PI * four.inner_diameter_mm.powi(2) / 4.0,
        1e-6,
    );
    assert_eq!(catalog.find_by_dn("100"), Some(four));
}

#[test]
fn catalog_deduplicates_by_nps() {
    let catalog = PipeCatalog::from_variants(
        "40",
        vec![
            PipeVariant::new("2", 2.0, "50", "40", 60.3, 3.91),
            PipeVariant::new("1", 1.0, "25", "40", 33.4, 3.38),
            PipeVariant::new("2", 2.0, "50", "40", 60.3, 5.54),
        ],
    );
    assert_eq!(catalog.variants().len(), 2);
    assert_eq!(catalog.variants()[0].nps, "1");
    assert_close("kept first", catalog.variants()[1].wall_thickness_mm, 3.91, 1e-12);
}

#[test]
fn unknown_schedule_is_an_error() {
    assert!(matches!(
        PipeCatalog::standard("160"),
        Err(CatalogError::UnknownSchedule(_))
    ));
}

#[test]
fn oversize_demand_returns_largest_flagged() {
    let catalog = sch40();
    let selected = select_by_area(1e9, &catalog).expect("select");
    assert!(!selected.is_exact_match);
    assert!(selected.display_name.ends_with("(MAX)"));
    assert_eq!(&selected.pipe, catalog.largest().unwrap());
}

#[test]
fn velocity_selection_classifies_actual_velocity() {
    let catalog = sch40();
    // 50 m³/h at 1.5 m/s
    let sized = select_by_velocity(50.0 / 3600.0, 1.5, VelocityLimits::new(1.0, 3.0), &catalog)
        .expect("sized");
    assert!(sized.actual_velocity_m_s <= 1.5);
    assert_eq!(sized.velocity_status, VelocityStatus::Ok);
    assert_eq!(sized.pipe().nps, "5");
}

struct CountingSource {
    calls: Arc<AtomicUsize>,
}

impl PipeCatalogSource for CountingSource {
    fn fetch(&self, schedule: &str) -> Result<PipeCatalog, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PipeCatalog::standard(schedule)
    }
}

#[test]
fn catalog_cache_loads_each_schedule_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = PipeCatalogCache::new(CountingSource {
        calls: Arc::clone(&calls),
    });
    let a = cache.get("40").unwrap();
    let b = cache.get("40").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    cache.get("80").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn fitting_k_factors() {
    let dirty_bucket = FittingType::Strainer {
        kind: StrainerType::Bucket,
        condition: StrainerCondition::Dirty,
    };
    assert_close("bucket dirty", dirty_bucket.k_factor(), 12.0, 1e-12);
    assert_close(
        "4 LR elbows",
        FittingSpec::new(FittingType::Elbow90LongRadius, 4).total_k(),
        1.8,
        1e-12,
    );
    // β = 0.5: 0.5·(0.75)² = 0.28125, ×1.2 편심
    assert_close("reducer", contraction_k(0.5, true), 0.3375, 1e-12);
    assert_close(
        "expander",
        FittingType::Expander {
            beta: 0.5,
            eccentric: false,
        }
        .k_factor(),
        0.5625,
        1e-12,
    );
}

#[test]
fn friction_factor_regimes() {
    let (f, regime) = friction_factor(1000.0, 0.0);
    assert_eq!(regime, FlowRegime::Laminar);
    assert_close("64/Re", f, 0.064, 1e-12);

    // 천이 구간 중앙은 양 끝값의 평균
    let (f_mid, regime) = friction_factor(3150.0, 1e-4);
    assert_eq!(regime, FlowRegime::Transitional);
    let (f_turb, _) = friction_factor(4000.0, 1e-4);
    assert_close("interpolated", f_mid, 0.5 * (64.0 / 2300.0 + f_turb), 1e-12);

    // 상대조도 1e-4, Re 1e6 → Moody 도표상 약 0.0135
    let (f, regime) = friction_factor(1e6, 1e-4);
    assert_eq!(regime, FlowRegime::Turbulent);
    assert_close("Swamee-Jain", f, 0.0135, 3e-4);
}

#[test]
fn pressure_drop_breakdown_adds_up() {
    let res = calculate_pressure_drop(&water_line(50.0)).expect("dp");
    assert_eq!(res.flow_regime, FlowRegime::Turbulent);
    assert_close("K", res.total_k_factor, 4.0 * 0.75 + 2.0 * 0.17, 1e-12);
    assert_relative_eq!(
        res.total_pressure_drop_mh2o,
        res.straight_pipe_loss_m + res.fittings_loss_m,
        max_relative = 1e-12
    );
    assert!(res.warnings.is_empty(), "{:?}", res.warnings);
}

#[test]
fn low_velocity_warns() {
    let res = calculate_pressure_drop(&water_line(1.0)).expect("dp");
    assert!(res.velocity_m_s < 0.3);
    assert!(res.warnings.iter().any(|w| w.contains("below the recommended minimum")));
}

#[test]
fn pressure_drop_is_repeatable() {
    let input = water_line(80.0);
    let first = calculate_pressure_drop(&input).expect("first");
    let second = calculate_pressure_drop(&input).expect("second");
    assert_eq!(first, second);
}

#[test]
fn reducer_ratio_outside_unit_interval_is_rejected() {
    for beta in [1.5, -0.2, 0.0] {
        let mut input = water_line(50.0);
        input.fittings.push(FittingSpec::new(
            FittingType::Reducer {
                beta,
                eccentric: false,
            },
            1,
        ));
        let report = validate_pressure_drop(&input);
        assert!(!report.is_valid(), "beta {beta} accepted");
        assert!(calculate_pressure_drop(&input).is_err());
    }

    let mut input = water_line(50.0);
    input.fittings.push(FittingSpec::new(
        FittingType::Expander {
            beta: 1.0,
            eccentric: false,
        },
        1,
    ));
    assert!(validate_pressure_drop(&input).is_valid());
}

#[test]
fn pressure_drop_reports_every_input_error() {
    let mut input = water_line(50.0);
    input.inner_diameter_mm = 0.0;
    input.flow_rate_ton_hr = -1.0;
    let err = calculate_pressure_drop(&input).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Inner diameter") && msg.contains("Flow rate"), "{msg}");
    assert!(msg.contains("; "));
}

#[test]
fn pressure_drop_rejects_bad_geometry() {
    let mut input = water_line(50.0);
    input.inner_diameter_mm = 0.0;
    assert!(calculate_pressure_drop(&input).is_err());
}

proptest! {
    #[test]
    fn area_selection_covers_demand_or_reports_max(required in 1.0f64..600_000.0) {
        let catalog = sch40();
        let selected = select_by_area(required, &catalog).unwrap();
        if selected.is_exact_match {
            prop_assert!(selected.pipe.area_mm2 >= required);
            // 바로 아래 규격은 부족해야 한다
            let idx = catalog.variants().iter().position(|v| v == &selected.pipe).unwrap();
            if idx > 0 {
                prop_assert!(catalog.variants()[idx - 1].area_mm2 < required);
            }
        } else {
            prop_assert!(catalog.largest().unwrap().area_mm2 < required);
        }
    }

    #[test]
    fn pressure_drop_unit_identities(flow in 1.0f64..400.0, elevation in -5.0f64..20.0) {
        let mut input = water_line(flow);
        input.elevation_change_m = elevation;
        let res = calculate_pressure_drop(&input).unwrap();
        prop_assert_eq!(res.total_pressure_drop_mbar, res.total_pressure_drop_bar * 1000.0);
        prop_assert_eq!(res.total_pressure_drop_kpa, res.total_pressure_drop_bar * 100.0);
    }

    #[test]
    fn pressure_drop_grows_with_flow(flow in 5.0f64..300.0) {
        let lo = calculate_pressure_drop(&water_line(flow)).unwrap();
        let hi = calculate_pressure_drop(&water_line(flow * 1.1)).unwrap();
        prop_assert!(hi.total_pressure_drop_mh2o > lo.total_pressure_drop_mh2o);
    }
}
