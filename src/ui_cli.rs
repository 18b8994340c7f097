//! 계산 결과를 터미널용 텍스트로 만든다.

use crate::design::flash_chamber::FlashChamberResult;
use crate::design::siphon::SiphonResult;
use crate::design::suction::{SuctionCase, SuctionResult};
use crate::piping::catalog::PipeCatalog;
use crate::piping::pressure_drop::PressureDropResult;
use crate::piping::selector::SizedPipe;
use crate::thermal::desuperheat::DesuperheatResult;
use crate::thermal::dosing::DosingResult;
use crate::thermal::heat_duty::HeatDutyResult;
use crate::thermal::lmtd::LmtdResult;
use crate::thermal::ncg::NcgResult;
use crate::thermal::npsha::NpshaResult;
use crate::thermal::pump::PumpResult;
use crate::thermal::vapour_compression::{MvcResult, TvcResult};
use crate::units::pressure::{from_bar, PressureUnit};

/// 줄 단위로 쌓는 간단한 텍스트 보고서.
struct Report {
    out: String,
}

impl Report {
    fn new(title: &str) -> Self {
        Self {
            out: format!("=== {title} ===\n"),
        }
    }

    fn section(&mut self, name: &str) {
        self.out.push_str(&format!("\n-- {name} --\n"));
    }

    fn value(&mut self, label: &str, value: f64, decimals: usize, unit: &str) {
        self.out
            .push_str(&format!("{label:<32} {value:>12.decimals$} {unit}\n"));
    }

    fn text(&mut self, label: &str, value: &str) {
        self.out.push_str(&format!("{label:<32} {value}\n"));
    }

    fn pressure(&mut self, label: &str, bar: f64, unit: PressureUnit) {
        let decimals = match unit {
            PressureUnit::MilliBar | PressureUnit::Pascal | PressureUnit::MmHg => 1,
            _ => 4,
        };
        self.value(label, from_bar(bar, unit), decimals, unit.symbol());
    }

    fn pipe(&mut self, label: &str, sized: &SizedPipe) {
        self.out.push_str(&format!(
            "{label:<32} {} | ID {:.1} mm | v = {:.2} m/s [{:?}]\n",
            sized.selected.display_name,
            sized.pipe().inner_diameter_mm,
            sized.actual_velocity_m_s,
            sized.velocity_status
        ));
    }

    fn warnings(&mut self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        self.out.push_str("\n경고:\n");
        for w in warnings {
            self.out.push_str(&format!("  - {w}\n"));
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

pub fn flash_chamber(r: &FlashChamberResult, unit: PressureUnit) -> String {
    let mut rep = Report::new("Flash Chamber");
    rep.pressure("운전 압력", r.operating_pressure_bar, unit);
    rep.value("포화온도", r.saturation_temperature_c, 2, "°C");
    rep.value("BPE", r.boiling_point_elevation_c, 3, "°C");
    rep.value("농축수 온도", r.brine_temperature_c, 2, "°C");
    rep.value("플래시 분율", r.flash_fraction * 100.0, 3, "%");

    rep.section("Heat & mass balance");
    for row in &r.heat_balance {
        rep.out.push_str(&format!(
            "{:<8} {:>10.3} ton/hr {:>8.2} °C {:>9.0} ppm {:>9.2} kJ/kg {:>11.1} kW\n",
            row.stream,
            row.flow_ton_hr,
            row.temperature_c,
            row.salinity_ppm,
            row.enthalpy_kj_kg,
            row.energy_kw
        ));
    }

    rep.section("Chamber");
    let c = &r.chamber;
    rep.value("직경", c.diameter_m * 1000.0, 0, "mm");
    rep.value("증기 부하", c.actual_loading_ton_hr_m2, 3, "ton/hr·m²");
    rep.value("체류 구간", c.retention_height_m, 3, "m");
    rep.value("플래싱 구간", c.flashing_zone_height_m, 3, "m");
    rep.value("분무 구간", c.spray_zone_height_m, 3, "m");
    rep.value("상부 공간", c.headspace_height_m, 3, "m");
    rep.value("전체 높이 (BTL-TTL)", c.total_height_m, 3, "m");

    rep.section("Nozzles");
    for n in &r.nozzles {
        rep.pipe(n.service.name(), &n.sizing);
    }

    rep.section("Brine pump NPSHa");
    rep.value("NPSHa", r.npsha.npsha_m, 2, "m");
    rep.value("허용 NPSHr", r.max_allowable_npshr_m, 2, "m");
    rep.text("권장", &r.npsha.recommendation);

    rep.section("Elevations (BTL = 0)");
    let e = &r.elevations;
    for (label, z) in [
        ("TTL / vapour outlet", e.ttl_m),
        ("Feed inlet", e.inlet_nozzle_m),
        ("LG high / NLL", e.level_gauge_high_m),
        ("LG low", e.level_gauge_low_m),
        ("BTL / brine outlet", e.btl_m),
        ("Pump centreline", e.pump_centerline_m),
    ] {
        rep.value(label, z, 3, "m");
    }
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn siphon(r: &SiphonResult, unit: PressureUnit) -> String {
    let mut rep = Report::new("Siphon");
    rep.pressure("상류 압력", r.fluid.pressure_bar, unit);
    rep.value("유체 온도", r.fluid.temperature_c, 2, "°C");
    rep.value("밀도", r.density_kg_m3, 1, "kg/m³");
    rep.pipe("배관", &r.pipe);
    rep.value("정압 수두", r.static_head_m, 3, "m");
    rep.value("마찰 손실", r.friction_head_m, 3, "m");
    rep.value("사이펀 높이", r.siphon_height_m, 3, "m");
    rep.value("배관 길이", r.pipe_length_m, 2, "m");
    rep.text(
        "반복",
        &format!(
            "{} ({})",
            r.iterations,
            if r.converged { "converged" } else { "not converged" }
        ),
    );
    rep.section("Downstream flash");
    rep.value("플래시 분율", r.flash.flash_vapor_fraction * 100.0, 3, "%");
    rep.value("플래시 증기", r.flash.flash_vapor_ton_hr, 4, "ton/hr");
    rep.value("하류 온도", r.flash.downstream_temperature_c, 2, "°C");
    rep.warnings(&r.warnings);
    rep.finish()
}

fn suction_case(rep: &mut Report, name: &str, case: &SuctionCase) {
    rep.section(name);
    rep.value("총 K", case.pressure_drop.total_k_factor, 2, "");
    rep.value("마찰 손실", case.pressure_drop.total_pressure_drop_mh2o, 3, "m");
    rep.value("NPSHa", case.npsha.npsha_m, 2, "m");
    rep.value("여유", case.margin_m, 2, "m");
    rep.text("판정", if case.is_adequate { "OK" } else { "INADEQUATE" });
}

pub fn suction(r: &SuctionResult, unit: PressureUnit) -> String {
    let mut rep = Report::new("Pump Suction System");
    rep.pressure("효용 압력", r.fluid.pressure_bar, unit);
    rep.value("유체 온도", r.fluid.temperature_c, 2, "°C");
    rep.pipe("노즐 배관", &r.nozzle_pipe);
    rep.pipe("흡입 배관", &r.suction_pipe);
    rep.text(
        "밸브 / 스트레이너",
        &format!("{} / {}", r.components.valve.name(), r.components.strainer.name()),
    );
    if let (Some(beta), Some(k)) = (r.components.reducer_beta, r.components.reducer_k) {
        rep.text("편심 리듀서", &format!("β = {beta:.3}, K = {k:.3}"));
    }
    rep.value("체류 높이", r.holdup.height_m, 3, "m");
    rep.value("체류 용량", r.holdup.volume_m3, 4, "m³");
    rep.text("지배 조건", &format!("{:?}", r.holdup.governing));
    if let Some(req) = r.required_elevation_m {
        rep.value("필요 고도", req, 3, "m");
    }
    rep.value("적용 고도", r.elevation_m, 3, "m");
    suction_case(&mut rep, "Strainer clean", &r.clean);
    suction_case(&mut rep, "Strainer dirty", &r.dirty);
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn mvc(r: &MvcResult) -> String {
    let mut rep = Report::new("Mechanical Vapour Compressor");
    rep.value("압축비", r.compression_ratio, 3, "");
    rep.value("흡입 온도", r.suction_temperature_c, 2, "°C");
    rep.value("흡입 체적유량", r.suction_volumetric_flow_m3_h, 0, "m³/h");
    rep.value("등엔트로피 토출 온도", r.isentropic_discharge_temperature_c, 2, "°C");
    rep.value("실제 토출 온도", r.discharge_temperature_c, 2, "°C");
    rep.value("토출 과열도", r.discharge_superheat_c, 2, "°C");
    rep.value("등엔트로피 동력", r.isentropic_power_kw, 1, "kW");
    rep.value("축동력", r.shaft_power_kw, 1, "kW");
    rep.value("전력", r.electrical_power_kw, 1, "kW");
    rep.value("비에너지", r.specific_energy_kwh_ton, 2, "kWh/ton");
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn tvc(r: &TvcResult) -> String {
    let mut rep = Report::new("Thermo Vapour Compressor");
    rep.value("압축비", r.compression_ratio, 3, "");
    rep.value("팽창비", r.expansion_ratio, 2, "");
    rep.value("노즐 Δh", r.nozzle_enthalpy_drop_kj_kg, 2, "kJ/kg");
    rep.value("디퓨저 Δh", r.diffuser_enthalpy_rise_kj_kg, 2, "kJ/kg");
    rep.value("동반비", r.entrainment_ratio, 3, "");
    rep.value("구동 증기", r.motive_flow_ton_hr, 3, "ton/hr");
    rep.value("토출 유량", r.discharge_flow_ton_hr, 3, "ton/hr");
    rep.value("토출 온도", r.discharge_temperature_c, 2, "°C");
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn pump(r: &PumpResult) -> String {
    let mut rep = Report::new("Pump");
    rep.value("체적유량", r.volumetric_flow_m3_h, 2, "m³/h");
    rep.value("압력 수두", r.pressure_head_m, 2, "m");
    rep.value("마찰 수두", r.friction_head_m, 2, "m");
    rep.value("TDH", r.total_differential_head_m, 2, "m");
    rep.value("수동력", r.hydraulic_power_kw, 2, "kW");
    rep.value("축동력", r.brake_power_kw, 2, "kW");
    rep.value("모터 입력", r.motor_power_kw, 2, "kW");
    rep.value("IEC 모터", r.motor_rating_kw, 2, "kW");
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn npsha(r: &NpshaResult, unit: PressureUnit) -> String {
    let mut rep = Report::new("NPSHa");
    rep.pressure("용기 압력", r.vessel_pressure_bar, unit);
    rep.pressure("증기압", r.vapor_pressure_bar, unit);
    rep.value("정수두", r.static_head_m, 3, "m");
    rep.value("압력 수두", r.pressure_head_m, 3, "m");
    rep.value("증기압 수두", r.vapor_pressure_head_m, 3, "m");
    rep.value("마찰 손실", r.friction_loss_m, 3, "m");
    rep.value("NPSHa", r.npsha_m, 3, "m");
    if let Some(margin) = r.margin_m {
        rep.value("여유 (NPSHa-NPSHr)", margin, 3, "m");
    }
    rep.text("권장", &r.recommendation);
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn lmtd(r: &LmtdResult) -> String {
    let mut rep = Report::new("LMTD");
    rep.value("ΔT1", r.delta_t1_c, 2, "°C");
    rep.value("ΔT2", r.delta_t2_c, 2, "°C");
    rep.value("LMTD", r.lmtd_c, 3, "°C");
    rep.value("보정계수 F", r.correction_factor, 3, "");
    rep.value("보정 LMTD", r.corrected_lmtd_c, 3, "°C");
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn pressure_drop(r: &PressureDropResult, unit: PressureUnit) -> String {
    let mut rep = Report::new("Pressure Drop");
    rep.value("유속", r.velocity_m_s, 3, "m/s");
    rep.value("Re", r.reynolds_number, 0, "");
    rep.text("유동 영역", &format!("{:?}", r.flow_regime));
    rep.value("마찰계수", r.friction_factor, 5, "");
    rep.value("직관 손실", r.straight_pipe_loss_m, 4, "m");
    for f in &r.fittings {
        rep.value(
            &format!("{} x{} (K {:.2})", f.name, f.count, f.k_factor),
            f.loss_m,
            4,
            "m",
        );
    }
    rep.value("고도 변화", r.elevation_head_m, 3, "m");
    rep.value("총 손실", r.total_pressure_drop_mh2o, 4, "m H2O");
    rep.pressure("총 손실", r.total_pressure_drop_bar, unit);
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn desuperheat(r: &DesuperheatResult) -> String {
    let mut rep = Report::new("Desuperheater");
    rep.value("포화온도", r.saturation_temperature_c, 2, "°C");
    rep.value("분무수", r.spray_water_ton_hr, 4, "ton/hr");
    rep.value("출구 증기", r.outlet_steam_ton_hr, 4, "ton/hr");
    rep.value("제거 열량", r.heat_removed_kw, 1, "kW");
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn dosing(r: &DosingResult) -> String {
    let mut rep = Report::new("Chemical Dosing");
    rep.value("약품 (유효성분)", r.chemical_kg_h, 4, "kg/h");
    rep.value("원액", r.solution_l_h, 3, "L/h");
    rep.value("일 사용량", r.daily_solution_l, 1, "L/day");
    if let Some(v) = r.storage_volume_m3 {
        rep.value("저장 탱크", v, 3, "m³");
    }
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn ncg(r: &NcgResult, unit: PressureUnit) -> String {
    let mut rep = Report::new("NCG / Vapour Mixture");
    rep.pressure("증기 분압", r.vapor_partial_pressure_bar, unit);
    rep.pressure("NCG 분압", r.ncg_partial_pressure_bar, unit);
    rep.value("증기 몰분율", r.vapor_mole_fraction, 4, "");
    rep.value("혼합 분자량", r.mixture_molar_mass_kg_kmol, 3, "kg/kmol");
    rep.value("혼합 밀도", r.mixture_density_kg_m3, 5, "kg/m³");
    rep.value("동반 증기", r.vapor_carried_kg_h, 3, "kg/h");
    rep.value("체적유량", r.volumetric_flow_m3_h, 2, "m³/h");
    rep.warnings(&r.warnings);
    rep.finish()
}

pub fn heat_duty(r: &HeatDutyResult) -> String {
    let mut rep = Report::new("Heat Duty");
    rep.value("열량", r.heat_duty_kw, 2, "kW");
    if let Some(cp) = r.specific_heat_kj_kgk {
        rep.value("Cp", cp, 4, "kJ/kg·K");
    }
    if let Some(h_fg) = r.latent_heat_kj_kg {
        rep.value("h_fg", h_fg, 2, "kJ/kg");
    }
    rep.finish()
}

pub fn pipe_catalog(catalog: &PipeCatalog) -> String {
    let mut rep = Report::new(&format!("Pipe catalogue Sch {}", catalog.schedule));
    for v in catalog.variants() {
        rep.out.push_str(&format!(
            "{:<24} OD {:>7.1}  WT {:>6.2}  ID {:>7.2} mm  A {:>10.0} mm²  {:>7.2} kg/m\n",
            v.display_name(),
            v.outer_diameter_mm,
            v.wall_thickness_mm,
            v.inner_diameter_mm,
            v.area_mm2,
            v.weight_kg_per_m
        ));
    }
    rep.finish()
}
