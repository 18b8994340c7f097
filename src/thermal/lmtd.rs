//! 대수평균온도차(LMTD)와 직교류 보정계수.

use serde::{Deserialize, Serialize};

/// 두 ΔT 차이가 이보다 작으면 산술평균을 쓴다 [°C]
const EQUAL_DELTA_TOLERANCE_C: f64 = 0.01;
pub const MIN_CORRECTION_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowArrangement {
    #[default]
    Counter,
    Parallel,
    Crossflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmtdInput {
    pub hot_inlet_c: f64,
    pub hot_outlet_c: f64,
    pub cold_inlet_c: f64,
    pub cold_outlet_c: f64,
    #[serde(default)]
    pub arrangement: FlowArrangement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LmtdResult {
    pub delta_t1_c: f64,
    pub delta_t2_c: f64,
    pub lmtd_c: f64,
    /// 대향류/병류는 1.0
    pub correction_factor: f64,
    pub corrected_lmtd_c: f64,
    pub warnings: Vec<String>,
}

/// LMTD를 계산한다. 온도 교차는 오류가 아니라 LMTD = 0과 경고로 보고한다.
pub fn calculate_lmtd(input: &LmtdInput) -> LmtdResult {
    let (dt1, dt2) = match input.arrangement {
        FlowArrangement::Counter => (
            input.hot_inlet_c - input.cold_outlet_c,
            input.hot_outlet_c - input.cold_inlet_c,
        ),
        FlowArrangement::Parallel | FlowArrangement::Crossflow => (
            input.hot_inlet_c - input.cold_inlet_c,
            input.hot_outlet_c - input.cold_outlet_c,
        ),
    };

    let mut warnings = Vec::new();
    if dt1 <= 0.0 || dt2 <= 0.0 {
        warnings.push(format!(
            "Temperature cross detected (ΔT1 = {dt1:.2} °C, ΔT2 = {dt2:.2} °C); the exchanger cannot achieve these terminal temperatures"
        ));
        return LmtdResult {
            delta_t1_c: dt1,
            delta_t2_c: dt2,
            lmtd_c: 0.0,
            correction_factor: 1.0,
            corrected_lmtd_c: 0.0,
            warnings,
        };
    }

    let lmtd = if (dt1 - dt2).abs() < EQUAL_DELTA_TOLERANCE_C {
        0.5 * (dt1 + dt2)
    } else {
        (dt1 - dt2) / (dt1 / dt2).ln()
    };

    let correction_factor = match input.arrangement {
        FlowArrangement::Crossflow => {
            let f = crossflow_correction(input);
            if f <= MIN_CORRECTION_FACTOR {
                warnings.push(format!(
                    "Crossflow correction factor limited to {MIN_CORRECTION_FACTOR}; consider a counter-current arrangement"
                ));
            }
            f
        }
        FlowArrangement::Counter | FlowArrangement::Parallel => 1.0,
    };

    LmtdResult {
        delta_t1_c: dt1,
        delta_t2_c: dt2,
        lmtd_c: lmtd,
        correction_factor,
        corrected_lmtd_c: lmtd * correction_factor,
        warnings,
    }
}

/// R/P 방법(1셸-2패스 Bowman 식)의 보정계수 F, [0.7, 1.0]으로 제한.
fn crossflow_correction(input: &LmtdInput) -> f64 {
    let cold_rise = input.cold_outlet_c - input.cold_inlet_c;
    let max_span = input.hot_inlet_c - input.cold_inlet_c;
    if cold_rise <= 0.0 || max_span <= 0.0 {
        return 1.0;
    }
    let r = (input.hot_inlet_c - input.hot_outlet_c) / cold_rise;
    let p = cold_rise / max_span;

    let f = if (r - 1.0).abs() < 1e-6 {
        let sqrt2 = std::f64::consts::SQRT_2;
        let num = sqrt2 * p / (1.0 - p);
        let den = ((2.0 - p * (2.0 - sqrt2)) / (2.0 - p * (2.0 + sqrt2))).ln();
        num / den
    } else {
        let s = (r * r + 1.0).sqrt();
        let num = s * ((1.0 - p) / (1.0 - r * p)).ln();
        let den = (r - 1.0) * ((2.0 - p * (r + 1.0 - s)) / (2.0 - p * (r + 1.0 + s))).ln();
        num / den
    };

    if f.is_finite() {
        f.clamp(MIN_CORRECTION_FACTOR, 1.0)
    } else {
        MIN_CORRECTION_FACTOR
    }
}
