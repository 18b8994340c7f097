//! IAPWS-IF97 계산을 seuif97 크레이트로 위임한 래퍼.
//! 입력: 압력(bar, 절대), 온도(°C)
//! 출력: 엔탈피[kJ/kg], 비체적[m³/kg], 엔트로피[kJ/kg·K]

use seuif97::{pt, OH, OS, OV};

use super::PropertyError;

// ---------------- Region 4 (포화) ----------------
const P4_STAR_MPA: f64 = 22.064;
const T4_STAR_K: f64 = 647.096;
const R4_N: [f64; 6] = [
    -7.859_517_83,
    1.844_082_59,
    -11.786_649_7,
    22.680_741_1,
    -15.961_871_9,
    1.801_225_02,
];

/// 삼중점 압력 [bar abs]
pub const TRIPLE_POINT_PRESSURE_BAR: f64 = 0.006_116_57;
/// 임계 압력 [bar abs]
pub const CRITICAL_PRESSURE_BAR: f64 = 220.64;
/// 임계 온도 [°C]
pub const CRITICAL_TEMPERATURE_C: f64 = 373.946;

/// 한 상태점의 IF97 물성.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct If97State {
    pub enthalpy_kj_kg: f64,
    pub specific_volume_m3_kg: f64,
    pub entropy_kj_kgk: f64,
}

/// 계산에 사용할 IF97 영역.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Region 1 강제 (압축수/포화수)
    Liquid,
    /// Region 2 강제 (과열/포화 증기)
    Vapour,
    /// 압력·온도로 자동 판정
    Auto,
}

fn evaluate(p_bar_abs: f64, t_c: f64, region: Region) -> Result<If97State, PropertyError> {
    let p_mpa = p_bar_abs / 10.0;
    let (h, v, s) = match region {
        Region::Liquid => (
            pt(p_mpa, t_c, (OH, 1)),
            pt(p_mpa, t_c, (OV, 1)),
            pt(p_mpa, t_c, (OS, 1)),
        ),
        Region::Vapour => (
            pt(p_mpa, t_c, (OH, 2)),
            pt(p_mpa, t_c, (OV, 2)),
            pt(p_mpa, t_c, (OS, 2)),
        ),
        Region::Auto => (pt(p_mpa, t_c, OH), pt(p_mpa, t_c, OV), pt(p_mpa, t_c, OS)),
    };
    if !h.is_finite() || !v.is_finite() || !s.is_finite() || v <= 0.0 {
        return Err(PropertyError::If97 {
            pressure_bar: p_bar_abs,
            temperature_c: t_c,
        });
    }
    Ok(If97State {
        enthalpy_kj_kg: h,
        specific_volume_m3_kg: v,
        entropy_kj_kgk: s,
    })
}

/// 지정한 영역으로 h/v/s를 계산한다. 입력은 bar(abs)/°C.
pub fn state(p_bar_abs: f64, t_c: f64, region: Region) -> Result<If97State, PropertyError> {
    if p_bar_abs <= 0.0 {
        return Err(PropertyError::out_of_range(
            "pressure [bar]",
            p_bar_abs,
            TRIPLE_POINT_PRESSURE_BAR,
            1000.0,
        ));
    }
    evaluate(p_bar_abs, t_c, region)
}

fn region4_sum(theta: f64) -> f64 {
    R4_N[0] * theta
        + R4_N[1] * theta.powf(1.5)
        + R4_N[2] * theta.powi(3)
        + R4_N[3] * theta.powf(3.5)
        + R4_N[4] * theta.powi(4)
        + R4_N[5] * theta.powf(7.5)
}

/// 포화압력(bar abs) - 입력 온도는 °C.
pub fn saturation_pressure_bar(t_c: f64) -> Result<f64, PropertyError> {
    let t_k = t_c + 273.15;
    if !(0.0..=CRITICAL_TEMPERATURE_C).contains(&t_c) {
        return Err(PropertyError::out_of_range(
            "saturation temperature [°C]",
            t_c,
            0.0,
            CRITICAL_TEMPERATURE_C,
        ));
    }
    let theta = 1.0 - t_k / T4_STAR_K;
    let p_mpa = P4_STAR_MPA * ((T4_STAR_K / t_k) * region4_sum(theta)).exp();
    Ok(p_mpa * 10.0)
}

/// 포화온도(°C) - 입력 압력은 bar abs. Region4 식을 뉴턴법으로 역산한다.
pub fn saturation_temperature_c(p_bar_abs: f64) -> Result<f64, PropertyError> {
    if !(TRIPLE_POINT_PRESSURE_BAR..=CRITICAL_PRESSURE_BAR).contains(&p_bar_abs) {
        return Err(PropertyError::out_of_range(
            "saturation pressure [bar]",
            p_bar_abs,
            TRIPLE_POINT_PRESSURE_BAR,
            CRITICAL_PRESSURE_BAR,
        ));
    }
    let ln_ratio = (p_bar_abs / 10.0 / P4_STAR_MPA).ln();
    let mut t_k = 373.15_f64;
    for _ in 0..30 {
        let theta = 1.0 - t_k / T4_STAR_K;
        let sum = region4_sum(theta);
        let f = (T4_STAR_K / t_k) * sum - ln_ratio;
        let dsum_dtheta = R4_N[0]
            + 1.5 * R4_N[1] * theta.powf(0.5)
            + 3.0 * R4_N[2] * theta.powi(2)
            + 3.5 * R4_N[3] * theta.powf(2.5)
            + 4.0 * R4_N[4] * theta.powi(3)
            + 7.5 * R4_N[5] * theta.powf(6.5);
        let df_dt = -(T4_STAR_K / t_k.powi(2)) * sum - (1.0 / t_k) * dsum_dtheta;
        let delta = f / df_dt;
        t_k -= delta;
        if delta.abs() < 1e-8 {
            break;
        }
    }
    Ok(t_k - 273.15)
}
