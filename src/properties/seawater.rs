//! 해수 물성 상관식 (Sharqawy, Lienhard & Zubair, 2010).
//!
//! 염분 입력은 ppm(mg/kg)이며 식 내부에서 kg/kg 또는 g/kg로 환산한다.
//! 유효 범위: 0~180°C, 0~160,000 ppm.

use super::PropertyError;

pub const MAX_TEMPERATURE_C: f64 = 180.0;
pub const MAX_SALINITY_PPM: f64 = 160_000.0;

fn check_range(salinity_ppm: f64, temp_c: f64) -> Result<(), PropertyError> {
    if !(0.0..=MAX_TEMPERATURE_C).contains(&temp_c) {
        return Err(PropertyError::out_of_range(
            "seawater temperature [°C]",
            temp_c,
            0.0,
            MAX_TEMPERATURE_C,
        ));
    }
    if !(0.0..=MAX_SALINITY_PPM).contains(&salinity_ppm) {
        return Err(PropertyError::out_of_range(
            "salinity [ppm]",
            salinity_ppm,
            0.0,
            MAX_SALINITY_PPM,
        ));
    }
    Ok(())
}

fn kg_per_kg(salinity_ppm: f64) -> f64 {
    salinity_ppm * 1e-6
}

/// 해수 밀도 [kg/m³]
pub fn density(salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
    check_range(salinity_ppm, temp_c)?;
    let s = kg_per_kg(salinity_ppm);
    let t = temp_c;
    let rho_w = 9.999e2 + 2.034e-2 * t - 6.162e-3 * t.powi(2) + 2.261e-5 * t.powi(3)
        - 4.657e-8 * t.powi(4);
    let d_rho = s
        * (8.020e2 - 2.001 * t + 1.677e-2 * t.powi(2) - 3.060e-5 * t.powi(3)
            - 1.613e-5 * s * t.powi(2));
    Ok(rho_w + d_rho)
}

/// 해수 점도 [Pa·s]
pub fn viscosity(salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
    check_range(salinity_ppm, temp_c)?;
    let s = kg_per_kg(salinity_ppm);
    let t = temp_c;
    let mu_w = 4.2844e-5 + 1.0 / (0.157 * (t + 64.993).powi(2) - 91.296);
    let a = 1.541 + 1.998e-2 * t - 9.52e-5 * t.powi(2);
    let b = 7.974 - 7.561e-2 * t + 4.724e-4 * t.powi(2);
    Ok(mu_w * (1.0 + a * s + b * s * s))
}

/// 해수 정압비열 [kJ/kg·K] (Jamieson 식, 염분 g/kg·온도 K)
pub fn specific_heat(salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
    check_range(salinity_ppm, temp_c)?;
    let s = salinity_ppm * 1e-3;
    let t_k = temp_c + 273.15;
    let a = 5.328 - 9.76e-2 * s + 4.04e-4 * s * s;
    let b = -6.913e-3 + 7.351e-4 * s - 3.15e-6 * s * s;
    let c = 9.6e-6 - 1.927e-6 * s + 8.23e-9 * s * s;
    let d = 2.5e-9 + 1.666e-9 * s - 7.125e-12 * s * s;
    Ok(a + b * t_k + c * t_k.powi(2) + d * t_k.powi(3))
}

/// 해수 비엔탈피 [kJ/kg]
pub fn enthalpy(salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
    check_range(salinity_ppm, temp_c)?;
    let s = kg_per_kg(salinity_ppm);
    let t = temp_c;
    let h_w = 141.355 + 4202.07 * t - 0.535 * t.powi(2) + 0.004 * t.powi(3);
    let dh = s
        * (-2.348e4 + 3.152e5 * s + 2.803e6 * s.powi(2) - 1.446e7 * s.powi(3) + 7.826e3 * t
            - 4.417e1 * t.powi(2)
            + 2.139e-1 * t.powi(3)
            - 1.991e4 * s * t
            + 2.778e4 * s.powi(2) * t
            + 9.728e1 * s * t.powi(2));
    Ok((h_w - dh) / 1000.0)
}

/// 비점상승(BPE) [°C]
pub fn boiling_point_elevation(salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
    check_range(salinity_ppm, temp_c)?;
    let s = kg_per_kg(salinity_ppm);
    let t = temp_c;
    let a = -4.584e-4 * t.powi(2) + 2.823e-1 * t + 17.95;
    let b = 1.536e-4 * t.powi(2) + 5.267e-2 * t + 6.56;
    Ok(a * s * s + b * s)
}

/// 순수 물 열전도율 [W/m·K]
pub fn water_thermal_conductivity(temp_c: f64) -> Result<f64, PropertyError> {
    check_range(0.0, temp_c)?;
    let tau = (temp_c + 273.15) / 298.15;
    Ok(0.6065 * (-1.48445 + 4.12292 * tau - 1.63866 * tau * tau))
}
