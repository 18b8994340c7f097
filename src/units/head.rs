//! 압력 ↔ 수두 환산. 밀도와 중력가속도를 반영한다.

use super::GRAVITY_M_S2;

const PA_PER_BAR: f64 = 100_000.0;

/// 압력(bar)을 해당 유체의 수두(m)로 환산한다.
pub fn bar_to_head(pressure_bar: f64, density_kg_m3: f64) -> f64 {
    pressure_bar * PA_PER_BAR / (density_kg_m3 * GRAVITY_M_S2)
}

/// 수두(m)를 압력(bar)으로 환산한다.
pub fn head_to_bar(head_m: f64, density_kg_m3: f64) -> f64 {
    head_m * density_kg_m3 * GRAVITY_M_S2 / PA_PER_BAR
}
