//! 단위 정의 및 변환 모듈 모음.

pub mod flow;
pub mod head;
pub mod pressure;

/// 중력가속도 [m/s²]
pub const GRAVITY_M_S2: f64 = 9.81;

pub use flow::{
    convert_mass_flow, kg_s_to_ton_hr, mass_to_volumetric_flow, ton_hr_to_kg_s, ton_hr_to_m3_s,
    MassFlowUnit,
};
pub use head::{bar_to_head, head_to_bar};
pub use pressure::{convert_pressure, PressureUnit};
