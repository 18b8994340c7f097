//! 단일 목적 열/유체 계산기 모음.

pub mod desuperheat;
pub mod dosing;
pub mod flash;
pub mod heat_duty;
pub mod htc;
pub mod lmtd;
pub mod ncg;
pub mod npsha;
pub mod pump;
pub mod vapour_compression;

pub use flash::{flash_at_pressure, flash_split, FlashSplit};
pub use lmtd::{calculate_lmtd, FlowArrangement, LmtdInput, LmtdResult};
pub use npsha::{calculate_npsha, NpshaInput, NpshaResult, VesselPressure};
pub use vapour_compression::{calculate_mvc, calculate_tvc, MvcInput, MvcResult, TvcInput, TvcResult};
