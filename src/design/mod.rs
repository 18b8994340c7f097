//! 여러 계산기를 조합하는 설비 설계 모듈 (플래시 챔버, 사이펀, 흡입 계통).

pub mod flash_chamber;
pub mod siphon;
pub mod suction;

pub use flash_chamber::{
    calculate_flash_chamber, validate_flash_chamber, FlashChamberInput, FlashChamberResult,
    FlashMode,
};
pub use siphon::{calculate_siphon, validate_siphon, ElbowConfig, PipeChoice, SiphonInput, SiphonResult};
pub use suction::{calculate_suction, validate_suction, ElevationMode, SuctionInput, SuctionResult};
