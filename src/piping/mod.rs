//! 배관 규격, 선택, 피팅, 압력손실 계산 모듈 모음.

pub mod catalog;
pub mod fittings;
pub mod pressure_drop;
pub mod selector;

pub use catalog::{CatalogError, PipeCatalog, PipeCatalogCache, PipeCatalogSource, PipeVariant};
pub use fittings::{FittingSpec, FittingType, StrainerCondition, StrainerType};
pub use pressure_drop::{calculate_pressure_drop, FlowRegime, PressureDropInput, PressureDropResult};
pub use selector::{
    select_by_area, select_by_velocity, SelectedPipe, SizedPipe, VelocityLimits, VelocityStatus,
};
