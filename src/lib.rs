//! 열 담수화 설비 설계 계산 엔진.
//!
//! 계산기는 모두 입력만으로 결과가 정해지는 순수 함수이며, 물성은 [`properties::PropertyProvider`],
//! 배관 규격은 [`piping::catalog::PipeCatalog`]로 주입받는다. CLI는 `app`/`ui_cli`에 있다.

pub mod app;
pub mod config;
pub mod design;
pub mod error;
pub mod piping;
pub mod properties;
pub mod solver;
pub mod thermal;
pub mod ui_cli;
pub mod units;

pub use error::{CalcError, ValidationReport};
