//! 계산기 공통 오류 타입과 입력 검증 결과.

use serde::Serialize;
use thiserror::Error;

use crate::piping::catalog::CatalogError;
use crate::properties::PropertyError;

/// 계산 중 발생 가능한 오류.
///
/// 입력 오류는 계산을 즉시 중단시키고, 설계 품질 경고는 결과의 `warnings`에 담긴다.
#[derive(Debug, Error)]
pub enum CalcError {
    /// 물리적으로 허용되지 않는 입력. 여러 항목이면 `; `로 이어 붙인다.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// 물성 계산 실패
    #[error("property evaluation failed: {0}")]
    Property(#[from] PropertyError),
    /// 배관 카탈로그 오류
    #[error("pipe catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl CalcError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }
}

/// `validate_*` 함수가 반환하는 검증 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// 오류가 있으면 `; `로 합친 `InvalidInput`을, 없으면 경고 목록을 돌려준다.
    pub fn into_result(self) -> Result<Vec<String>, CalcError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(CalcError::InvalidInput(self.errors.join("; ")))
        }
    }
}
