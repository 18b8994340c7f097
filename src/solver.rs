//! 단조 함수의 근을 구간 이분법으로 찾는다.
//!
//! 반복 횟수 상한에 도달하면 오류 대신 마지막 구간의 중점을 돌려준다.
//! 대상 함수가 구간 안에서 증가함수라는 가정은 호출 측 책임이며 여기서 검사하지 않는다.

use tracing::warn;

/// 이분법 기본 반복 상한.
pub const MAX_BISECTION_ITERATIONS: usize = 50;
/// 엔트로피 기준 수렴 허용오차 [kJ/kg·K]
pub const ENTROPY_TOLERANCE_KJ_KGK: f64 = 0.001;
/// 엔탈피 기준 수렴 허용오차 [kJ/kg]
pub const ENTHALPY_TOLERANCE_KJ_KG: f64 = 0.1;

/// 이분법 탐색 구간과 종료 조건.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    pub lower: f64,
    pub upper: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// 이분법 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectionOutcome {
    pub root: f64,
    pub iterations: usize,
    /// false면 반복 상한으로 종료된 근사값이다.
    pub converged: bool,
}

impl Bisection {
    pub fn new(lower: f64, upper: f64, tolerance: f64) -> Self {
        Self {
            lower,
            upper,
            tolerance,
            max_iterations: MAX_BISECTION_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// `evaluate(x) == target`이 되는 x를 찾는다. `evaluate`는 x에 대해 증가함수여야 한다.
    pub fn solve<F, E>(&self, target: f64, mut evaluate: F) -> Result<BisectionOutcome, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let mut lower = self.lower;
        let mut upper = self.upper;
        for iteration in 1..=self.max_iterations {
            let mid = 0.5 * (lower + upper);
            let residual = evaluate(mid)? - target;
            if residual.abs() < self.tolerance {
                return Ok(BisectionOutcome {
                    root: mid,
                    iterations: iteration,
                    converged: true,
                });
            }
            if residual < 0.0 {
                lower = mid;
            } else {
                upper = mid;
            }
        }
        let root = 0.5 * (lower + upper);
        warn!(
            target,
            root,
            iterations = self.max_iterations,
            "bisection stopped at iteration cap"
        );
        Ok(BisectionOutcome {
            root,
            iterations: self.max_iterations,
            converged: false,
        })
    }
}
