//! 배관 피팅 종류와 손실계수(K).
//!
//! 리듀서/익스팬더는 표의 고정값이 아니라 직경비(β = d_small / d_large)로 K를 계산한다.

use serde::{Deserialize, Serialize};

/// 스트레이너 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrainerType {
    YType,
    Bucket,
}

impl StrainerType {
    /// (청정, 막힘) 상태 K
    pub fn k_factors(self) -> (f64, f64) {
        match self {
            StrainerType::YType => (2.0, 8.0),
            StrainerType::Bucket => (4.0, 12.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrainerType::YType => "Y-Strainer",
            StrainerType::Bucket => "Bucket Strainer",
        }
    }
}

/// 스트레이너 오염 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrainerCondition {
    Clean,
    Dirty,
}

/// 피팅 종류. 닫힌 열거형이며 종류마다 K와 표시명이 정해져 있다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FittingType {
    Elbow90Standard,
    Elbow90LongRadius,
    Elbow45,
    TeeRun,
    TeeBranch,
    GateValve,
    GlobeValve,
    BallValve,
    ButterflyValve,
    CheckValveSwing,
    EntranceSharp,
    EntranceRounded,
    Exit,
    Strainer {
        kind: StrainerType,
        condition: StrainerCondition,
    },
    /// 축소관. `beta` = 소경/대경
    Reducer { beta: f64, eccentric: bool },
    /// 확대관. `beta` = 소경/대경
    Expander { beta: f64, eccentric: bool },
}

/// 편심 리듀서/익스팬더 보정 배수
pub const ECCENTRIC_MULTIPLIER: f64 = 1.2;

/// 축소관 K = 0.5·(1-β²)²
pub fn contraction_k(beta: f64, eccentric: bool) -> f64 {
    let k = 0.5 * (1.0 - beta * beta).powi(2);
    if eccentric {
        k * ECCENTRIC_MULTIPLIER
    } else {
        k
    }
}

/// 확대관 K = (1-β²)²
pub fn expansion_k(beta: f64, eccentric: bool) -> f64 {
    let k = (1.0 - beta * beta).powi(2);
    if eccentric {
        k * ECCENTRIC_MULTIPLIER
    } else {
        k
    }
}

impl FittingType {
    pub fn k_factor(&self) -> f64 {
        match *self {
            FittingType::Elbow90Standard => 0.75,
            FittingType::Elbow90LongRadius => 0.45,
            FittingType::Elbow45 => 0.35,
            FittingType::TeeRun => 0.4,
            FittingType::TeeBranch => 1.0,
            FittingType::GateValve => 0.17,
            FittingType::GlobeValve => 6.0,
            FittingType::BallValve => 0.05,
            FittingType::ButterflyValve => 0.5,
            FittingType::CheckValveSwing => 2.0,
            FittingType::EntranceSharp => 0.5,
            FittingType::EntranceRounded => 0.05,
            FittingType::Exit => 1.0,
            FittingType::Strainer { kind, condition } => {
                let (clean, dirty) = kind.k_factors();
                match condition {
                    StrainerCondition::Clean => clean,
                    StrainerCondition::Dirty => dirty,
                }
            }
            FittingType::Reducer { beta, eccentric } => contraction_k(beta, eccentric),
            FittingType::Expander { beta, eccentric } => expansion_k(beta, eccentric),
        }
    }

    pub fn name(&self) -> String {
        match *self {
            FittingType::Elbow90Standard => "90° Elbow (Standard)".into(),
            FittingType::Elbow90LongRadius => "90° Elbow (Long Radius)".into(),
            FittingType::Elbow45 => "45° Elbow".into(),
            FittingType::TeeRun => "Tee (Run)".into(),
            FittingType::TeeBranch => "Tee (Branch)".into(),
            FittingType::GateValve => "Gate Valve".into(),
            FittingType::GlobeValve => "Globe Valve".into(),
            FittingType::BallValve => "Ball Valve".into(),
            FittingType::ButterflyValve => "Butterfly Valve".into(),
            FittingType::CheckValveSwing => "Swing Check Valve".into(),
            FittingType::EntranceSharp => "Pipe Entrance (Sharp)".into(),
            FittingType::EntranceRounded => "Pipe Entrance (Rounded)".into(),
            FittingType::Exit => "Pipe Exit".into(),
            FittingType::Strainer { kind, condition } => match condition {
                StrainerCondition::Clean => format!("{} (clean)", kind.name()),
                StrainerCondition::Dirty => format!("{} (dirty)", kind.name()),
            },
            FittingType::Reducer { eccentric, .. } => {
                if eccentric {
                    "Eccentric Reducer".into()
                } else {
                    "Concentric Reducer".into()
                }
            }
            FittingType::Expander { eccentric, .. } => {
                if eccentric {
                    "Eccentric Expander".into()
                } else {
                    "Concentric Expander".into()
                }
            }
        }
    }
}

/// 피팅 종류와 개수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittingSpec {
    pub fitting: FittingType,
    pub count: u32,
}

impl FittingSpec {
    pub fn new(fitting: FittingType, count: u32) -> Self {
        Self { fitting, count }
    }

    pub fn total_k(&self) -> f64 {
        self.fitting.k_factor() * f64::from(self.count)
    }
}
