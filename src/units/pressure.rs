use serde::{Deserialize, Serialize};

/// 압력 단위. 모든 값은 절대압이며 내부 기준은 bar(abs)이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    Bar,
    MilliBar,
    Pascal,
    KiloPascal,
    MegaPascal,
    Psi,
    Atm,
    MmHg,
}

impl PressureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnit::Bar => "bar(a)",
            PressureUnit::MilliBar => "mbar(a)",
            PressureUnit::Pascal => "Pa(a)",
            PressureUnit::KiloPascal => "kPa(a)",
            PressureUnit::MegaPascal => "MPa(a)",
            PressureUnit::Psi => "psia",
            PressureUnit::Atm => "atm",
            PressureUnit::MmHg => "mmHg(a)",
        }
    }
}

const ATM_BAR: f64 = 1.01325;
const MMHG_PER_BAR: f64 = 750.062;
const PA_PER_BAR: f64 = 100_000.0;

/// 주어진 압력을 bar 로 변환한다.
pub fn to_bar(value: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Bar => value,
        PressureUnit::MilliBar => value / 1000.0,
        PressureUnit::Pascal => value / PA_PER_BAR,
        PressureUnit::KiloPascal => value / 100.0,
        PressureUnit::MegaPascal => value * 10.0,
        PressureUnit::Psi => value * 0.0689476,
        PressureUnit::Atm => value * ATM_BAR,
        PressureUnit::MmHg => value / MMHG_PER_BAR,
    }
}

/// bar 값을 원하는 단위로 변환한다.
/// mbar/kPa는 곱셈 한 번으로 끝나므로 `mbar == bar * 1000`, `kPa == bar * 100`이 정확히 성립한다.
pub fn from_bar(value_bar: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Bar => value_bar,
        PressureUnit::MilliBar => value_bar * 1000.0,
        PressureUnit::Pascal => value_bar * PA_PER_BAR,
        PressureUnit::KiloPascal => value_bar * 100.0,
        PressureUnit::MegaPascal => value_bar / 10.0,
        PressureUnit::Psi => value_bar / 0.0689476,
        PressureUnit::Atm => value_bar / ATM_BAR,
        PressureUnit::MmHg => value_bar * MMHG_PER_BAR,
    }
}

/// 압력을 원하는 단위로 변환한다.
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    let bar = to_bar(value, from);
    from_bar(bar, to)
}

/// 표준 대기압 [bar abs]
pub const ATMOSPHERIC_PRESSURE_BAR: f64 = ATM_BAR;
