//! 감압 플래시의 증기/액 분율 (엔탈피 보존).

use serde::Serialize;

use crate::error::CalcError;
use crate::properties::PropertyProvider;

/// 플래시 분율 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlashSplit {
    /// 증기 질량 분율 (kg vapour / kg feed), [0, 1]
    pub vapor_fraction: f64,
    pub inlet_enthalpy_kj_kg: f64,
    pub liquid_enthalpy_kj_kg: f64,
    pub vapor_enthalpy_kj_kg: f64,
}

impl FlashSplit {
    pub fn flash_occurs(&self) -> bool {
        self.vapor_fraction > 0.0
    }
}

/// fraction = (h_in - h_liq) / (h_vap - h_liq)
pub fn flash_split(
    inlet_enthalpy_kj_kg: f64,
    liquid_enthalpy_kj_kg: f64,
    vapor_enthalpy_kj_kg: f64,
) -> Result<FlashSplit, CalcError> {
    let denom = vapor_enthalpy_kj_kg - liquid_enthalpy_kj_kg;
    if denom <= 0.0 {
        return Err(CalcError::invalid(format!(
            "Vapour enthalpy ({vapor_enthalpy_kj_kg:.2} kJ/kg) must exceed liquid enthalpy ({liquid_enthalpy_kj_kg:.2} kJ/kg)"
        )));
    }
    let fraction = ((inlet_enthalpy_kj_kg - liquid_enthalpy_kj_kg) / denom).clamp(0.0, 1.0);
    Ok(FlashSplit {
        vapor_fraction: fraction,
        inlet_enthalpy_kj_kg,
        liquid_enthalpy_kj_kg,
        vapor_enthalpy_kj_kg,
    })
}

/// 입구 엔탈피의 염수가 `pressure_bar`로 감압될 때의 분율.
///
/// 잔류 염수는 Tsat + BPE, 발생 증기는 같은 온도의 과열 증기로 본다.
pub fn flash_at_pressure(
    inlet_enthalpy_kj_kg: f64,
    pressure_bar: f64,
    salinity_ppm: f64,
    props: &dyn PropertyProvider,
) -> Result<FlashSplit, CalcError> {
    let t_sat = props.saturation_temperature(pressure_bar)?;
    let t_brine = t_sat + props.boiling_point_elevation(salinity_ppm, t_sat)?;
    let h_liquid = props.seawater_enthalpy(salinity_ppm, t_brine)?;
    let h_vapor = props.enthalpy_superheated(pressure_bar, t_brine)?;
    flash_split(inlet_enthalpy_kj_kg, h_liquid, h_vapor)
}
