//! 물/증기/해수 물성 제공자.
//!
//! 계산기들은 [`PropertyProvider`] 트레이트만 알고 있으며, 기본 구현 [`SteamSeawater`]는
//! 물·증기에 IAPWS-IF97(seuif97), 해수에 Sharqawy 상관식을 사용한다.

pub mod fluid_state;
pub mod if97;
pub mod seawater;

use thiserror::Error;

pub use fluid_state::{FluidState, Phase};

/// 물성 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// 상관식 유효 범위 밖
    #[error("{quantity} = {value} is outside the valid range {min}..{max}")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// IF97 계산 결과가 유한하지 않음
    #[error("IF97 evaluation failed at {pressure_bar} bar(a), {temperature_c} °C")]
    If97 {
        pressure_bar: f64,
        temperature_c: f64,
    },
}

impl PropertyError {
    pub fn out_of_range(quantity: &'static str, value: f64, min: f64, max: f64) -> Self {
        PropertyError::OutOfRange {
            quantity,
            value,
            min,
            max,
        }
    }
}

/// 계산기가 소비하는 물성 함수 집합. 압력은 bar(abs), 온도는 °C, 염분은 ppm이다.
pub trait PropertyProvider: Send + Sync {
    /// 포화온도 [°C]
    fn saturation_temperature(&self, pressure_bar: f64) -> Result<f64, PropertyError>;
    /// 포화압력 [bar abs]
    fn saturation_pressure(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 포화수 비엔탈피 [kJ/kg]
    fn enthalpy_liquid(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 포화 증기 비엔탈피 [kJ/kg]
    fn enthalpy_vapor(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 포화수 엔트로피 [kJ/kg·K]
    fn entropy_liquid(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 포화 증기 엔트로피 [kJ/kg·K]
    fn entropy_vapor(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 포화수 밀도 [kg/m³]
    fn density_liquid(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 포화 증기 밀도 [kg/m³]
    fn density_vapor(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 과열 증기 비엔탈피 [kJ/kg]
    fn enthalpy_superheated(&self, pressure_bar: f64, temp_c: f64) -> Result<f64, PropertyError>;
    /// 과열 증기 엔트로피 [kJ/kg·K]
    fn entropy_superheated(&self, pressure_bar: f64, temp_c: f64) -> Result<f64, PropertyError>;
    /// 과열 증기 비체적 [m³/kg]
    fn specific_volume_superheated(
        &self,
        pressure_bar: f64,
        temp_c: f64,
    ) -> Result<f64, PropertyError>;
    /// 해수 밀도 [kg/m³]
    fn seawater_density(&self, salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError>;
    /// 해수 점도 [Pa·s]
    fn seawater_viscosity(&self, salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError>;
    /// 해수 비엔탈피 [kJ/kg]
    fn seawater_enthalpy(&self, salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError>;
    /// 해수 비열 [kJ/kg·K]
    fn seawater_specific_heat(&self, salinity_ppm: f64, temp_c: f64)
        -> Result<f64, PropertyError>;
    /// 액체 열전도율 [W/m·K]
    fn thermal_conductivity_liquid(&self, temp_c: f64) -> Result<f64, PropertyError>;
    /// 비점상승 [°C]
    fn boiling_point_elevation(&self, salinity_ppm: f64, temp_c: f64)
        -> Result<f64, PropertyError>;

    /// 해당 압력의 포화온도보다 높으면 과열 상태로 본다.
    fn is_superheated(&self, pressure_bar: f64, temp_c: f64) -> Result<bool, PropertyError> {
        Ok(temp_c > self.saturation_temperature(pressure_bar)?)
    }

    /// 증발 잠열 [kJ/kg]
    fn latent_heat(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(self.enthalpy_vapor(temp_c)? - self.enthalpy_liquid(temp_c)?)
    }

    /// 염분 물질수지로 농축수 염분 [ppm]을 구한다. 증발량이 공급량 이상이면 입구 염분을 그대로 둔다.
    fn brine_salinity(&self, inlet_salinity_ppm: f64, feed_flow: f64, vapor_flow: f64) -> f64 {
        let brine_flow = feed_flow - vapor_flow;
        if brine_flow <= 0.0 {
            return inlet_salinity_ppm;
        }
        inlet_salinity_ppm * feed_flow / brine_flow
    }
}

/// IF97 + Sharqawy 해수 상관식 기반의 기본 물성 제공자.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteamSeawater;

impl SteamSeawater {
    fn saturated(&self, temp_c: f64, region: if97::Region) -> Result<if97::If97State, PropertyError> {
        let p_sat = if97::saturation_pressure_bar(temp_c)?;
        if97::state(p_sat, temp_c, region)
    }
}

impl PropertyProvider for SteamSeawater {
    fn saturation_temperature(&self, pressure_bar: f64) -> Result<f64, PropertyError> {
        if97::saturation_temperature_c(pressure_bar)
    }

    fn saturation_pressure(&self, temp_c: f64) -> Result<f64, PropertyError> {
        if97::saturation_pressure_bar(temp_c)
    }

    fn enthalpy_liquid(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(self.saturated(temp_c, if97::Region::Liquid)?.enthalpy_kj_kg)
    }

    fn enthalpy_vapor(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(self.saturated(temp_c, if97::Region::Vapour)?.enthalpy_kj_kg)
    }

    fn entropy_liquid(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(self.saturated(temp_c, if97::Region::Liquid)?.entropy_kj_kgk)
    }

    fn entropy_vapor(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(self.saturated(temp_c, if97::Region::Vapour)?.entropy_kj_kgk)
    }

    fn density_liquid(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(1.0 / self.saturated(temp_c, if97::Region::Liquid)?.specific_volume_m3_kg)
    }

    fn density_vapor(&self, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(1.0 / self.saturated(temp_c, if97::Region::Vapour)?.specific_volume_m3_kg)
    }

    fn enthalpy_superheated(&self, pressure_bar: f64, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(if97::state(pressure_bar, temp_c, if97::Region::Vapour)?.enthalpy_kj_kg)
    }

    fn entropy_superheated(&self, pressure_bar: f64, temp_c: f64) -> Result<f64, PropertyError> {
        Ok(if97::state(pressure_bar, temp_c, if97::Region::Vapour)?.entropy_kj_kgk)
    }

    fn specific_volume_superheated(
        &self,
        pressure_bar: f64,
        temp_c: f64,
    ) -> Result<f64, PropertyError> {
        Ok(if97::state(pressure_bar, temp_c, if97::Region::Vapour)?.specific_volume_m3_kg)
    }

    fn seawater_density(&self, salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
        seawater::density(salinity_ppm, temp_c)
    }

    fn seawater_viscosity(&self, salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
        seawater::viscosity(salinity_ppm, temp_c)
    }

    fn seawater_enthalpy(&self, salinity_ppm: f64, temp_c: f64) -> Result<f64, PropertyError> {
        seawater::enthalpy(salinity_ppm, temp_c)
    }

    fn seawater_specific_heat(
        &self,
        salinity_ppm: f64,
        temp_c: f64,
    ) -> Result<f64, PropertyError> {
        seawater::specific_heat(salinity_ppm, temp_c)
    }

    fn thermal_conductivity_liquid(&self, temp_c: f64) -> Result<f64, PropertyError> {
        seawater::water_thermal_conductivity(temp_c)
    }

    fn boiling_point_elevation(
        &self,
        salinity_ppm: f64,
        temp_c: f64,
    ) -> Result<f64, PropertyError> {
        seawater::boiling_point_elevation(salinity_ppm, temp_c)
    }
}
