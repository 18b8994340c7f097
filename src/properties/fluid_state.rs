use serde::{Deserialize, Serialize};

use super::{PropertyError, PropertyProvider};

/// 유체 상(phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Liquid,
    Vapour,
    /// 포화 습증기. 건도는 [`FluidState::quality`]
    TwoPhase,
}

/// 유체 상태값. 밀도/점도/엔탈피 등은 저장하지 않고 필요할 때 물성 제공자로 계산한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidState {
    pub temperature_c: f64,
    pub pressure_bar: f64,
    pub salinity_ppm: f64,
    pub phase: Phase,
    /// 건도 x (TwoPhase에서만 Some)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl FluidState {
    /// 압력과 염분에서 포화 상태인 액체(T = Tsat + BPE).
    pub fn saturated_liquid(
        pressure_bar: f64,
        salinity_ppm: f64,
        props: &dyn PropertyProvider,
    ) -> Result<Self, PropertyError> {
        let t_sat = props.saturation_temperature(pressure_bar)?;
        let bpe = props.boiling_point_elevation(salinity_ppm, t_sat)?;
        Ok(Self {
            temperature_c: t_sat + bpe,
            pressure_bar,
            salinity_ppm,
            phase: Phase::Liquid,
            quality: None,
        })
    }

    /// 과열(또는 포화) 증기. 온도가 포화온도보다 낮으면 오류.
    pub fn vapour(
        pressure_bar: f64,
        temperature_c: f64,
        props: &dyn PropertyProvider,
    ) -> Result<Self, PropertyError> {
        let t_sat = props.saturation_temperature(pressure_bar)?;
        if temperature_c < t_sat {
            return Err(PropertyError::out_of_range(
                "vapour temperature [°C]",
                temperature_c,
                t_sat,
                f64::INFINITY,
            ));
        }
        Ok(Self {
            temperature_c,
            pressure_bar,
            salinity_ppm: 0.0,
            phase: Phase::Vapour,
            quality: None,
        })
    }

    /// 압력 포화온도의 순수 습증기. 건도는 0~1.
    pub fn wet(
        pressure_bar: f64,
        quality: f64,
        props: &dyn PropertyProvider,
    ) -> Result<Self, PropertyError> {
        if !(0.0..=1.0).contains(&quality) {
            return Err(PropertyError::out_of_range("steam quality", quality, 0.0, 1.0));
        }
        Ok(Self {
            temperature_c: props.saturation_temperature(pressure_bar)?,
            pressure_bar,
            salinity_ppm: 0.0,
            phase: Phase::TwoPhase,
            quality: Some(quality),
        })
    }

    fn dryness(&self) -> f64 {
        self.quality.unwrap_or(1.0)
    }

    /// 압력·염분 기준 포화온도(Tsat + BPE) [°C]
    pub fn saturation_temperature(&self, props: &dyn PropertyProvider) -> Result<f64, PropertyError> {
        let t_sat = props.saturation_temperature(self.pressure_bar)?;
        Ok(t_sat + props.boiling_point_elevation(self.salinity_ppm, t_sat)?)
    }

    /// 과열도 = T - (Tsat + BPE) [°C]
    pub fn superheat(&self, props: &dyn PropertyProvider) -> Result<f64, PropertyError> {
        Ok(self.temperature_c - self.saturation_temperature(props)?)
    }

    pub fn is_superheated(&self, props: &dyn PropertyProvider) -> Result<bool, PropertyError> {
        Ok(self.phase == Phase::Vapour && self.superheat(props)? >= 0.0)
    }

    /// 밀도 [kg/m³]
    pub fn density(&self, props: &dyn PropertyProvider) -> Result<f64, PropertyError> {
        match self.phase {
            Phase::Liquid => props.seawater_density(self.salinity_ppm, self.temperature_c),
            Phase::Vapour => Ok(1.0
                / props.specific_volume_superheated(self.pressure_bar, self.temperature_c)?),
            Phase::TwoPhase => {
                let x = self.dryness();
                let v_f = 1.0 / props.density_liquid(self.temperature_c)?;
                let v_g = 1.0 / props.density_vapor(self.temperature_c)?;
                Ok(1.0 / (v_f + x * (v_g - v_f)))
            }
        }
    }

    /// 점도 [Pa·s]
    pub fn viscosity(&self, props: &dyn PropertyProvider) -> Result<f64, PropertyError> {
        match self.phase {
            Phase::Liquid => props.seawater_viscosity(self.salinity_ppm, self.temperature_c),
            Phase::Vapour => Ok(steam_vapor_viscosity(self.temperature_c)),
            // McAdams
            Phase::TwoPhase => {
                let x = self.dryness();
                let mu_f = props.seawater_viscosity(0.0, self.temperature_c)?;
                let mu_g = steam_vapor_viscosity(self.temperature_c);
                Ok(1.0 / (x / mu_g + (1.0 - x) / mu_f))
            }
        }
    }

    /// 비엔탈피 [kJ/kg]
    pub fn enthalpy(&self, props: &dyn PropertyProvider) -> Result<f64, PropertyError> {
        match self.phase {
            Phase::Liquid => props.seawater_enthalpy(self.salinity_ppm, self.temperature_c),
            Phase::Vapour => props.enthalpy_superheated(self.pressure_bar, self.temperature_c),
            Phase::TwoPhase => {
                let h_f = props.enthalpy_liquid(self.temperature_c)?;
                let h_g = props.enthalpy_vapor(self.temperature_c)?;
                Ok(h_f + self.dryness() * (h_g - h_f))
            }
        }
    }

    /// 엔트로피 [kJ/kg·K]
    pub fn entropy(&self, props: &dyn PropertyProvider) -> Result<f64, PropertyError> {
        match self.phase {
            Phase::Liquid => props.entropy_liquid(self.temperature_c),
            Phase::Vapour => props.entropy_superheated(self.pressure_bar, self.temperature_c),
            Phase::TwoPhase => {
                let s_f = props.entropy_liquid(self.temperature_c)?;
                let s_g = props.entropy_vapor(self.temperature_c)?;
                Ok(s_f + self.dryness() * (s_g - s_f))
            }
        }
    }
}

fn steam_vapor_viscosity(temp_c: f64) -> f64 {
    // 서덜랜드 근사 (300K에서 약 1.3e-5 Pa·s)
    let temp_k = temp_c + 273.15;
    let t0 = 300.0;
    let mu0 = 1.3e-5;
    let s = 111.0;
    mu0 * (temp_k / t0).powf(1.5) * (t0 + s) / (temp_k + s)
}
