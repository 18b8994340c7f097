//! 요구 단면적 또는 목표 유속으로 카탈로그에서 배관을 고른다.
//!
//! 요구값을 만족하는 가장 작은 규격을 고르는 단순한 방식이며, 최적화는 하지 않는다.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogError, PipeCatalog, PipeVariant};

/// 실제 유속의 허용 범위 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VelocityStatus {
    Ok,
    High,
    Low,
}

/// 유속 허용 범위 [m/s]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityLimits {
    pub min_m_s: f64,
    pub max_m_s: f64,
}

impl VelocityLimits {
    pub const fn new(min_m_s: f64, max_m_s: f64) -> Self {
        Self { min_m_s, max_m_s }
    }

    pub fn classify(&self, velocity_m_s: f64) -> VelocityStatus {
        if velocity_m_s > self.max_m_s {
            VelocityStatus::High
        } else if velocity_m_s < self.min_m_s {
            VelocityStatus::Low
        } else {
            VelocityStatus::Ok
        }
    }
}

/// 단면적 기준으로 선택된 배관.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPipe {
    pub pipe: PipeVariant,
    pub display_name: String,
    /// false면 요구 단면적보다 작은 최대 규격이 반환된 것이다.
    pub is_exact_match: bool,
}

/// 유속 기준으로 선택된 배관과 실제 유속.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizedPipe {
    pub selected: SelectedPipe,
    pub required_area_mm2: f64,
    pub actual_velocity_m_s: f64,
    pub velocity_status: VelocityStatus,
}

impl SizedPipe {
    pub fn pipe(&self) -> &PipeVariant {
        &self.selected.pipe
    }

    /// 이미 정해진 배관(NPS 지정, 사용자 내경)에 대해 유속만 평가한다.
    pub fn fixed(pipe: PipeVariant, volumetric_flow_m3_s: f64, limits: VelocityLimits) -> Self {
        let actual_velocity_m_s = volumetric_flow_m3_s / pipe.area_m2();
        Self {
            required_area_mm2: pipe.area_mm2,
            velocity_status: limits.classify(actual_velocity_m_s),
            actual_velocity_m_s,
            selected: SelectedPipe {
                display_name: pipe.display_name(),
                is_exact_match: true,
                pipe,
            },
        }
    }
}

/// 단면적이 `required_area_mm2` 이상인 가장 작은 배관을 고른다.
pub fn select_by_area(
    required_area_mm2: f64,
    catalog: &PipeCatalog,
) -> Result<SelectedPipe, CatalogError> {
    if let Some(pipe) = catalog
        .variants()
        .iter()
        .find(|v| v.area_mm2 >= required_area_mm2)
    {
        return Ok(SelectedPipe {
            display_name: pipe.display_name(),
            is_exact_match: true,
            pipe: pipe.clone(),
        });
    }
    let largest = catalog.largest().ok_or(CatalogError::EmptyCatalog)?;
    Ok(SelectedPipe {
        display_name: format!("{} (MAX)", largest.display_name()),
        is_exact_match: false,
        pipe: largest.clone(),
    })
}

/// 목표 유속으로 요구 단면적을 구해 배관을 고르고 실제 유속을 판정한다.
pub fn select_by_velocity(
    volumetric_flow_m3_s: f64,
    target_velocity_m_s: f64,
    limits: VelocityLimits,
    catalog: &PipeCatalog,
) -> Result<SizedPipe, CatalogError> {
    let required_area_mm2 = volumetric_flow_m3_s / target_velocity_m_s * 1e6;
    let selected = select_by_area(required_area_mm2, catalog)?;
    let actual_velocity_m_s = volumetric_flow_m3_s / selected.pipe.area_m2();
    Ok(SizedPipe {
        selected,
        required_area_mm2,
        actual_velocity_m_s,
        velocity_status: limits.classify(actual_velocity_m_s),
    })
}
