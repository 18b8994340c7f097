//! 표준 배관 규격표(ASME B36.10M / B36.19M)와 스케줄별 카탈로그 캐시.
//!
//! 내경과 단면적은 항상 OD/WT에서 유도한다. 사용자가 내경을 직접 지정하는 경우는
//! [`PipeVariant::custom`]으로 만들고 `is_custom` 플래그로 구분한다.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// 카탈로그 조회 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// 선택할 배관이 하나도 없음
    #[error("pipe catalog is empty")]
    EmptyCatalog,
    /// 지원하지 않는 스케줄
    #[error("unknown pipe schedule: {0}")]
    UnknownSchedule(String),
    /// NPS/DN 조회 실패
    #[error("pipe size not found in catalog: {0}")]
    SizeNotFound(String),
}

/// 배관 한 규격.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeVariant {
    /// NPS 표기 (예: "1-1/2", "6")
    pub nps: String,
    /// NPS 인치 환산값
    pub nps_inches: f64,
    /// DN 표기 (예: "150")
    pub dn: String,
    pub schedule: String,
    pub outer_diameter_mm: f64,
    pub wall_thickness_mm: f64,
    /// OD - 2·WT
    pub inner_diameter_mm: f64,
    /// π·ID²/4
    pub area_mm2: f64,
    /// 탄소강 기준 단위 중량 [kg/m]
    pub weight_kg_per_m: f64,
    pub is_custom: bool,
}

impl PipeVariant {
    pub fn new(
        nps: &str,
        nps_inches: f64,
        dn: &str,
        schedule: &str,
        outer_diameter_mm: f64,
        wall_thickness_mm: f64,
    ) -> Self {
        let inner_diameter_mm = outer_diameter_mm - 2.0 * wall_thickness_mm;
        Self {
            nps: nps.to_string(),
            nps_inches,
            dn: dn.to_string(),
            schedule: schedule.to_string(),
            outer_diameter_mm,
            wall_thickness_mm,
            inner_diameter_mm,
            area_mm2: PI * inner_diameter_mm * inner_diameter_mm / 4.0,
            weight_kg_per_m: 0.02466 * wall_thickness_mm * (outer_diameter_mm - wall_thickness_mm),
            is_custom: false,
        }
    }

    /// 사용자 지정 내경 배관. 카탈로그 값 대신 주어진 ID로 단면적을 계산한다.
    pub fn custom(inner_diameter_mm: f64) -> Self {
        Self {
            nps: "Custom".to_string(),
            nps_inches: inner_diameter_mm / 25.4,
            dn: format!("{inner_diameter_mm:.1}"),
            schedule: "custom".to_string(),
            outer_diameter_mm: inner_diameter_mm,
            wall_thickness_mm: 0.0,
            inner_diameter_mm,
            area_mm2: PI * inner_diameter_mm * inner_diameter_mm / 4.0,
            weight_kg_per_m: 0.0,
            is_custom: true,
        }
    }

    pub fn inner_diameter_m(&self) -> f64 {
        self.inner_diameter_mm / 1000.0
    }

    pub fn area_m2(&self) -> f64 {
        self.area_mm2 * 1e-6
    }

    /// 표시용 이름. 예: `6" Sch 40 (DN150)`
    pub fn display_name(&self) -> String {
        if self.is_custom {
            format!("Custom ID {:.1} mm", self.inner_diameter_mm)
        } else {
            format!("{}\" Sch {} (DN{})", self.nps, self.schedule, self.dn)
        }
    }
}

/// 단면적 오름차순, NPS 중복 제거된 배관 목록.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeCatalog {
    pub schedule: String,
    variants: Vec<PipeVariant>,
}

impl PipeCatalog {
    /// 임의 순서의 목록으로 카탈로그를 만든다. 같은 NPS가 여러 번 나오면 첫 번째만 남긴다.
    pub fn from_variants(schedule: &str, mut variants: Vec<PipeVariant>) -> Self {
        let mut seen = Vec::with_capacity(variants.len());
        variants.retain(|v| {
            if seen.contains(&v.nps) {
                false
            } else {
                seen.push(v.nps.clone());
                true
            }
        });
        variants.sort_by(|a, b| a.area_mm2.total_cmp(&b.area_mm2));
        Self {
            schedule: schedule.to_string(),
            variants,
        }
    }

    /// 내장 규격표(스케줄 10/40/80)로 카탈로그를 만든다.
    pub fn standard(schedule: &str) -> Result<Self, CatalogError> {
        StaticPipeTables.fetch(schedule)
    }

    pub fn variants(&self) -> &[PipeVariant] {
        &self.variants
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn largest(&self) -> Option<&PipeVariant> {
        self.variants.last()
    }

    pub fn find_by_nps(&self, nps: &str) -> Option<&PipeVariant> {
        self.variants.iter().find(|v| v.nps == nps)
    }

    pub fn find_by_dn(&self, dn: &str) -> Option<&PipeVariant> {
        self.variants.iter().find(|v| v.dn == dn)
    }
}

/// 스케줄별 배관 목록을 제공하는 외부 소스.
pub trait PipeCatalogSource: Send + Sync {
    fn fetch(&self, schedule: &str) -> Result<PipeCatalog, CatalogError>;
}

/// 외부 의존 없이 쓸 수 있는 내장 규격표.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPipeTables;

/// (NPS, NPS inch, DN, OD mm, WT Sch10, WT Sch40, WT Sch80)
type SizeRow = (&'static str, f64, &'static str, f64, f64, f64, f64);

const SIZE_TABLE: [SizeRow; 19] = [
    ("1/2", 0.5, "15", 21.3, 2.11, 2.77, 3.73),
    ("3/4", 0.75, "20", 26.7, 2.11, 2.87, 3.91),
    ("1", 1.0, "25", 33.4, 2.77, 3.38, 4.55),
    ("1-1/4", 1.25, "32", 42.2, 2.77, 3.56, 4.85),
    ("1-1/2", 1.5, "40", 48.3, 2.77, 3.68, 5.08),
    ("2", 2.0, "50", 60.3, 2.77, 3.91, 5.54),
    ("2-1/2", 2.5, "65", 73.0, 3.05, 5.16, 7.01),
    ("3", 3.0, "80", 88.9, 3.05, 5.49, 7.62),
    ("4", 4.0, "100", 114.3, 3.05, 6.02, 8.56),
    ("5", 5.0, "125", 141.3, 3.40, 6.55, 9.53),
    ("6", 6.0, "150", 168.3, 3.40, 7.11, 10.97),
    ("8", 8.0, "200", 219.1, 3.76, 8.18, 12.70),
    ("10", 10.0, "250", 273.0, 4.19, 9.27, 15.09),
    ("12", 12.0, "300", 323.8, 4.57, 10.31, 17.48),
    ("14", 14.0, "350", 355.6, 6.35, 11.13, 19.05),
    ("16", 16.0, "400", 406.4, 6.35, 12.70, 21.44),
    ("18", 18.0, "450", 457.0, 6.35, 14.27, 23.83),
    ("20", 20.0, "500", 508.0, 6.35, 15.09, 26.19),
    ("24", 24.0, "600", 610.0, 6.35, 17.48, 30.96),
];

impl PipeCatalogSource for StaticPipeTables {
    fn fetch(&self, schedule: &str) -> Result<PipeCatalog, CatalogError> {
        let pick: fn(&SizeRow) -> f64 = match schedule {
            "10" => |r| r.4,
            "40" => |r| r.5,
            "80" => |r| r.6,
            other => return Err(CatalogError::UnknownSchedule(other.to_string())),
        };
        let variants = SIZE_TABLE
            .iter()
            .map(|row| PipeVariant::new(row.0, row.1, row.2, schedule, row.3, pick(row)))
            .collect();
        Ok(PipeCatalog::from_variants(schedule, variants))
    }
}

/// 스케줄 문자열을 키로 하는 카탈로그 캐시. 최초 조회 시 소스에서 읽어 채운다.
///
/// 같은 스케줄을 동시에 채우더라도 결과가 같으므로 나중에 쓴 값이 남아도 무방하다.
pub struct PipeCatalogCache<S: PipeCatalogSource = StaticPipeTables> {
    source: S,
    entries: RwLock<HashMap<String, Arc<PipeCatalog>>>,
}

impl Default for PipeCatalogCache<StaticPipeTables> {
    fn default() -> Self {
        Self::new(StaticPipeTables)
    }
}

impl<S: PipeCatalogSource> PipeCatalogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, schedule: &str) -> Result<Arc<PipeCatalog>, CatalogError> {
        if let Ok(entries) = self.entries.read() {
            if let Some(hit) = entries.get(schedule) {
                return Ok(Arc::clone(hit));
            }
        }
        debug!(schedule, "loading pipe catalog");
        let catalog = Arc::new(self.source.fetch(schedule)?);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(schedule.to_string(), Arc::clone(&catalog));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 캐시를 비운다. 테스트 격리용.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
