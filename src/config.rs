use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::units::PressureUnit;

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_FILE: &str = "desal_toolbox.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 배관 스케줄 ("10", "40", "80")
    pub pipe_schedule: String,
    /// 텍스트 출력 시 압력 표시 단위
    pub display_pressure_unit: PressureUnit,
    /// `RUST_LOG`가 없을 때 쓰는 tracing 필터
    pub log_filter: String,
    #[serde(skip)]
    path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipe_schedule: "40".to_string(),
            display_pressure_unit: PressureUnit::MilliBar,
            log_filter: "info".to_string(),
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 파싱 오류
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 읽거나, 없으면 기본 설정으로 새로 만든다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let mut cfg: Config = toml::from_str(&content)?;
        cfg.path = path.to_path_buf();
        Ok(cfg)
    } else {
        let cfg = Config {
            path: path.to_path_buf(),
            ..Config::default()
        };
        cfg.save()?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 로드한 경로에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
