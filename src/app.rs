use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ConfigError, DEFAULT_CONFIG_FILE};
use crate::design::{flash_chamber, siphon, suction};
use crate::error::CalcError;
use crate::piping::catalog::{CatalogError, PipeCatalogCache};
use crate::piping::pressure_drop;
use crate::properties::SteamSeawater;
use crate::thermal::{
    desuperheat, dosing, heat_duty, lmtd, ncg, npsha, pump, vapour_compression,
};
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// 설정 저장/로드 오류
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// 입력 TOML 해석 오류
    #[error("cannot parse input {path}: {source}")]
    Input {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// 결과 TOML 직렬화 오류
    #[error("cannot serialize result: {0}")]
    Output(#[from] toml::ser::Error),
    /// 계산 오류
    #[error(transparent)]
    Calc(#[from] CalcError),
    /// 배관 카탈로그 오류
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Parser)]
#[command(name = "desal_design_toolbox")]
#[command(about = "Thermal desalination design calculations", long_about = None)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// 출력 형식
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Flash chamber heat/mass balance and sizing
    FlashChamber { input: PathBuf },
    /// Inter-effect siphon sizing
    Siphon { input: PathBuf },
    /// Pump suction system design
    Suction { input: PathBuf },
    /// Mechanical vapour compressor
    Mvc { input: PathBuf },
    /// Thermo vapour compressor (ejector)
    Tvc { input: PathBuf },
    /// Pump head and motor sizing
    Pump { input: PathBuf },
    /// Net positive suction head available
    Npsha { input: PathBuf },
    /// Log mean temperature difference
    Lmtd { input: PathBuf },
    /// Pipe pressure drop
    PressureDrop { input: PathBuf },
    /// Spray desuperheater
    Desuperheat { input: PathBuf },
    /// Chemical dosing
    Dosing { input: PathBuf },
    /// Non-condensable gas / vapour mixture
    Ncg { input: PathBuf },
    /// Sensible or latent heat duty
    HeatDuty { input: PathBuf },
    /// List the configured pipe schedule
    Pipes,
}

fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| AppError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn render<T: Serialize>(
    format: OutputFormat,
    result: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(text(result)),
        OutputFormat::Toml => Ok(toml::to_string_pretty(result)?),
    }
}

/// 명령 하나를 실행하고 출력할 문자열을 돌려준다.
pub fn run(cli: &Cli, config: &Config) -> Result<String, AppError> {
    let props = SteamSeawater;
    let cache = PipeCatalogCache::default();
    let catalog = cache.get(&config.pipe_schedule)?;
    let unit = config.display_pressure_unit;
    let fmt = cli.format;
    debug!(command = ?cli.command, schedule = %config.pipe_schedule, "dispatch");

    let output = match &cli.command {
        Command::FlashChamber { input } => {
            let input: flash_chamber::FlashChamberInput = read_input(input)?;
            let result = flash_chamber::calculate_flash_chamber(&input, &props, &catalog)?;
            render(fmt, &result, |r| ui_cli::flash_chamber(r, unit))?
        }
        Command::Siphon { input } => {
            let input: siphon::SiphonInput = read_input(input)?;
            let result = siphon::calculate_siphon(&input, &props, &catalog)?;
            render(fmt, &result, |r| ui_cli::siphon(r, unit))?
        }
        Command::Suction { input } => {
            let input: suction::SuctionInput = read_input(input)?;
            let result = suction::calculate_suction(&input, &props, &catalog)?;
            render(fmt, &result, |r| ui_cli::suction(r, unit))?
        }
        Command::Mvc { input } => {
            let input: vapour_compression::MvcInput = read_input(input)?;
            let result = vapour_compression::calculate_mvc(&input, &props)?;
            render(fmt, &result, ui_cli::mvc)?
        }
        Command::Tvc { input } => {
            let input: vapour_compression::TvcInput = read_input(input)?;
            let result = vapour_compression::calculate_tvc(&input, &props)?;
            render(fmt, &result, ui_cli::tvc)?
        }
        Command::Pump { input } => {
            let input: pump::PumpInput = read_input(input)?;
            let result = pump::calculate_pump(&input)?;
            render(fmt, &result, ui_cli::pump)?
        }
        Command::Npsha { input } => {
            let input: npsha::NpshaInput = read_input(input)?;
            let result = npsha::calculate_npsha(&input, &props)?;
            render(fmt, &result, |r| ui_cli::npsha(r, unit))?
        }
        Command::Lmtd { input } => {
            let input: lmtd::LmtdInput = read_input(input)?;
            let result = lmtd::calculate_lmtd(&input);
            render(fmt, &result, ui_cli::lmtd)?
        }
        Command::PressureDrop { input } => {
            let input: pressure_drop::PressureDropInput = read_input(input)?;
            let result = pressure_drop::calculate_pressure_drop(&input)?;
            render(fmt, &result, |r| ui_cli::pressure_drop(r, unit))?
        }
        Command::Desuperheat { input } => {
            let input: desuperheat::DesuperheatInput = read_input(input)?;
            let result = desuperheat::calculate_desuperheat(&input, &props)?;
            render(fmt, &result, ui_cli::desuperheat)?
        }
        Command::Dosing { input } => {
            let input: dosing::DosingInput = read_input(input)?;
            let result = dosing::calculate_dosing(&input)?;
            render(fmt, &result, ui_cli::dosing)?
        }
        Command::Ncg { input } => {
            let input: ncg::NcgInput = read_input(input)?;
            let result = ncg::calculate_ncg(&input, &props)?;
            render(fmt, &result, |r| ui_cli::ncg(r, unit))?
        }
        Command::HeatDuty { input } => {
            let input: heat_duty::HeatDutyInput = read_input(input)?;
            let result = heat_duty::calculate_heat_duty(&input, &props)?;
            render(fmt, &result, ui_cli::heat_duty)?
        }
        Command::Pipes => render(fmt, catalog.as_ref(), ui_cli::pipe_catalog)?,
    };
    info!(schedule = %config.pipe_schedule, "calculation finished");
    Ok(output)
}
