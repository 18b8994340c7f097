use std::process::ExitCode;

use clap::Parser;
use desal_design_toolbox::app::{self, Cli};
use desal_design_toolbox::config;
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 요청된 계산을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_or_default(&cli.config)?;
    init_tracing(&cfg.log_filter);
    let output = app::run(cli, &cfg)?;
    println!("{output}");
    Ok(())
}

/// `RUST_LOG`가 있으면 우선하고, 없으면 설정 파일의 필터를 쓴다. 로그는 stderr로 보낸다.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
