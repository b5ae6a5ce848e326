//! Index constituent history collector CLI.

use clap::Parser;
use index_collector::config::{parse_start_date, parse_symbol_list};
use index_collector::{CollectorConfig, Pipeline};
use index_core::{init_logging, LogConfig, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "index-collector")]
#[command(about = "Index constituent daily history dataset builder", long_about = None)]
#[command(version)]
struct Cli {
    /// 저장 경로 (기본: OUTPUT_PATH 또는 constituents_history.csv)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// 수집 시작일 (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// 특정 심볼만 수집 (쉼표로 구분, 예: "AAPL,MSFT")
    #[arg(long)]
    symbols: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 포맷 (pretty, json, compact)
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(&LogConfig::new(&cli.log_level).with_format(cli.log_format))?;

    tracing::info!("Index Collector 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env()?;
    if let Some(output) = cli.output {
        config.export.output_path = output;
    }
    if let Some(start_date) = cli.start_date.as_deref() {
        config.history.start_date = parse_start_date(start_date)?;
    }
    if let Some(symbols) = cli.symbols.as_deref() {
        config.filter.only_symbols = Some(parse_symbol_list(symbols));
    }
    tracing::debug!(
        reference_url = %config.reference.url,
        start_date = %config.history.start_date,
        output = %config.export.output_path.display(),
        "설정 로드 완료"
    );

    let pipeline = Pipeline::from_config(config)?;
    let report = pipeline.run().await?;

    report.stats.log_summary("데이터셋 구성");
    for failure in &report.failures {
        tracing::warn!(symbol = %failure.symbol, error = %failure.error, "제외된 심볼");
    }

    tracing::info!("Index Collector 종료");

    Ok(())
}
