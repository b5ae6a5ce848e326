//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::modules::ticker_filter::DEFAULT_EXCLUDED_SYMBOLS;
use crate::Result;
use chrono::NaiveDate;
use index_data::provider::DEFAULT_REFERENCE_URL;
use index_data::YahooChartFetcher;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// 기본 수집 시작일
pub const DEFAULT_START_DATE: &str = "2024-01-01";

/// 기본 저장 경로
pub const DEFAULT_OUTPUT_PATH: &str = "constituents_history.csv";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 레퍼런스 테이블 설정
    pub reference: ReferenceConfig,
    /// 심볼 필터 설정
    pub filter: FilterConfig,
    /// 일봉 수집 설정
    pub history: HistoryConfig,
    /// 결과 저장 설정
    pub export: ExportConfig,
}

/// 레퍼런스 테이블 설정
#[derive(Debug, Clone)]
pub struct ReferenceConfig {
    /// 구성 종목 페이지 URL
    pub url: String,
}

/// 심볼 필터 설정
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// 수집에서 제외할 심볼 (데이터 소스와 표기가 다른 클래스 주식 등)
    pub excluded_symbols: HashSet<String>,
    /// 지정 시 이 심볼들만 수집
    pub only_symbols: Option<HashSet<String>>,
}

/// 일봉 수집 설정
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// 수집 시작일 (포함)
    pub start_date: NaiveDate,
    /// 히스토리 API 호스트
    pub base_url: String,
    /// 요청당 타임아웃 (밀리초)
    pub timeout_ms: u64,
    /// 동시 요청 수 상한
    pub concurrency: usize,
    /// 일시적 오류 재시도 횟수
    pub max_retries: u32,
    /// 심볼 요청 후 딜레이 (밀리초)
    pub request_delay_ms: u64,
}

/// 결과 저장 설정
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// CSV 저장 경로
    pub output_path: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceConfig {
                url: DEFAULT_REFERENCE_URL.to_string(),
            },
            filter: FilterConfig {
                excluded_symbols: DEFAULT_EXCLUDED_SYMBOLS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                only_symbols: None,
            },
            history: HistoryConfig {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
                base_url: YahooChartFetcher::DEFAULT_BASE_URL.to_string(),
                timeout_ms: 30_000,
                concurrency: 4,
                max_retries: 0,
                request_delay_ms: 0,
            },
            export: ExportConfig {
                output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            },
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let start_date = match std::env::var("HISTORY_START_DATE") {
            Ok(value) => parse_start_date(&value)?,
            Err(_) => defaults.history.start_date,
        };

        let excluded_symbols = std::env::var("EXCLUDED_SYMBOLS")
            .map(|v| parse_symbol_list(&v))
            .unwrap_or(defaults.filter.excluded_symbols);

        Ok(Self {
            reference: ReferenceConfig {
                url: std::env::var("REFERENCE_TABLE_URL").unwrap_or(defaults.reference.url),
            },
            filter: FilterConfig {
                excluded_symbols,
                only_symbols: std::env::var("SYMBOLS").ok().map(|v| parse_symbol_list(&v)),
            },
            history: HistoryConfig {
                start_date,
                base_url: std::env::var("HISTORY_BASE_URL").unwrap_or(defaults.history.base_url),
                timeout_ms: env_var_parse("FETCH_TIMEOUT_MS", defaults.history.timeout_ms),
                concurrency: env_var_parse("FETCH_CONCURRENCY", defaults.history.concurrency)
                    .max(1),
                max_retries: env_var_parse("FETCH_MAX_RETRIES", defaults.history.max_retries),
                request_delay_ms: env_var_parse(
                    "REQUEST_DELAY_MS",
                    defaults.history.request_delay_ms,
                ),
            },
            export: ExportConfig {
                output_path: std::env::var("OUTPUT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.export.output_path),
            },
        })
    }
}

impl HistoryConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 요청 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 시작일 파싱 (YYYY-MM-DD)
pub fn parse_start_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        CollectorError::Config(format!("잘못된 시작일 '{}' (YYYY-MM-DD): {}", value, e))
    })
}

/// 쉼표로 구분된 심볼 목록 파싱
pub fn parse_symbol_list(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
