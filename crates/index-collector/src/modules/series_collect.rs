//! 일봉 수집 모듈.
//!
//! 심볼마다 `HistoricalSeriesFetcher`를 독립적으로 호출합니다. 한 심볼의 실패는
//! 기록만 하고 결과에서 제외하며, 전체 수집을 중단하지 않습니다.
//!
//! 동시 요청 수는 `CollectOptions::concurrency`로 제한되고, 결과는 완료 순서가
//! 아니라 입력 심볼 순서로 모입니다.

use crate::config::HistoryConfig;
use crate::CollectionStats;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use index_core::{PriceBar, SeriesBySymbol, SymbolSeries};
use index_data::{DataError, HistoricalSeriesFetcher};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 수집 옵션
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// 동시 요청 수 상한 (최소 1)
    pub concurrency: usize,
    /// 요청당 타임아웃
    pub timeout: Duration,
    /// 일시적 오류 재시도 횟수
    pub max_retries: u32,
    /// 요청 후 딜레이
    pub request_delay: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(30),
            max_retries: 0,
            request_delay: Duration::ZERO,
        }
    }
}

impl From<&HistoryConfig> for CollectOptions {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            request_delay: config.request_delay(),
        }
    }
}

/// 수집 실패 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub symbol: String,
    pub error: String,
}

/// 수집 결과
#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    /// 데이터가 있는 심볼의 시계열 (입력 순서)
    pub series: SeriesBySymbol,
    pub stats: CollectionStats,
    /// 실패로 제외된 심볼
    pub failures: Vec<FetchFailure>,
}

/// 심볼 목록 일봉 수집기
pub struct SeriesCollector {
    fetcher: Arc<dyn HistoricalSeriesFetcher>,
    options: CollectOptions,
}

impl SeriesCollector {
    pub fn new(fetcher: Arc<dyn HistoricalSeriesFetcher>, options: CollectOptions) -> Self {
        Self { fetcher, options }
    }

    /// 모든 심볼의 일봉을 수집합니다.
    pub async fn collect(&self, symbols: &[String], start_date: NaiveDate) -> CollectionOutcome {
        let start = Instant::now();
        let mut stats = CollectionStats::new();
        let total = symbols.len();
        let concurrency = self.options.concurrency.max(1);

        tracing::info!(
            provider = self.fetcher.name(),
            symbols = total,
            start_date = %start_date,
            concurrency,
            "일봉 수집 시작"
        );

        let results: Vec<(String, Result<Vec<PriceBar>, DataError>)> =
            stream::iter(symbols.iter().enumerate())
                .map(|(idx, symbol)| async move {
                    tracing::debug!(
                        symbol = %symbol,
                        progress = format!("{}/{}", idx + 1, total),
                        "수집 시작"
                    );
                    let result = self.fetch_with_retry(symbol, start_date).await;
                    (symbol.clone(), result)
                })
                .buffered(concurrency)
                .collect()
                .await;

        let mut series = SeriesBySymbol::new();
        let mut failures = Vec::new();

        for (symbol, result) in results {
            stats.total += 1;

            match result {
                Ok(bars) => {
                    let bars = PriceBar::normalize_series(bars);
                    if bars.is_empty() {
                        stats.empty += 1;
                        tracing::debug!(symbol = %symbol, "데이터 없음");
                        continue;
                    }

                    stats.success += 1;
                    stats.total_bars += bars.len();
                    tracing::info!(symbol = %symbol, bars = bars.len(), "수집 완료");
                    series.insert(SymbolSeries::new(symbol, bars));
                }
                Err(e) => {
                    stats.errors += 1;
                    tracing::warn!(symbol = %symbol, error = %e, "수집 실패, 심볼 제외");
                    failures.push(FetchFailure {
                        symbol,
                        error: e.to_string(),
                    });
                }
            }
        }

        stats.elapsed = start.elapsed();

        tracing::info!(
            collected = series.len(),
            failed = failures.len(),
            "일봉 수집 종료"
        );

        CollectionOutcome {
            series,
            stats,
            failures,
        }
    }

    /// 타임아웃과 재시도를 적용한 단일 심볼 조회.
    ///
    /// 재시도는 이전 결과를 버리고 새로 받으므로 행이 중복되지 않습니다.
    async fn fetch_with_retry(
        &self,
        symbol: &str,
        start_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let mut attempt = 0;

        loop {
            let result =
                match tokio::time::timeout(self.options.timeout, self.fetcher.fetch(symbol, start_date))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(DataError::FetchTimeout {
                        symbol: symbol.to_string(),
                        timeout_ms: self.options.timeout.as_millis() as u64,
                    }),
                };

            // Rate limiting
            if !self.options.request_delay.is_zero() {
                tokio::time::sleep(self.options.request_delay).await;
            }

            match result {
                Err(e) if e.is_transient() && attempt < self.options.max_retries => {
                    attempt += 1;
                    tracing::warn!(symbol = symbol, attempt, error = %e, "일시적 오류, 재시도");
                }
                other => return other,
            }
        }
    }
}
