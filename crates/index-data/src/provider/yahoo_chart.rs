//! Yahoo Finance 일봉 히스토리 Provider.
//!
//! v8 chart API (`/v8/finance/chart/{symbol}`)에서 시작일부터 현재까지의 일봉을
//! 조회합니다. 배당/분할 이벤트(`events=div,split`)를 함께 요청해 같은 거래일의
//! 일봉에 `dividends`, `stock_splits` 값으로 결합합니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let fetcher = YahooChartFetcher::new(Duration::from_secs(30))?;
//! let bars = fetcher.fetch("AAPL", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).await?;
//! ```

use crate::provider::USER_AGENT;
use crate::{DataError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use index_core::PriceBar;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// 일봉 히스토리 Provider trait.
#[async_trait]
pub trait HistoricalSeriesFetcher: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// `start_date`(포함)부터 현재까지의 일봉을 날짜 오름차순으로 조회합니다.
    async fn fetch(&self, symbol: &str, start_date: NaiveDate) -> Result<Vec<PriceBar>>;
}

// =============================================================================
// 응답 구조
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    #[serde(default)]
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// 거래소 UTC 오프셋 (초)
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
    #[serde(default)]
    splits: HashMap<String, SplitEvent>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

// =============================================================================
// Provider
// =============================================================================

/// Yahoo Finance chart API 클라이언트.
pub struct YahooChartFetcher {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl YahooChartFetcher {
    /// 기본 API 호스트
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL, timeout)
    }

    /// API 호스트를 지정해 생성합니다 (테스트, 프록시용).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::SourceUnavailable(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }

    fn transport_error(&self, symbol: &str, err: reqwest::Error) -> DataError {
        if err.is_timeout() {
            DataError::FetchTimeout {
                symbol: symbol.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            DataError::SourceUnavailable(format!("{}: {}", symbol, err))
        }
    }
}

#[async_trait]
impl HistoricalSeriesFetcher for YahooChartFetcher {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch(&self, symbol: &str, start_date: NaiveDate) -> Result<Vec<PriceBar>> {
        let period1 = start_date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();
        let period2 = Utc::now().timestamp();

        debug!(symbol = symbol, start = %start_date, "Yahoo Finance chart API 호출");

        let response = self
            .client
            .get(self.chart_url(symbol))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,split".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(symbol, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::SourceUnavailable(format!(
                "Rate limit 초과 ({})",
                symbol
            )));
        }
        if !status.is_success() {
            return Err(DataError::SourceUnavailable(format!(
                "HTTP {} ({})",
                status, symbol
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(symbol, e))?;

        parse_chart_response(symbol, &body)
    }
}

/// chart API 응답 본문을 일봉 목록으로 변환합니다.
///
/// - 타임스탬프는 `meta.gmtoffset`을 적용해 거래소 현지 날짜로 변환
/// - OHLCV가 모두 비어 있는 행(휴장일)은 제외
/// - 결과는 날짜 오름차순, 중복 날짜 없음
/// - 데이터가 하나도 없으면 `SymbolNotFound`
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<Vec<PriceBar>> {
    let response: ChartResponse = serde_json::from_str(body)?;

    let not_found = || DataError::SymbolNotFound {
        symbol: symbol.to_string(),
    };

    let data = match response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(data) => data,
        None => {
            return Err(match response.chart.error {
                Some(err) if err.code != "Not Found" => DataError::InvalidResponse(format!(
                    "{} ({}): {}",
                    err.code, symbol, err.description
                )),
                _ => not_found(),
            });
        }
    };

    let timestamps = data.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(not_found());
    }

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::InvalidResponse(format!("quote 데이터 없음 ({})", symbol)))?;

    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let local_date = |ts: i64| DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive());

    let events = data.events.unwrap_or_default();
    let mut dividends: HashMap<NaiveDate, f64> = HashMap::new();
    for event in events.dividends.values() {
        if let Some(date) = local_date(event.date) {
            *dividends.entry(date).or_insert(0.0) += event.amount;
        }
    }
    let mut splits: HashMap<NaiveDate, f64> = HashMap::new();
    for event in events.splits.values() {
        if event.denominator != 0.0 {
            if let Some(date) = local_date(event.date) {
                splits.insert(date, event.numerator / event.denominator);
            }
        }
    }

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = local_date(ts).ok_or_else(|| {
            DataError::InvalidResponse(format!("잘못된 타임스탬프 ({}): {}", symbol, ts))
        })?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        bars.push(PriceBar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
            dividends: dividends.get(&date).copied().unwrap_or(0.0),
            stock_splits: splits.get(&date).copied().unwrap_or(0.0),
        });
    }

    let bars = PriceBar::normalize_series(bars);
    if bars.is_empty() {
        return Err(not_found());
    }

    Ok(bars)
}
