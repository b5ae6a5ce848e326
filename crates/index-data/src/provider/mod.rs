//! 데이터 Provider 모듈.
//!
//! ## 레퍼런스 테이블
//! - `ReferenceTableSource`: 구성 종목 목록 + 설명 속성 조회 trait
//! - `WikipediaReferenceTable`: Wikipedia 페이지의 첫 번째 테이블 파싱
//!
//! ## 일봉 히스토리
//! - `HistoricalSeriesFetcher`: 심볼별 일봉 조회 trait
//! - `YahooChartFetcher`: Yahoo Finance v8 chart API (배당/분할 이벤트 포함)

pub mod reference_table;
pub mod yahoo_chart;

pub use reference_table::{
    parse_constituent_table, ReferenceTableSource, WikipediaReferenceTable, DEFAULT_REFERENCE_URL,
};
pub use yahoo_chart::{parse_chart_response, HistoricalSeriesFetcher, YahooChartFetcher};

/// 브라우저 User-Agent (Wikipedia, Yahoo 모두 기본 UA를 차단하는 경우가 있음)
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
