//! 외부 데이터 소스.
//!
//! 이 crate는 다음을 제공합니다:
//! - 지수 구성 종목 레퍼런스 테이블 (Wikipedia HTML 크롤링)
//! - 심볼별 일봉 히스토리 (Yahoo Finance chart API)
//! - 데이터 소스 오류 분류

pub mod error;
pub mod provider;

pub use error::{DataError, Result};

pub use provider::{
    HistoricalSeriesFetcher, ReferenceTableSource, WikipediaReferenceTable, YahooChartFetcher,
};
