//! 지수 구성 종목 히스토리 데이터셋 수집기.
//!
//! 이 crate는 하나의 병합 데이터셋을 만드는 배치 파이프라인을 제공합니다:
//! - 구성 종목 레퍼런스 테이블 조회 및 심볼 필터링
//! - 심볼별 일봉 수집 (동시 요청 수 제한, 타임아웃)
//! - 설명 속성 결합 및 long-format 병합
//! - CSV 저장

pub mod config;
pub mod error;
pub mod modules;
pub mod pipeline;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use pipeline::{Pipeline, PipelineOutput, PipelineReport};
pub use stats::CollectionStats;
