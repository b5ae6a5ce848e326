//! # Index Core
//!
//! 지수 구성 종목 히스토리 데이터셋의 핵심 도메인 타입을 제공합니다:
//! - 구성 종목 레퍼런스 레코드
//! - 일봉 가격 데이터
//! - 심볼별 시계열 컬렉션
//! - 설명 속성이 결합된 행과 병합 테이블 스키마
//! - 로깅 인프라

pub mod domain;
pub mod logging;

pub use domain::*;
pub use logging::*;
