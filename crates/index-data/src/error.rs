//! 데이터 소스 오류 타입.

use thiserror::Error;

/// 데이터 소스 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 소스에 접근할 수 없음 (네트워크, HTTP 상태)
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// 레퍼런스 테이블 구조 오류 (테이블 없음, 필수 컬럼 누락)
    #[error("Malformed source: {0}")]
    MalformedSource(String),

    /// 심볼에 대한 데이터 없음
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    /// 요청 타임아웃
    #[error("Fetch timeout: {symbol} ({timeout_ms}ms)")]
    FetchTimeout { symbol: String, timeout_ms: u64 },

    /// 응답 본문 해석 실패
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DataError {
    /// 재시도할 가치가 있는 일시적 오류인지 확인합니다.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DataError::FetchTimeout { .. } | DataError::SourceUnavailable(_)
        )
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::SourceUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::InvalidResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
