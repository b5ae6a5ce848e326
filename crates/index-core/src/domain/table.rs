//! 병합 테이블과 고정 컬럼 스키마.

use crate::EnrichedRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 병합 테이블 컬럼.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Date,
    Symbol,
    SecurityName,
    Sector,
    SubIndustry,
    DateAdded,
    Founded,
    Open,
    High,
    Low,
    Close,
    Volume,
    Dividends,
    StockSplits,
}

impl Column {
    /// 기본 스키마 (컬럼 순서 고정)
    pub const SCHEMA: [Column; 14] = [
        Column::Date,
        Column::Symbol,
        Column::SecurityName,
        Column::Sector,
        Column::SubIndustry,
        Column::DateAdded,
        Column::Founded,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::Dividends,
        Column::StockSplits,
    ];

    /// 헤더 이름.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Symbol => "symbol",
            Self::SecurityName => "security_name",
            Self::Sector => "sector",
            Self::SubIndustry => "sub_industry",
            Self::DateAdded => "date_added",
            Self::Founded => "founded",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Dividends => "dividends",
            Self::StockSplits => "stock_splits",
        }
    }

    /// 헤더 이름에서 컬럼을 찾습니다.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::SCHEMA.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 모든 심볼의 행을 이어 붙인 long-format 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTable {
    /// 컬럼 스키마 (출력 순서)
    pub schema: Vec<Column>,
    /// 행 (심볼 처리 순서, 심볼 내 날짜 순서)
    pub rows: Vec<EnrichedRow>,
}

impl MergedTable {
    /// 행이 없는 테이블을 생성합니다.
    pub fn empty(schema: &[Column]) -> Self {
        Self {
            schema: schema.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 헤더 이름 목록.
    pub fn header(&self) -> Vec<&'static str> {
        self.schema.iter().map(Column::name).collect()
    }

    /// 행을 스키마 순서의 셀 목록으로 변환합니다.
    pub fn record(&self, row: &EnrichedRow) -> Vec<String> {
        self.schema.iter().map(|c| row.cell(*c)).collect()
    }

    /// 테이블에 포함된 심볼 수 (연속된 같은 심볼은 하나로 계산).
    pub fn symbol_count(&self) -> usize {
        let mut count = 0;
        let mut previous: Option<&str> = None;
        for row in &self.rows {
            if previous != Some(row.symbol.as_str()) {
                count += 1;
                previous = Some(row.symbol.as_str());
            }
        }
        count
    }
}

impl Default for MergedTable {
    fn default() -> Self {
        Self::empty(&Column::SCHEMA)
    }
}
