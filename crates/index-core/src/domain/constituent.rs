//! 지수 구성 종목 레퍼런스 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 레퍼런스 테이블의 한 행 (지수 구성 종목 1개).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituentRecord {
    /// 티커 심볼 (예: AAPL, BRK.B)
    pub symbol: String,
    /// 종목명 (예: Apple Inc.)
    pub security_name: String,
    /// GICS 섹터
    pub sector: String,
    /// GICS 하위 산업
    pub sub_industry: String,
    /// 지수 편입일 (알 수 없으면 None)
    pub date_added: Option<NaiveDate>,
    /// 설립 연도 또는 자유 형식 텍스트 (예: "1902", "2013 (1888)")
    pub founded: Option<String>,
}

impl ConstituentRecord {
    /// 필수 필드로 새 레코드를 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        security_name: impl Into<String>,
        sector: impl Into<String>,
        sub_industry: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            security_name: security_name.into(),
            sector: sector.into(),
            sub_industry: sub_industry.into(),
            date_added: None,
            founded: None,
        }
    }

    /// 편입일을 설정합니다.
    pub fn with_date_added(mut self, date_added: NaiveDate) -> Self {
        self.date_added = Some(date_added);
        self
    }

    /// 설립 연도를 설정합니다.
    pub fn with_founded(mut self, founded: impl Into<String>) -> Self {
        self.founded = Some(founded.into());
        self
    }

    /// 시계열에 결합할 설명 속성을 추출합니다.
    pub fn attributes(&self) -> crate::DescriptiveAttributes {
        crate::DescriptiveAttributes {
            security_name: self.security_name.clone(),
            sector: self.sector.clone(),
            sub_industry: self.sub_industry.clone(),
            date_added: self.date_added,
            founded: self.founded.clone(),
        }
    }
}

/// 레코드 목록에서 심볼 목록을 순서대로 추출합니다.
pub fn tickers(records: &[ConstituentRecord]) -> Vec<String> {
    records.iter().map(|r| r.symbol.clone()).collect()
}
