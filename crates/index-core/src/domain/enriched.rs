//! 설명 속성과 결합된 행.

use crate::{Column, PriceBar};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 날짜 셀 형식
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 심볼의 설명 속성 (일별 가격이 아닌 정적 메타데이터).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveAttributes {
    /// 종목명
    pub security_name: String,
    /// GICS 섹터
    pub sector: String,
    /// GICS 하위 산업
    pub sub_industry: String,
    /// 지수 편입일
    pub date_added: Option<NaiveDate>,
    /// 설립 연도
    pub founded: Option<String>,
}

/// 병합 테이블의 단위 행.
///
/// 레퍼런스 레코드가 없는 심볼의 행은 설명 필드가 모두 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub security_name: Option<String>,
    pub sector: Option<String>,
    pub sub_industry: Option<String>,
    pub date_added: Option<NaiveDate>,
    pub founded: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub dividends: f64,
    pub stock_splits: f64,
}

impl EnrichedRow {
    /// 일봉과 (있다면) 설명 속성을 결합해 행을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        attributes: Option<&DescriptiveAttributes>,
        bar: &PriceBar,
    ) -> Self {
        Self {
            date: bar.date,
            symbol: symbol.into(),
            security_name: attributes.map(|a| a.security_name.clone()),
            sector: attributes.map(|a| a.sector.clone()),
            sub_industry: attributes.map(|a| a.sub_industry.clone()),
            date_added: attributes.and_then(|a| a.date_added),
            founded: attributes.and_then(|a| a.founded.clone()),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            dividends: bar.dividends,
            stock_splits: bar.stock_splits,
        }
    }

    /// 컬럼 값을 텍스트 셀로 변환합니다.
    ///
    /// 알 수 없는 값은 빈 문자열로 표시됩니다.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Date => self.date.format(DATE_FORMAT).to_string(),
            Column::Symbol => self.symbol.clone(),
            Column::SecurityName => self.security_name.clone().unwrap_or_default(),
            Column::Sector => self.sector.clone().unwrap_or_default(),
            Column::SubIndustry => self.sub_industry.clone().unwrap_or_default(),
            Column::DateAdded => self
                .date_added
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Column::Founded => self.founded.clone().unwrap_or_default(),
            Column::Open => self.open.to_string(),
            Column::High => self.high.to_string(),
            Column::Low => self.low.to_string(),
            Column::Close => self.close.to_string(),
            Column::Volume => self.volume.to_string(),
            Column::Dividends => self.dividends.to_string(),
            Column::StockSplits => self.stock_splits.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            10.0,
            11.0,
            9.0,
            10.5,
            1000,
        )
    }

    #[test]
    fn test_row_without_attributes_has_unknown_cells() {
        let row = EnrichedRow::new("ZZZ", None, &sample_bar());

        assert_eq!(row.cell(Column::Symbol), "ZZZ");
        assert_eq!(row.cell(Column::SecurityName), "");
        assert_eq!(row.cell(Column::DateAdded), "");
        assert_eq!(row.cell(Column::Close), "10.5");
        assert_eq!(row.cell(Column::Volume), "1000");
    }

    #[test]
    fn test_row_with_attributes() {
        let attrs = DescriptiveAttributes {
            security_name: "SecA".to_string(),
            sector: "TechSector".to_string(),
            sub_industry: "SubA".to_string(),
            date_added: NaiveDate::from_ymd_opt(2000, 1, 1),
            founded: Some("1990".to_string()),
        };
        let row = EnrichedRow::new("AAA", Some(&attrs), &sample_bar());

        assert_eq!(row.cell(Column::Date), "2024-01-02");
        assert_eq!(row.cell(Column::Sector), "TechSector");
        assert_eq!(row.cell(Column::DateAdded), "2000-01-01");
        assert_eq!(row.cell(Column::Founded), "1990");
        assert_eq!(row.cell(Column::Dividends), "0");
    }
}
