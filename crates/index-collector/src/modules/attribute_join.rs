//! 설명 속성 결합 모듈.

use index_core::{ConstituentRecord, SeriesBySymbol};
use std::collections::HashMap;

/// 각 심볼의 시계열에 레퍼런스 레코드의 설명 속성을 붙입니다.
///
/// - 레퍼런스에 있지만 시계열이 없는 심볼 (수집 실패, 필터 제외)은 조용히 건너뜀
/// - 시계열은 있지만 레퍼런스에 없는 심볼은 기존 속성을 그대로 유지 (보통 None)
/// - 같은 레퍼런스로 다시 결합해도 결과가 바뀌지 않음
pub fn join(series: SeriesBySymbol, constituents: &[ConstituentRecord]) -> SeriesBySymbol {
    tracing::info!(
        series = series.len(),
        constituents = constituents.len(),
        "설명 속성 결합 시작"
    );

    let mut lookup: HashMap<&str, &ConstituentRecord> = HashMap::with_capacity(constituents.len());
    for record in constituents {
        lookup.entry(record.symbol.as_str()).or_insert(record);
    }

    let mut matched = 0usize;
    let mut unmatched = 0usize;

    let joined: SeriesBySymbol = series
        .into_iter()
        .map(|mut s| {
            match lookup.get(s.symbol.as_str()) {
                Some(record) => {
                    s.attributes = Some(record.attributes());
                    matched += 1;
                }
                None => {
                    unmatched += 1;
                    tracing::warn!(symbol = %s.symbol, "레퍼런스 레코드 없음, 설명 속성 없이 유지");
                }
            }
            s
        })
        .collect();

    let without_series = constituents
        .iter()
        .filter(|r| !joined.contains(&r.symbol))
        .count();

    tracing::info!(matched, unmatched, without_series, "설명 속성 결합 완료");

    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use index_core::{PriceBar, SymbolSeries};

    fn series(symbol: &str) -> SymbolSeries {
        SymbolSeries::new(
            symbol,
            vec![PriceBar::new(
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                10.0,
                11.0,
                9.0,
                10.5,
                1000,
            )],
        )
    }

    fn constituents() -> Vec<ConstituentRecord> {
        vec![
            ConstituentRecord::new("AAA", "SecA", "TechSector", "SubA")
                .with_date_added(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
                .with_founded("1990"),
            ConstituentRecord::new("BBB", "SecB", "HealthSector", "SubB")
                .with_date_added(NaiveDate::from_ymd_opt(2005, 6, 1).unwrap())
                .with_founded("1985"),
        ]
    }

    #[test]
    fn test_join_attaches_matching_record() {
        let input: SeriesBySymbol = vec![series("AAA")].into_iter().collect();
        let joined = join(input, &constituents());

        let attrs = joined.get("AAA").and_then(|s| s.attributes.clone()).unwrap();
        assert_eq!(attrs.security_name, "SecA");
        assert_eq!(attrs.sector, "TechSector");
        assert_eq!(attrs.founded.as_deref(), Some("1990"));
        // BBB는 시계열이 없으므로 추가되지 않음
        assert!(!joined.contains("BBB"));
    }

    #[test]
    fn test_symbol_missing_from_reference_is_kept_without_attributes() {
        let input: SeriesBySymbol = vec![series("AAA"), series("ZZZ")].into_iter().collect();
        let joined = join(input, &constituents());

        assert_eq!(joined.symbols(), vec!["AAA", "ZZZ"]);
        assert!(joined.get("ZZZ").unwrap().attributes.is_none());
        assert_eq!(joined.get("ZZZ").unwrap().bars.len(), 1);
    }

    #[test]
    fn test_join_is_idempotent() {
        let input: SeriesBySymbol = vec![series("AAA"), series("ZZZ")].into_iter().collect();
        let once = join(input, &constituents());
        let twice = join(once.clone(), &constituents());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_join_with_empty_inputs() {
        assert!(join(SeriesBySymbol::new(), &constituents()).is_empty());

        let input: SeriesBySymbol = vec![series("AAA")].into_iter().collect();
        let joined = join(input, &[]);
        assert!(joined.get("AAA").unwrap().attributes.is_none());
    }
}
