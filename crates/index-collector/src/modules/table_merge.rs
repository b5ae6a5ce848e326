//! 병합 모듈.

use index_core::{Column, EnrichedRow, MergedTable, SeriesBySymbol};

/// 모든 심볼의 시계열을 하나의 long-format 테이블로 이어 붙입니다.
///
/// 심볼 순서는 `series` 순서, 심볼 내 행 순서는 날짜 순서를 따릅니다.
/// 설명 속성이 없는 심볼의 행은 해당 셀이 "알 수 없음"으로 채워지며 컬럼 위치는
/// 항상 `schema`로 고정됩니다.
pub fn merge(series: SeriesBySymbol, schema: &[Column]) -> MergedTable {
    tracing::info!(symbols = series.len(), "전체 종목 데이터 병합 시작");

    let mut table = MergedTable::empty(schema);
    table.rows.reserve(series.total_bars());

    for s in series {
        let attributes = s.attributes.as_ref();
        table.rows.extend(
            s.bars
                .iter()
                .map(|bar| EnrichedRow::new(s.symbol.as_str(), attributes, bar)),
        );
    }

    tracing::info!(
        rows = table.len(),
        columns = table.schema.len(),
        "전체 종목 데이터 병합 완료"
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use index_core::{ConstituentRecord, PriceBar, SymbolSeries};
    use proptest::prelude::*;

    fn bars(count: u32) -> Vec<PriceBar> {
        (0..count)
            .map(|i| {
                PriceBar::new(
                    NaiveDate::from_ymd_opt(2024, 1, 2 + i).unwrap(),
                    10.0 + i as f64,
                    11.0,
                    9.0,
                    10.5,
                    1000,
                )
            })
            .collect()
    }

    #[test]
    fn test_merge_empty_keeps_schema() {
        let table = merge(SeriesBySymbol::new(), &Column::SCHEMA);

        assert!(table.is_empty());
        assert_eq!(table.schema, Column::SCHEMA.to_vec());
    }

    #[test]
    fn test_merge_orders_by_symbol_then_date() {
        let input: SeriesBySymbol = vec![
            SymbolSeries::new("MSFT", bars(2)),
            SymbolSeries::new("AAPL", bars(3)),
        ]
        .into_iter()
        .collect();

        let table = merge(input, &Column::SCHEMA);

        let keys: Vec<(String, NaiveDate)> =
            table.rows.iter().map(|r| (r.symbol.clone(), r.date)).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0].0, "MSFT");
        assert_eq!(keys[1].0, "MSFT");
        assert_eq!(keys[2].0, "AAPL");
        assert!(keys[2].1 < keys[3].1 && keys[3].1 < keys[4].1);
        assert_eq!(table.symbol_count(), 2);
    }

    #[test]
    fn test_unjoined_symbol_has_unknown_cells_in_place() {
        let mut joined = SymbolSeries::new("AAA", bars(1));
        joined.attributes = Some(
            ConstituentRecord::new("AAA", "SecA", "TechSector", "SubA")
                .with_founded("1990")
                .attributes(),
        );
        let input: SeriesBySymbol = vec![joined, SymbolSeries::new("ZZZ", bars(1))]
            .into_iter()
            .collect();

        let table = merge(input, &Column::SCHEMA);

        let known = table.record(&table.rows[0]);
        let unknown = table.record(&table.rows[1]);
        assert_eq!(known.len(), Column::SCHEMA.len());
        assert_eq!(unknown.len(), Column::SCHEMA.len());
        assert_eq!(known[2], "SecA");
        assert_eq!(unknown[1], "ZZZ");
        assert_eq!(unknown[2], "");
        assert_eq!(unknown[6], "");
        // 가격 컬럼은 같은 위치
        assert_eq!(unknown[7], known[7]);
    }

    proptest! {
        #[test]
        fn prop_merge_row_count_and_width(counts in proptest::collection::vec(0u32..5, 0..8)) {
            let input: SeriesBySymbol = counts
                .iter()
                .enumerate()
                .map(|(i, n)| SymbolSeries::new(format!("S{}", i), bars(*n)))
                .collect();

            let table = merge(input, &Column::SCHEMA);

            prop_assert_eq!(table.len() as u32, counts.iter().sum::<u32>());
            prop_assert_eq!(table.header().len(), Column::SCHEMA.len());
            for row in &table.rows {
                prop_assert_eq!(table.record(row).len(), Column::SCHEMA.len());
            }
        }
    }
}
