//! 일봉 가격 데이터.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 심볼 시계열의 한 행 (일봉 1개).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 거래일 (거래소 현지 기준, 시간 정보 없음)
    pub date: NaiveDate,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: u64,
    /// 배당금 (해당일 배당이 없으면 0)
    pub dividends: f64,
    /// 주식 분할 비율 (해당일 분할이 없으면 0)
    pub stock_splits: f64,
}

impl PriceBar {
    /// 배당/분할 이벤트 없는 일봉을 생성합니다.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            dividends: 0.0,
            stock_splits: 0.0,
        }
    }

    /// 시계열을 날짜 오름차순으로 정렬하고 중복 날짜를 제거합니다.
    ///
    /// 같은 날짜가 여러 번 나오면 마지막 행이 남습니다.
    pub fn normalize_series(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
        bars.sort_by_key(|b| b.date);

        let mut normalized: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match normalized.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => normalized.push(bar),
            }
        }
        normalized
    }

    /// 날짜가 엄격하게 증가하는지 확인합니다.
    pub fn is_strictly_increasing(bars: &[PriceBar]) -> bool {
        bars.windows(2).all(|w| w[0].date < w[1].date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            close,
            close,
            close,
            100,
        )
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let bars = vec![bar(3, 3.0), bar(2, 2.0), bar(3, 30.0), bar(1, 1.0)];
        let normalized = PriceBar::normalize_series(bars);

        assert_eq!(normalized.len(), 3);
        assert!(PriceBar::is_strictly_increasing(&normalized));
        // 마지막 중복 행이 남음
        assert_eq!(normalized[2].close, 30.0);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(PriceBar::normalize_series(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_strictly_increasing(days in proptest::collection::vec(1u32..=28, 0..40)) {
            let bars: Vec<PriceBar> = days.iter().map(|d| bar(*d, *d as f64)).collect();
            let normalized = PriceBar::normalize_series(bars);

            prop_assert!(PriceBar::is_strictly_increasing(&normalized));
            let unique: std::collections::BTreeSet<u32> = days.into_iter().collect();
            prop_assert_eq!(normalized.len(), unique.len());
        }
    }
}
