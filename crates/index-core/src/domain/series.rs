//! 심볼별 시계열 컬렉션.

use crate::{DescriptiveAttributes, PriceBar};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 한 심볼의 일봉 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    /// 티커 심볼
    pub symbol: String,
    /// 날짜 오름차순 일봉
    pub bars: Vec<PriceBar>,
    /// 결합된 설명 속성 (결합 전이거나 레퍼런스에 없으면 None)
    pub attributes: Option<DescriptiveAttributes>,
}

impl SymbolSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            attributes: None,
        }
    }
}

/// 심볼 → 시계열 매핑 (삽입 순서 유지).
///
/// 키는 중복되지 않으며, 이미 있는 심볼을 다시 넣으면 기존 위치에서 교체됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesBySymbol {
    entries: Vec<SymbolSeries>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SeriesBySymbol {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시계열을 추가합니다. 같은 심볼이 있으면 교체하고 이전 값을 반환합니다.
    pub fn insert(&mut self, series: SymbolSeries) -> Option<SymbolSeries> {
        match self.position(&series.symbol) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos], series)),
            None => {
                self.index.insert(series.symbol.clone(), self.entries.len());
                self.entries.push(series);
                None
            }
        }
    }

    /// 심볼의 시계열을 조회합니다.
    pub fn get(&self, symbol: &str) -> Option<&SymbolSeries> {
        self.position(symbol).map(|pos| &self.entries[pos])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 삽입 순서대로 심볼 목록을 반환합니다.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.symbol.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymbolSeries> {
        self.entries.iter()
    }

    /// 전체 일봉 수.
    pub fn total_bars(&self) -> usize {
        self.entries.iter().map(|s| s.bars.len()).sum()
    }

    // 역직렬화 후에는 index가 비어 있으므로 선형 탐색으로 대체
    fn position(&self, symbol: &str) -> Option<usize> {
        if self.index.len() == self.entries.len() {
            self.index.get(symbol).copied()
        } else {
            self.entries.iter().position(|s| s.symbol == symbol)
        }
    }
}

impl IntoIterator for SeriesBySymbol {
    type Item = SymbolSeries;
    type IntoIter = std::vec::IntoIter<SymbolSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SeriesBySymbol {
    type Item = &'a SymbolSeries;
    type IntoIter = std::slice::Iter<'a, SymbolSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<SymbolSeries> for SeriesBySymbol {
    fn from_iter<I: IntoIterator<Item = SymbolSeries>>(iter: I) -> Self {
        let mut collection = Self::new();
        for series in iter {
            collection.insert(series);
        }
        collection
    }
}
