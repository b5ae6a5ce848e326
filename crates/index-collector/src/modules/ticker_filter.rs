//! 심볼 필터 모듈.

use index_core::ConstituentRecord;
use std::collections::HashSet;

/// 기본 제외 심볼.
///
/// 점(.)이 들어간 클래스 주식 티커는 히스토리 API의 거래소 접미사 표기와 충돌합니다.
pub const DEFAULT_EXCLUDED_SYMBOLS: [&str; 3] = ["BRK.B", "BF.B", "PPG"];

/// 기본 제외 심볼 집합
pub fn default_excluded_symbols() -> HashSet<String> {
    DEFAULT_EXCLUDED_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

/// 제외 목록에 있는 심볼을 제거합니다.
///
/// 입력 순서를 유지하며, 같은 심볼이 여러 번 나오면 첫 번째만 남깁니다.
pub fn filter(records: &[ConstituentRecord], excluded: &HashSet<String>) -> Vec<ConstituentRecord> {
    tracing::info!(
        records = records.len(),
        excluded = excluded.len(),
        "제외 심볼 필터링 시작"
    );

    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut filtered: Vec<ConstituentRecord> = Vec::with_capacity(records.len());

    for record in records {
        if excluded.contains(&record.symbol) {
            tracing::debug!(symbol = %record.symbol, "제외 심볼");
            continue;
        }
        if !seen.insert(record.symbol.as_str()) {
            tracing::warn!(symbol = %record.symbol, "중복 심볼 제거");
            continue;
        }
        filtered.push(record.clone());
    }

    tracing::info!(
        remaining = filtered.len(),
        dropped = records.len() - filtered.len(),
        "제외 심볼 필터링 완료"
    );

    filtered
}

/// 지정된 심볼만 남깁니다 (순서 유지).
pub fn retain_symbols(
    records: &[ConstituentRecord],
    symbols: &HashSet<String>,
) -> Vec<ConstituentRecord> {
    let retained: Vec<ConstituentRecord> = records
        .iter()
        .filter(|r| symbols.contains(&r.symbol))
        .cloned()
        .collect();

    let missing: Vec<&String> = symbols
        .iter()
        .filter(|s| !retained.iter().any(|r| &r.symbol == *s))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "레퍼런스 테이블에 없는 심볼 무시");
    }

    retained
}
