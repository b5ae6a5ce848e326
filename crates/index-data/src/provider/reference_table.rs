//! 지수 구성 종목 레퍼런스 테이블.
//!
//! Wikipedia 구성 종목 페이지의 첫 번째 테이블에서 종목 목록과 설명 속성
//! (GICS 섹터, 하위 산업, 편입일, 설립 연도)을 수집합니다.
//!
//! ## 컬럼 매핑
//! | 헤더 | 필드 |
//! |------|------|
//! | Symbol | `symbol` |
//! | Security | `security_name` |
//! | GICS Sector | `sector` |
//! | GICS Sub-Industry | `sub_industry` |
//! | Date added | `date_added` |
//! | Founded | `founded` |
//!
//! 나머지 컬럼 (Headquarters Location, CIK 등)은 이 단계에서 버립니다.

use crate::provider::USER_AGENT;
use crate::{DataError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use index_core::ConstituentRecord;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

/// S&P 500 구성 종목 페이지
pub const DEFAULT_REFERENCE_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// 레퍼런스 테이블 Provider trait.
#[async_trait]
pub trait ReferenceTableSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 위치(URL)에서 구성 종목 목록을 조회합니다.
    async fn fetch(&self, url: &str) -> Result<Vec<ConstituentRecord>>;
}

/// Wikipedia 레퍼런스 테이블 크롤러.
pub struct WikipediaReferenceTable {
    client: Client,
}

impl WikipediaReferenceTable {
    /// 요청 타임아웃을 지정해 생성합니다.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::SourceUnavailable(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ReferenceTableSource for WikipediaReferenceTable {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<ConstituentRecord>> {
        info!(url = url, "레퍼런스 테이블 조회 시작");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::SourceUnavailable(format!("HTTP {} ({})", status, url)));
        }

        let html = response.text().await?;
        let records = parse_constituent_table(&html)?;

        info!(count = records.len(), "레퍼런스 테이블 조회 완료");
        Ok(records)
    }
}

/// 필수 컬럼 위치
struct ColumnIndex {
    symbol: usize,
    security: usize,
    sector: usize,
    sub_industry: usize,
    date_added: usize,
    founded: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |aliases: &[&str]| -> Result<usize> {
            header
                .iter()
                .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
                .ok_or_else(|| {
                    DataError::MalformedSource(format!(
                        "필수 컬럼 누락: {} (헤더: {:?})",
                        aliases[0], header
                    ))
                })
        };

        Ok(Self {
            symbol: find(&["Symbol", "Ticker symbol", "Ticker"])?,
            security: find(&["Security", "Company"])?,
            sector: find(&["GICS Sector"])?,
            sub_industry: find(&["GICS Sub-Industry", "GICS Sub Industry"])?,
            date_added: find(&["Date added", "Date first added"])?,
            founded: find(&["Founded"])?,
        })
    }

    fn max(&self) -> usize {
        [
            self.symbol,
            self.security,
            self.sector,
            self.sub_industry,
            self.date_added,
            self.founded,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// HTML 문서의 첫 번째 테이블을 구성 종목 레코드로 변환합니다.
///
/// 헤더 행(`th`만 있는 행)이 있는 첫 테이블을 사용하며, 그 테이블에 필수 컬럼이
/// 없으면 `MalformedSource`를 반환합니다.
pub fn parse_constituent_table(html: &str) -> Result<Vec<ConstituentRecord>> {
    let document = Html::parse_document(html);

    let table_selector = selector("table")?;
    let tr_selector = selector("tr")?;
    let cell_selector = selector("th, td")?;

    let (table, header) = document
        .select(&table_selector)
        .find_map(|table| {
            table
                .select(&tr_selector)
                .find(|tr| is_header_row(tr))
                .map(|tr| (table, cell_texts(&tr, &cell_selector)))
        })
        .ok_or_else(|| DataError::MalformedSource("헤더가 있는 테이블을 찾을 수 없음".to_string()))?;

    let columns = ColumnIndex::from_header(&header)?;
    debug!(header = ?header, "레퍼런스 테이블 헤더");

    let mut records = Vec::new();

    for tr in table.select(&tr_selector).filter(|tr| !is_header_row(tr)) {
        let cells = cell_texts(&tr, &cell_selector);
        if cells.is_empty() {
            continue;
        }
        if cells.len() <= columns.max() {
            warn!(cells = ?cells, "컬럼 수 부족, 행 건너뛰기");
            continue;
        }

        let symbol = cells[columns.symbol].clone();
        if symbol.is_empty() {
            warn!(cells = ?cells, "심볼 없는 행 건너뛰기");
            continue;
        }

        records.push(ConstituentRecord {
            symbol,
            security_name: cells[columns.security].clone(),
            sector: cells[columns.sector].clone(),
            sub_industry: cells[columns.sub_industry].clone(),
            date_added: parse_date_added(&cells[columns.date_added]),
            founded: non_empty(&cells[columns.founded]),
        });
    }

    Ok(records)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DataError::MalformedSource(format!("셀렉터 오류 ({}): {}", css, e)))
}

fn is_header_row(tr: &ElementRef) -> bool {
    let mut children = tr.children().filter_map(ElementRef::wrap).peekable();
    children.peek().is_some() && children.all(|c| c.value().name() == "th")
}

fn cell_texts(tr: &ElementRef, cell_selector: &Selector) -> Vec<String> {
    tr.select(cell_selector)
        .map(|cell| clean_cell(&cell.text().collect::<String>()))
        .collect()
}

/// 공백을 정리하고 각주 표시(`[1]`, `[a]`)를 제거합니다.
fn clean_cell(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for ch in raw.chars() {
        match ch {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 편입일 파싱 ("1976-08-09", "1957-03-04 (1957)" 등). 실패하면 None.
fn parse_date_added(value: &str) -> Option<NaiveDate> {
    let token = value.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}
