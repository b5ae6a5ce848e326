//! 결과 저장 모듈.
//!
//! 병합 테이블을 헤더가 포함된 구분자 텍스트 파일(CSV)로 저장합니다.
//! 알 수 없는 값은 빈 셀로 기록되고, 다시 읽으면 `None`으로 복원됩니다.

use crate::error::CollectorError;
use crate::Result;
use chrono::NaiveDate;
use index_core::{Column, EnrichedRow, MergedTable, DATE_FORMAT};
use std::path::Path;

/// 테이블 저장 trait.
pub trait TableExporter: Send + Sync {
    /// 테이블을 저장합니다. 실패 시 재시도 없이 `CollectorError::Write`를 반환합니다.
    fn export(&self, table: &MergedTable, destination: &Path) -> Result<()>;
}

/// CSV 저장기
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// 구분자를 지정합니다 (예: `b'\t'`).
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// 저장된 파일을 다시 테이블로 읽습니다.
    pub fn read(&self, source: &Path) -> Result<MergedTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(source)
            .map_err(|e| read_error(source, e))?;

        let headers = reader.headers().map_err(|e| read_error(source, e))?.clone();
        let schema = headers
            .iter()
            .map(|h| {
                Column::from_name(h)
                    .ok_or_else(|| CollectorError::Read(format!("알 수 없는 컬럼: {}", h)))
            })
            .collect::<Result<Vec<Column>>>()?;

        if let Some(missing) = Column::SCHEMA.iter().find(|c| !schema.contains(c)) {
            return Err(CollectorError::Read(format!("컬럼 누락: {}", missing)));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| read_error(source, e))?;
            let row = parse_row(&schema, &record)
                .map_err(|msg| CollectorError::Read(format!("{}행: {}", line + 2, msg)))?;
            rows.push(row);
        }

        Ok(MergedTable { schema, rows })
    }
}

impl TableExporter for CsvExporter {
    fn export(&self, table: &MergedTable, destination: &Path) -> Result<()> {
        tracing::info!(
            path = %destination.display(),
            rows = table.len(),
            "CSV 저장 시작"
        );

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(destination)
            .map_err(|e| write_error(destination, e))?;

        writer
            .write_record(table.header())
            .map_err(|e| write_error(destination, e))?;

        for row in &table.rows {
            writer
                .write_record(table.record(row))
                .map_err(|e| write_error(destination, e))?;
        }

        writer.flush().map_err(|e| write_error(destination, e))?;

        tracing::info!(path = %destination.display(), "CSV 저장 완료");
        Ok(())
    }
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> CollectorError {
    CollectorError::Write(format!("{}: {}", path.display(), err))
}

fn read_error(path: &Path, err: impl std::fmt::Display) -> CollectorError {
    CollectorError::Read(format!("{}: {}", path.display(), err))
}

fn cell_value<'a>(schema: &[Column], record: &'a csv::StringRecord, column: Column) -> &'a str {
    schema
        .iter()
        .position(|c| *c == column)
        .and_then(|i| record.get(i))
        .unwrap_or("")
}

fn parse_row(schema: &[Column], record: &csv::StringRecord) -> std::result::Result<EnrichedRow, String> {
    let cell = |column: Column| cell_value(schema, record, column);

    let text = |column: Column| -> Option<String> {
        let value = cell(column);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    let date = |column: Column| -> std::result::Result<Option<NaiveDate>, String> {
        let value = cell(column);
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|e| format!("{} '{}': {}", column, value, e))
    };

    let float = |column: Column| -> std::result::Result<f64, String> {
        let value = cell(column);
        value
            .parse::<f64>()
            .map_err(|e| format!("{} '{}': {}", column, value, e))
    };

    let volume = cell(Column::Volume)
        .parse::<u64>()
        .map_err(|e| format!("{} '{}': {}", Column::Volume, cell(Column::Volume), e))?;

    Ok(EnrichedRow {
        date: date(Column::Date)?.ok_or_else(|| "date 값 없음".to_string())?,
        symbol: cell(Column::Symbol).to_string(),
        security_name: text(Column::SecurityName),
        sector: text(Column::Sector),
        sub_industry: text(Column::SubIndustry),
        date_added: date(Column::DateAdded)?,
        founded: text(Column::Founded),
        open: float(Column::Open)?,
        high: float(Column::High)?,
        low: float(Column::Low)?,
        close: float(Column::Close)?,
        volume,
        dividends: float(Column::Dividends)?,
        stock_splits: float(Column::StockSplits)?,
    })
}
