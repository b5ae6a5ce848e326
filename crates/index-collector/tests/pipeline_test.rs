//! 파이프라인 통합 테스트 (가짜 데이터 소스 사용).

use async_trait::async_trait;
use chrono::NaiveDate;
use index_collector::config::CollectorConfig;
use index_collector::modules::{CsvExporter, TableExporter};
use index_collector::{CollectorError, Pipeline};
use index_core::{Column, ConstituentRecord, MergedTable, PriceBar};
use index_data::{DataError, HistoricalSeriesFetcher, ReferenceTableSource};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn bar(d: u32, close: f64) -> PriceBar {
    PriceBar::new(date(d), close, close + 1.0, close - 1.0, close, 1000)
}

struct FakeReference {
    result: Mutex<Option<Result<Vec<ConstituentRecord>, DataError>>>,
}

impl FakeReference {
    fn ok(records: Vec<ConstituentRecord>) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(Ok(records))),
        })
    }

    fn failing(error: DataError) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(Err(error))),
        })
    }
}

#[async_trait]
impl ReferenceTableSource for FakeReference {
    fn name(&self) -> &str {
        "fake-reference"
    }

    async fn fetch(&self, _url: &str) -> index_data::Result<Vec<ConstituentRecord>> {
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Default)]
struct FakeFetcher {
    bars: HashMap<String, Vec<PriceBar>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoricalSeriesFetcher for FakeFetcher {
    fn name(&self) -> &str {
        "fake-history"
    }

    async fn fetch(&self, symbol: &str, _start_date: NaiveDate) -> index_data::Result<Vec<PriceBar>> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        self.bars
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

#[derive(Default)]
struct RecordingExporter {
    exported: Mutex<Vec<(PathBuf, MergedTable)>>,
}

impl TableExporter for RecordingExporter {
    fn export(&self, table: &MergedTable, destination: &Path) -> index_collector::Result<()> {
        self.exported
            .lock()
            .unwrap()
            .push((destination.to_path_buf(), table.clone()));
        Ok(())
    }
}

struct FailingExporter;

impl TableExporter for FailingExporter {
    fn export(&self, _table: &MergedTable, destination: &Path) -> index_collector::Result<()> {
        Err(CollectorError::Write(format!(
            "{}: permission denied",
            destination.display()
        )))
    }
}

fn constituents() -> Vec<ConstituentRecord> {
    vec![
        ConstituentRecord::new("AAA", "SecA", "TechSector", "SubA").with_date_added(date(1)),
        ConstituentRecord::new("BBB", "SecB", "HealthSector", "SubB"),
    ]
}

fn test_config(excluded: &[&str]) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.filter.excluded_symbols = excluded.iter().map(|s| s.to_string()).collect::<HashSet<_>>();
    config.history.start_date = date(1);
    config.history.timeout_ms = 1_000;
    config.export.output_path = PathBuf::from("out.csv");
    config
}

#[tokio::test]
async fn test_excluded_symbol_is_never_fetched() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_bars("AAA", vec![bar(2, 10.0)])
            .with_bars("BBB", vec![bar(2, 20.0)]),
    );
    let exporter = Arc::new(RecordingExporter::default());
    let pipeline = Pipeline::new(
        test_config(&["BBB"]),
        FakeReference::ok(constituents()),
        fetcher.clone(),
        exporter.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(fetcher.calls(), vec!["AAA".to_string()]);
    assert_eq!(report.rows, 1);
    assert_eq!(report.symbols, 1);
    assert_eq!(report.stats.skipped, 1);

    let exported = exporter.exported.lock().unwrap();
    assert_eq!(exported.len(), 1);
    let (path, table) = &exported[0];
    assert_eq!(path, &PathBuf::from("out.csv"));
    assert_eq!(table.schema, Column::SCHEMA.to_vec());

    let row = &table.rows[0];
    assert_eq!(row.symbol, "AAA");
    assert_eq!(row.date, date(2));
    assert_eq!(row.security_name.as_deref(), Some("SecA"));
    assert_eq!(row.sector.as_deref(), Some("TechSector"));
    assert_eq!(row.date_added, Some(date(1)));
    assert_eq!(row.close, 10.0);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_symbol_is_dropped() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_bars("AAA", vec![bar(2, 10.0)])
            .with_delay("AAA", Duration::from_secs(60))
            .with_bars("BBB", vec![bar(2, 20.0), bar(3, 21.0)]),
    );
    let exporter = Arc::new(RecordingExporter::default());
    let pipeline = Pipeline::new(
        test_config(&[]),
        FakeReference::ok(constituents()),
        fetcher,
        exporter.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.stats.success, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].symbol, "AAA");

    let exported = exporter.exported.lock().unwrap();
    let table = &exported[0].1;
    assert_eq!(table.len(), 2);
    assert!(table.rows.iter().all(|r| r.symbol == "BBB"));
    assert_eq!(table.rows[0].date, date(2));
    assert_eq!(table.rows[1].date, date(3));
}

#[tokio::test]
async fn test_reference_failure_aborts_before_fetching() {
    let fetcher = Arc::new(FakeFetcher::default().with_bars("AAA", vec![bar(2, 10.0)]));
    let exporter = Arc::new(RecordingExporter::default());
    let pipeline = Pipeline::new(
        test_config(&[]),
        FakeReference::failing(DataError::SourceUnavailable("HTTP 503".to_string())),
        fetcher.clone(),
        exporter.clone(),
    );

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(
        err,
        CollectorError::Reference(DataError::SourceUnavailable(_))
    ));
    assert!(fetcher.calls().is_empty());
    assert!(exporter.exported.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_constituent_list_exports_header_only_table() {
    let fetcher = Arc::new(FakeFetcher::default());
    let exporter = Arc::new(RecordingExporter::default());
    let pipeline = Pipeline::new(
        test_config(&[]),
        FakeReference::ok(Vec::new()),
        fetcher.clone(),
        exporter.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.rows, 0);
    assert!(fetcher.calls().is_empty());
    let exported = exporter.exported.lock().unwrap();
    assert!(exported[0].1.is_empty());
    assert_eq!(exported[0].1.schema.len(), Column::SCHEMA.len());
}

#[tokio::test]
async fn test_symbol_selection_limits_fetches() {
    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_bars("AAA", vec![bar(2, 10.0)])
            .with_bars("BBB", vec![bar(2, 20.0)]),
    );
    let mut config = test_config(&[]);
    config.filter.only_symbols = Some(["BBB".to_string()].into_iter().collect());
    let pipeline = Pipeline::new(
        config,
        FakeReference::ok(constituents()),
        fetcher.clone(),
        Arc::new(RecordingExporter::default()),
    );

    let output = pipeline.build().await.unwrap();

    assert_eq!(fetcher.calls(), vec!["BBB".to_string()]);
    assert_eq!(output.table.len(), 1);
    assert_eq!(output.table.rows[0].sector.as_deref(), Some("HealthSector"));
}

#[tokio::test]
async fn test_export_failure_is_fatal() {
    let fetcher = Arc::new(FakeFetcher::default().with_bars("AAA", vec![bar(2, 10.0)]));
    let pipeline = Pipeline::new(
        test_config(&["BBB"]),
        FakeReference::ok(constituents()),
        fetcher,
        Arc::new(FailingExporter),
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, CollectorError::Write(_)));
}

#[tokio::test]
async fn test_end_to_end_csv_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("constituents_history.csv");

    let fetcher = Arc::new(
        FakeFetcher::default()
            .with_bars("AAA", vec![bar(3, 11.0), bar(2, 10.0)])
            .with_bars("BBB", vec![bar(2, 20.0)]),
    );
    let mut config = test_config(&[]);
    config.export.output_path = path.clone();
    let pipeline = Pipeline::new(
        config,
        FakeReference::ok(constituents()),
        fetcher,
        Arc::new(CsvExporter::new()),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.rows, 3);
    assert_eq!(report.output_path, path);

    let table = CsvExporter::new().read(&path).unwrap();
    let keys: Vec<(String, NaiveDate)> = table
        .rows
        .iter()
        .map(|r| (r.symbol.clone(), r.date))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("AAA".to_string(), date(2)),
            ("AAA".to_string(), date(3)),
            ("BBB".to_string(), date(2)),
        ]
    );
    assert_eq!(table.rows[2].date_added, None);
    assert_eq!(table.rows[2].sub_industry.as_deref(), Some("SubB"));
}
