//! 데이터셋 구성 파이프라인.
//!
//! 레퍼런스 테이블 조회 → 심볼 필터 → 일봉 수집 → 설명 속성 결합 → 병합 → 저장.
//!
//! 레퍼런스 테이블 조회와 저장 실패는 실행을 중단합니다. 심볼 단위 수집 실패는
//! 해당 심볼만 제외하고 계속 진행합니다.

use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::modules::{
    self, CollectOptions, CsvExporter, FetchFailure, SeriesCollector, TableExporter,
};
use crate::{CollectionStats, Result};
use index_core::{tickers, Column, MergedTable};
use index_data::{
    HistoricalSeriesFetcher, ReferenceTableSource, WikipediaReferenceTable, YahooChartFetcher,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// 저장 전 파이프라인 결과
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: MergedTable,
    pub stats: CollectionStats,
    pub failures: Vec<FetchFailure>,
}

/// 실행 결과 요약
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub stats: CollectionStats,
    /// 저장된 행 수
    pub rows: usize,
    /// 저장된 심볼 수
    pub symbols: usize,
    pub failures: Vec<FetchFailure>,
    pub output_path: PathBuf,
}

/// 데이터셋 구성 파이프라인
pub struct Pipeline {
    config: CollectorConfig,
    reference: Arc<dyn ReferenceTableSource>,
    fetcher: Arc<dyn HistoricalSeriesFetcher>,
    exporter: Arc<dyn TableExporter>,
}

impl Pipeline {
    pub fn new(
        config: CollectorConfig,
        reference: Arc<dyn ReferenceTableSource>,
        fetcher: Arc<dyn HistoricalSeriesFetcher>,
        exporter: Arc<dyn TableExporter>,
    ) -> Self {
        Self {
            config,
            reference,
            fetcher,
            exporter,
        }
    }

    /// 설정에 맞는 기본 데이터 소스(Wikipedia, Yahoo)와 CSV 저장기로 구성합니다.
    pub fn from_config(config: CollectorConfig) -> Result<Self> {
        let timeout = config.history.timeout();

        let reference = WikipediaReferenceTable::new(timeout)
            .map_err(|e| CollectorError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;
        let fetcher = YahooChartFetcher::with_base_url(config.history.base_url.clone(), timeout)
            .map_err(|e| CollectorError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self::new(
            config,
            Arc::new(reference),
            Arc::new(fetcher),
            Arc::new(CsvExporter::new()),
        ))
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// 병합 테이블을 구성합니다 (저장하지 않음).
    pub async fn build(&self) -> Result<PipelineOutput> {
        let start = Instant::now();

        // 1. 레퍼런스 테이블
        tracing::info!(
            source = self.reference.name(),
            url = %self.config.reference.url,
            "Step 1/5: 레퍼런스 테이블 조회"
        );
        let constituents = self
            .reference
            .fetch(&self.config.reference.url)
            .await
            .map_err(CollectorError::Reference)?;
        tracing::info!(records = constituents.len(), "레퍼런스 테이블 조회 완료");

        // 2. 심볼 필터
        tracing::info!("Step 2/5: 심볼 필터링");
        let mut filtered = modules::filter(&constituents, &self.config.filter.excluded_symbols);
        let skipped = constituents
            .iter()
            .filter(|r| self.config.filter.excluded_symbols.contains(&r.symbol))
            .count();
        if let Some(only) = &self.config.filter.only_symbols {
            filtered = modules::retain_symbols(&filtered, only);
        }
        let symbols = tickers(&filtered);

        // 3. 일봉 수집
        tracing::info!(
            symbols = symbols.len(),
            start_date = %self.config.history.start_date,
            "Step 3/5: 일봉 수집"
        );
        let collector = SeriesCollector::new(
            Arc::clone(&self.fetcher),
            CollectOptions::from(&self.config.history),
        );
        let outcome = collector
            .collect(&symbols, self.config.history.start_date)
            .await;

        // 4. 설명 속성 결합
        tracing::info!("Step 4/5: 설명 속성 결합");
        let joined = modules::join(outcome.series, &filtered);

        // 5. 병합
        tracing::info!("Step 5/5: 병합");
        let table = modules::merge(joined, &Column::SCHEMA);

        let mut stats = outcome.stats;
        stats.skipped = skipped;
        stats.elapsed = start.elapsed();

        Ok(PipelineOutput {
            table,
            stats,
            failures: outcome.failures,
        })
    }

    /// 테이블을 구성하고 설정된 경로에 저장합니다.
    pub async fn run(&self) -> Result<PipelineReport> {
        let output = self.build().await?;
        let path = &self.config.export.output_path;

        self.exporter.export(&output.table, path)?;

        let report = PipelineReport {
            rows: output.table.len(),
            symbols: output.table.symbol_count(),
            stats: output.stats,
            failures: output.failures,
            output_path: path.clone(),
        };

        tracing::info!(
            path = %report.output_path.display(),
            rows = report.rows,
            symbols = report.symbols,
            failed = report.failures.len(),
            "데이터셋 저장 완료"
        );

        Ok(report)
    }
}
