//! 파이프라인 단계 모듈.

pub mod attribute_join;
pub mod export;
pub mod series_collect;
pub mod table_merge;
pub mod ticker_filter;

pub use attribute_join::join;
pub use export::{CsvExporter, TableExporter};
pub use series_collect::{CollectOptions, CollectionOutcome, FetchFailure, SeriesCollector};
pub use table_merge::merge;
pub use ticker_filter::{default_excluded_symbols, filter, retain_symbols, DEFAULT_EXCLUDED_SYMBOLS};
