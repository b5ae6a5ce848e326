//! 데이터셋 구성을 위한 도메인 모델.

mod constituent;
mod enriched;
mod price_bar;
mod series;
mod table;

pub use constituent::*;
pub use enriched::*;
pub use price_bar::*;
pub use series::*;
pub use table::*;
