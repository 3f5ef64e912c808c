pub mod candle;
pub mod kline_cache;

// Re-export the core types for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{Candle, CandleKey, CandleSeries, Interval};
pub use kline_cache::KlineCache;
