// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions over close prices. Each returns a
// compact series whose first element belongs to a documented input offset;
// `engine` aligns them into per-candle rows.

pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use engine::{compute, IndicatorRow};
