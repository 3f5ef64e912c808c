// =============================================================================
// Binance Module
// =============================================================================
//
// Public REST access to the spot kline endpoint.

pub mod client;

pub use client::{BinanceClient, ClientOptions};
