// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based signals derived from the latest indicator row.

pub mod contrarian;

pub use contrarian::{evaluate, Signal, SignalKind};
