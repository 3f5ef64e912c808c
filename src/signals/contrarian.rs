// =============================================================================
// Contrarian Signal Evaluator — "buy the dip" / "sell the rally"
// =============================================================================
//
// Only the latest indicator row is inspected, and only when at least
// MIN_ROWS rows exist. Both rules are evaluated independently; an empty
// result means "neutral".
//
// BUY  : (1d < -5% OR 3d < -10%) AND close > MA200 AND volatility > 15%
// SELL : (1d > +5% OR 3d > +15%) AND MA50 slope > 2% AND RSI > 70
//
// All comparisons are strict.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::IndicatorRow;

/// Minimum number of indicator rows before the latest one is trusted.
pub const MIN_ROWS: usize = 4;

const BUY_DROP_1D: f64 = -5.0;
const BUY_DROP_3D: f64 = -10.0;
const BUY_MIN_VOLATILITY: f64 = 15.0;

const SELL_RALLY_1D: f64 = 5.0;
const SELL_RALLY_3D: f64 = 15.0;
const SELL_MIN_MA50_SLOPE: f64 = 2.0;
const SELL_MIN_RSI: f64 = 70.0;

const BUY_TITLE: &str = "ACHAT - Correction brutale";
const SELL_TITLE: &str = "VENTE - Surachat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A detected condition on the latest row, with the observations behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub title: String,
    /// Formatted numeric observations, in display order.
    pub details: Vec<String>,
}

/// Evaluate both rules against the last row of `rows`.
pub fn evaluate(rows: &[IndicatorRow]) -> Vec<Signal> {
    let mut signals = Vec::new();
    if rows.len() < MIN_ROWS {
        debug!(rows = rows.len(), "too few indicator rows to evaluate");
        return signals;
    }
    let Some(latest) = rows.last() else {
        return signals;
    };

    if is_buy(latest) {
        signals.push(Signal {
            kind: SignalKind::Buy,
            title: BUY_TITLE.to_string(),
            details: vec![
                format!("Variation 1j : {:.1}%", latest.pct_change_1d),
                format!("Variation 3j : {:.1}%", latest.pct_change_3d),
                format!("Volatilité : {:.1}%", latest.volatility),
                format!("Distance MA200 : {:+.1}%", latest.distance_from_ma200()),
            ],
        });
    }

    if is_sell(latest) {
        signals.push(Signal {
            kind: SignalKind::Sell,
            title: SELL_TITLE.to_string(),
            details: vec![
                format!("Variation 1j : {:.1}%", latest.pct_change_1d),
                format!("Variation 3j : {:.1}%", latest.pct_change_3d),
                format!("Pente MA50 : {:.1}%", latest.ma50_slope),
                format!("RSI : {:.1}", latest.rsi),
            ],
        });
    }

    debug!(
        close = latest.candle.close,
        signals = signals.len(),
        "contrarian rules evaluated"
    );
    signals
}

fn is_buy(row: &IndicatorRow) -> bool {
    let sharp_drop = row.pct_change_1d < BUY_DROP_1D || row.pct_change_3d < BUY_DROP_3D;
    sharp_drop && row.candle.close > row.ma200 && row.volatility > BUY_MIN_VOLATILITY
}

fn is_sell(row: &IndicatorRow) -> bool {
    let sharp_rally = row.pct_change_1d > SELL_RALLY_1D || row.pct_change_3d > SELL_RALLY_3D;
    sharp_rally && row.ma50_slope > SELL_MIN_MA50_SLOPE && row.rsi > SELL_MIN_RSI
}
