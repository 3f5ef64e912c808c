// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first
//          `period` gains / losses.
// Step 3 — Wilder smoothing:
//            avg = (prev_avg * (period - 1) + current) / period
// Step 4 — RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//
// Zones:  RSI > 70 => overbought,  RSI < 30 => oversold.
// =============================================================================

use serde::Serialize;

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

/// Compute the full RSI series for `closes`.
///
/// Element `j` of the result belongs to close index `j + period`; the first
/// `period` closes only seed the averages.
///
/// # Edge cases
/// - `period == 0` or fewer than `period + 1` closes => empty vec
/// - no movement at all => 50.0
/// - gains but no losses => 100.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l - d)
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Coarse reading of an RSI value, shown next to the metric on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn of(rsi: f64) -> Self {
        if rsi > OVERBOUGHT {
            Self::Overbought
        } else if rsi < OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

// Non-finite averages propagate as NaN and the row is discarded downstream.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
    }
}
