// =============================================================================
// MACD — Moving Average Convergence / Divergence
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_period) of the line
//   histogram = line - signal
//
// With the 12/26/9 defaults the first complete value belongs to close index
// 33 (slow - 1 + signal - 1).
// =============================================================================

use crate::indicators::ema::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Input index of the first element returned by [`calculate_macd`].
pub fn first_index(slow: usize, signal: usize) -> usize {
    slow + signal - 2
}

/// MACD over `closes`. Element `j` belongs to close index
/// `first_index(slow, signal) + j`. Empty when `fast >= slow` or there is
/// not enough data for the signal line.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdResult> {
    if fast == 0 || signal == 0 || fast >= slow {
        return Vec::new();
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    if slow_ema.is_empty() {
        return Vec::new();
    }

    // Both EMAs end at the same close; the fast one simply starts earlier.
    let skip = slow - fast;
    let line: Vec<f64> = slow_ema
        .iter()
        .zip(fast_ema.iter().skip(skip))
        .map(|(s, f)| f - s)
        .collect();

    let signal_line = calculate_ema(&line, signal);
    signal_line
        .iter()
        .zip(line.iter().skip(signal - 1))
        .map(|(&sig, &macd)| MacdResult {
            macd,
            signal: sig,
            histogram: macd - sig,
        })
        .collect()
}
