// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(period), upper/lower = middle ± k·σ where σ is the
// population standard deviation of the same window. The dashboard shows the
// 20-period, 2σ bands next to the price.

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Bands for one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerResult {
    /// Band width relative to the middle band, in percent.
    pub fn width_pct(&self) -> f64 {
        (self.upper - self.lower) / self.middle * 100.0
    }
}

/// Rolling Bollinger Bands over `closes`.
///
/// Element `j` of the result belongs to close index `j + period - 1`.
/// Returns an empty vec when `period == 0` or there are fewer than `period`
/// closes.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<BollingerResult> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    closes
        .windows(period)
        .map(|window| {
            let middle = window.iter().sum::<f64>() / period_f;
            let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period_f;
            let std_dev = variance.sqrt();
            BollingerResult {
                upper: middle + num_std * std_dev,
                middle,
                lower: middle - num_std * std_dev,
            }
        })
        .collect()
}
