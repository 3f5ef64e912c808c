// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted mean of the trailing `period` closes:
//   SMA_t = (close_{t-period+1} + ... + close_t) / period
// =============================================================================

/// Compute the SMA series for `values`.
///
/// Element `j` of the result belongs to input index `j + period - 1`.
/// Returns an empty vec when `period == 0` or the input is shorter than
/// `period`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period_f)
        .collect()
}
