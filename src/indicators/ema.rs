// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
//   multiplier = 2 / (period + 1)
//   EMA_t      = x_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// Seeded with the SMA of the first `period` values.
// =============================================================================

/// EMA of `values` over `period`.
///
/// Element `j` of the result belongs to input index `j + period - 1`. Empty
/// when `period == 0` or the input is shorter than `period`. Production stops
/// at the first non-finite value.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &x in &values[period..] {
        let ema = x * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}
