// =============================================================================
// Return Volatility
// =============================================================================
//
// Rolling sample standard deviation (n - 1 denominator) of one-period
// fractional returns, expressed in percent:
//
//   r_t   = close_t / close_{t-1} - 1
//   vol_t = stdev(r_{t-period+1} .. r_t) * 100
// =============================================================================

/// Compute rolling return volatility for `closes`.
///
/// Element `j` of the result belongs to close index `j + period`: the first
/// window needs `period` returns, i.e. `period + 1` closes.
/// Returns an empty vec when `period < 2` or there is not enough data.
pub fn calculate_volatility(closes: &[f64], period: usize) -> Vec<f64> {
    if period < 2 || closes.len() < period + 1 {
        return Vec::new();
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let period_f = period as f64;

    returns
        .windows(period)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / period_f;
            let variance = w.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (period_f - 1.0);
            variance.sqrt() * 100.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volatility_flat_market_is_zero() {
        let vol = calculate_volatility(&vec![100.0; 20], 14);
        assert_eq!(vol.len(), 6);
        assert!(vol.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn volatility_alternating_returns() {
        // Returns alternate +10% / -10% (approximately): sample stdev of an
        // alternating +a/-a sequence of even length n is a * sqrt(n / (n - 1)).
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last * 1.1 } else { last * 0.9 });
        }
        let vol = calculate_volatility(&closes, 14);
        assert_eq!(vol.len(), 1);
        let expected = 10.0 * (14.0_f64 / 13.0).sqrt();
        assert!((vol[0] - expected).abs() < 1e-9, "got {}", vol[0]);
    }

    #[test]
    fn volatility_insufficient_data() {
        assert!(calculate_volatility(&vec![1.0; 14], 14).is_empty());
        assert!(calculate_volatility(&vec![1.0; 14], 1).is_empty());
    }
}
