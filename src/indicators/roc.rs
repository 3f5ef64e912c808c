// =============================================================================
// Percentage Change / Rate of Change (ROC)
// =============================================================================
//
//   ROC_t = (value_t / value_{t-period} - 1) * 100
//
// Used for the 1- and 3-period price changes and, applied to the MA50 series,
// for the MA50 slope.
// =============================================================================

/// Calculate the percentage change of `values` over `period` steps.
///
/// Element `j` of the result belongs to input index `j + period`. A zero base
/// value yields a non-finite entry, which callers treat as undefined.
pub fn calculate_roc(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() <= period {
        return Vec::new();
    }

    values
        .iter()
        .zip(&values[period..])
        .map(|(&prev, &cur)| {
            if prev == 0.0 {
                f64::NAN
            } else {
                (cur - prev) / prev * 100.0
            }
        })
        .collect()
}
