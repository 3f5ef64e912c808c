// =============================================================================
// Shared test fixtures
// =============================================================================

use serde_json::{json, Value};

const DAY_MS: i64 = 86_400_000;
const START_MS: i64 = 1_600_000_000_000;

/// Binance-style kline body for `closes`, plus one trailing partial row.
pub(crate) fn klines_body(closes: &[f64]) -> Value {
    let mut rows: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let open_time = START_MS + i as i64 * DAY_MS;
            let close = c.to_string();
            json!([open_time, close, close, close, close, "500.0", open_time + DAY_MS - 1])
        })
        .collect();
    let partial_time = START_MS + closes.len() as i64 * DAY_MS;
    rows.push(json!([partial_time, "1", "1", "1", "1", "1", partial_time + DAY_MS - 1]));
    Value::Array(rows)
}

/// Long uptrend, a stretch of violent swings, then a 25% crash that stays
/// above MA200.
pub(crate) fn dip_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..230).map(|i| 100.0 * 1.005_f64.powi(i)).collect();
    for i in 0..19 {
        let last = *closes.last().unwrap();
        closes.push(if i % 2 == 0 { last * 1.25 } else { last * 0.8 });
    }
    let last = *closes.last().unwrap();
    closes.push(last * 0.75);
    closes
}
