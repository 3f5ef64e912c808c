// =============================================================================
// Indicator Engine — augments a candle series with the analysis columns
// =============================================================================
//
// Every indicator is computed on the full close column, then aligned back to
// candle indices. A row is emitted only when every indicator is defined, so
// the output starts at the first index covered by the longest window (MA200).
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;
use crate::indicators::bollinger::{calculate_bollinger, DEFAULT_NUM_STD, DEFAULT_PERIOD as BB_PERIOD};
use crate::indicators::macd::{self, calculate_macd};
use crate::indicators::roc::calculate_roc;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::indicators::volatility::calculate_volatility;
use crate::market_data::{Candle, CandleSeries};

pub const RSI_PERIOD: usize = 14;
pub const MA_SHORT: usize = 50;
pub const MA_LONG: usize = 200;
pub const VOLATILITY_PERIOD: usize = 14;
pub const SLOPE_LAG: usize = 3;
pub const WEEK: usize = 7;

/// A candle together with every derived indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub candle: Candle,
    pub rsi: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub pct_change_1d: f64,
    pub pct_change_3d: f64,
    pub pct_change_7d: f64,
    /// Stdev of 1-period returns over 14 periods, in percent.
    pub volatility: f64,
    /// MA50 change over 3 periods, in percent of the earlier MA50.
    pub ma50_slope: f64,
    /// Middle Bollinger band (20-period SMA).
    pub ma20: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    /// Band width relative to the middle band, in percent.
    pub bb_width: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
}

impl IndicatorRow {
    /// How far the close sits above (positive) or below MA200, in percent.
    pub fn distance_from_ma200(&self) -> f64 {
        (self.candle.close / self.ma200 - 1.0) * 100.0
    }
}

/// Derive the indicator rows for `series`.
///
/// Fewer than 200 candles is not an error: the result is simply empty.
/// Non-finite or non-positive prices are rejected with `ComputationError`.
pub fn compute(series: &CandleSeries) -> Result<Vec<IndicatorRow>, AnalysisError> {
    validate(series)?;

    let len = series.len();
    if len < MA_LONG {
        debug!(key = %series.key(), len, "not enough history for indicators");
        return Ok(Vec::new());
    }

    let closes = series.closes();
    let rsi = calculate_rsi(&closes, RSI_PERIOD);
    let ma50 = calculate_sma(&closes, MA_SHORT);
    let ma200 = calculate_sma(&closes, MA_LONG);
    let pct_1d = calculate_roc(&closes, 1);
    let pct_3d = calculate_roc(&closes, 3);
    let volatility = calculate_volatility(&closes, VOLATILITY_PERIOD);
    let ma50_slope = calculate_roc(&ma50, SLOPE_LAG);
    let pct_7d = calculate_roc(&closes, WEEK);
    let bands = calculate_bollinger(&closes, BB_PERIOD, DEFAULT_NUM_STD);
    let macd_start = macd::first_index(macd::DEFAULT_SLOW, macd::DEFAULT_SIGNAL);
    let macd_values = calculate_macd(&closes, macd::DEFAULT_FAST, macd::DEFAULT_SLOW, macd::DEFAULT_SIGNAL);

    let rows: Vec<IndicatorRow> = series
        .candles()
        .iter()
        .enumerate()
        .filter_map(|(i, candle)| {
            let bb = i.checked_sub(BB_PERIOD - 1).and_then(|j| bands.get(j))?;
            let m = i.checked_sub(macd_start).and_then(|j| macd_values.get(j))?;
            Some(IndicatorRow {
                candle: candle.clone(),
                rsi: aligned(&rsi, RSI_PERIOD, i)?,
                ma50: aligned(&ma50, MA_SHORT - 1, i)?,
                ma200: aligned(&ma200, MA_LONG - 1, i)?,
                pct_change_1d: aligned(&pct_1d, 1, i)?,
                pct_change_3d: aligned(&pct_3d, 3, i)?,
                pct_change_7d: aligned(&pct_7d, WEEK, i)?,
                volatility: aligned(&volatility, VOLATILITY_PERIOD, i)?,
                ma50_slope: aligned(&ma50_slope, MA_SHORT - 1 + SLOPE_LAG, i)?,
                ma20: finite(bb.middle)?,
                bb_upper: finite(bb.upper)?,
                bb_lower: finite(bb.lower)?,
                bb_width: finite(bb.width_pct())?,
                macd: finite(m.macd)?,
                macd_signal: finite(m.signal)?,
                macd_hist: finite(m.histogram)?,
            })
        })
        .collect();

    debug!(key = %series.key(), input = len, output = rows.len(), "indicators computed");
    Ok(rows)
}

/// Value of a compact indicator series (whose first element belongs to input
/// index `offset`) at input index `i`. Undefined and non-finite values are
/// `None`.
fn aligned(values: &[f64], offset: usize, i: usize) -> Option<f64> {
    i.checked_sub(offset)
        .and_then(|j| values.get(j))
        .copied()
        .and_then(finite)
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn validate(series: &CandleSeries) -> Result<(), AnalysisError> {
    for c in series.candles() {
        let prices = [c.open, c.high, c.low, c.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) || !c.volume.is_finite() {
            return Err(AnalysisError::ComputationError(format!(
                "{}: invalid candle at {}",
                series.key(),
                c.open_time
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{CandleKey, Interval};
    use chrono::{TimeZone, Utc};

    fn series_from_closes(closes: &[f64]) -> CandleSeries {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let ts = Utc.timestamp_opt(1_600_000_000 + i as i64 * 86_400, 0).unwrap();
                Candle::new(ts, c, c * 1.01, c * 0.99, c, 1_000.0)
            })
            .collect();
        CandleSeries::new(CandleKey::new("BTCUSDT", Interval::OneDay), candles).unwrap()
    }

    fn wavy_closes(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 10.0 * (i as f64 / 7.0).sin() + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn short_series_yields_no_rows() {
        for n in [0, 1, 50, 199] {
            let rows = compute(&series_from_closes(&wavy_closes(n))).unwrap();
            assert!(rows.is_empty(), "n = {n}");
        }
    }

    #[test]
    fn rows_start_at_index_199() {
        for n in [200, 250, 299] {
            let series = series_from_closes(&wavy_closes(n));
            let rows = compute(&series).unwrap();
            assert_eq!(rows.len(), n - 199, "n = {n}");
            assert_eq!(rows[0].candle, series.candles()[199]);
            assert_eq!(rows.last().unwrap().candle, *series.candles().last().unwrap());
        }
    }

    #[test]
    fn every_indicator_is_defined() {
        let rows = compute(&series_from_closes(&wavy_closes(299))).unwrap();
        for r in &rows {
            for v in [
                r.rsi,
                r.ma50,
                r.ma200,
                r.pct_change_1d,
                r.pct_change_3d,
                r.volatility,
                r.ma50_slope,
                r.pct_change_7d,
                r.ma20,
                r.bb_upper,
                r.bb_lower,
                r.bb_width,
                r.macd,
                r.macd_signal,
                r.macd_hist,
            ] {
                assert!(v.is_finite());
            }
            assert!((0.0..=100.0).contains(&r.rsi));
            assert!(r.bb_upper >= r.bb_lower);
        }
    }

    #[test]
    fn compute_is_idempotent() {
        let series = series_from_closes(&wavy_closes(260));
        assert_eq!(compute(&series).unwrap(), compute(&series).unwrap());
    }

    #[test]
    fn constant_prices() {
        let rows = compute(&series_from_closes(&vec![100.0; 250])).unwrap();
        let last = rows.last().unwrap();
        assert!((last.ma200 - 100.0).abs() < 1e-10);
        assert!((last.ma50 - 100.0).abs() < 1e-10);
        assert!((last.rsi - 50.0).abs() < 1e-10);
        assert!(last.volatility.abs() < 1e-10);
        assert!(last.ma50_slope.abs() < 1e-10);
        assert!(last.pct_change_1d.abs() < 1e-10);
        assert!(last.distance_from_ma200().abs() < 1e-10);
        assert!(last.bb_width.abs() < 1e-10);
        assert!(last.macd.abs() < 1e-10);
        assert!(last.macd_hist.abs() < 1e-10);
    }

    #[test]
    fn values_match_definitions() {
        let closes = wavy_closes(230);
        let rows = compute(&series_from_closes(&closes)).unwrap();
        let last = rows.last().unwrap();
        let t = closes.len() - 1;

        let ma50_at = |i: usize| closes[i + 1 - 50..=i].iter().sum::<f64>() / 50.0;
        let ma200 = closes[t + 1 - 200..=t].iter().sum::<f64>() / 200.0;

        assert!((last.ma50 - ma50_at(t)).abs() < 1e-9);
        assert!((last.ma200 - ma200).abs() < 1e-9);
        assert!((last.pct_change_1d - (closes[t] / closes[t - 1] - 1.0) * 100.0).abs() < 1e-9);
        assert!((last.pct_change_3d - (closes[t] / closes[t - 3] - 1.0) * 100.0).abs() < 1e-9);
        let slope = (ma50_at(t) - ma50_at(t - 3)) / ma50_at(t - 3) * 100.0;
        assert!((last.ma50_slope - slope).abs() < 1e-9);
        let ma20 = closes[t + 1 - 20..=t].iter().sum::<f64>() / 20.0;
        assert!((last.ma20 - ma20).abs() < 1e-9);
        assert!((last.macd_hist - (last.macd - last.macd_signal)).abs() < 1e-12);
    }

    #[test]
    fn weekly_change_compounds() {
        // Alternating +10% / -10% moves: summing daily changes would read ~0%.
        let mut closes: Vec<f64> = (0..240).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        for k in 0..7 {
            let last = *closes.last().unwrap();
            closes.push(if k % 2 == 0 { last * 1.1 } else { last * 0.9 });
        }
        let rows = compute(&series_from_closes(&closes)).unwrap();
        let last = rows.last().unwrap();
        let t = closes.len() - 1;

        let expected = (closes[t] / closes[t - 7] - 1.0) * 100.0;
        assert!((last.pct_change_7d - expected).abs() < 1e-9);
        let summed: f64 = rows.iter().rev().take(7).map(|r| r.pct_change_1d).sum();
        assert!((last.pct_change_7d - summed).abs() > 1.0);
    }

    #[test]
    fn invalid_price_is_computation_error() {
        let mut closes = wavy_closes(220);
        closes[100] = f64::NAN;
        let err = compute(&series_from_closes(&closes)).unwrap_err();
        assert!(matches!(err, AnalysisError::ComputationError(_)));

        let mut closes = wavy_closes(220);
        closes[5] = 0.0;
        assert!(compute(&series_from_closes(&closes)).is_err());
    }
}
