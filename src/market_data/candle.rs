use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single closed OHLCV candle from the Binance kline endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(open_time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Kline granularities accepted by `/api/v3/klines`.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Self::OneHour),
            "4h" => Ok(Self::FourHours),
            "1d" => Ok(Self::OneDay),
            "1w" => Ok(Self::OneWeek),
            other => Err(format!("unsupported interval '{other}'")),
        }
    }
}

/// Composite key that identifies a unique candle series.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CandleKey {
    pub symbol: String,
    pub interval: Interval,
}

impl CandleKey {
    pub fn new(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
        }
    }
}

impl std::fmt::Display for CandleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.interval)
    }
}

// ---------------------------------------------------------------------------
// CandleSeries
// ---------------------------------------------------------------------------

/// One instrument's closed candles at a fixed interval, oldest first.
///
/// Construction goes through [`CandleSeries::new`], which rejects duplicate
/// or out-of-order timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    key: CandleKey,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(key: CandleKey, candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        if let Some(pair) = candles.windows(2).find(|w| w[1].open_time <= w[0].open_time) {
            return Err(AnalysisError::MalformedData(format!(
                "{key}: candle at {} does not follow {}",
                pair[1].open_time, pair[0].open_time
            )));
        }
        Ok(Self { key, candles })
    }

    pub fn key(&self) -> &CandleKey {
        &self.key
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle_at(day: i64, close: f64) -> Candle {
        let ts = Utc.timestamp_opt(1_700_000_000 + day * 86_400, 0).unwrap();
        Candle::new(ts, close, close, close, close, 1.0)
    }

    #[test]
    fn series_accepts_ascending_timestamps() {
        let key = CandleKey::new("BTCUSDT", Interval::OneDay);
        let series = CandleSeries::new(key, vec![candle_at(0, 1.0), candle_at(1, 2.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 2.0]);
    }

    #[test]
    fn series_rejects_duplicate_timestamp() {
        let key = CandleKey::new("BTCUSDT", Interval::OneDay);
        let err = CandleSeries::new(key, vec![candle_at(1, 1.0), candle_at(1, 2.0)]).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedData(_)));
    }

    #[test]
    fn series_rejects_descending_timestamps() {
        let key = CandleKey::new("BTCUSDT", Interval::OneDay);
        assert!(CandleSeries::new(key, vec![candle_at(2, 1.0), candle_at(1, 2.0)]).is_err());
    }

    #[test]
    fn interval_parses_and_displays() {
        assert_eq!("1d".parse::<Interval>().unwrap(), Interval::OneDay);
        assert_eq!(Interval::FourHours.to_string(), "4h");
        assert!("3d".parse::<Interval>().is_err());
    }

    #[test]
    fn key_display() {
        assert_eq!(CandleKey::new("ETHUSDT", Interval::OneDay).to_string(), "ETHUSDT@1d");
    }
}
