// =============================================================================
// Binance Public Market Data Client — kline fetch & normalisation
// =============================================================================
//
// Only unauthenticated endpoints are used, so no API key or request signing is
// involved. The client issues exactly one request per fetch and never retries.
// =============================================================================

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument};

use crate::error::AnalysisError;
use crate::market_data::{Candle, CandleKey, CandleSeries, Interval, KlineCache};

/// Binance production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Browser-like agent; some edge proxies reject the reqwest default.
const CLIENT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Minimum number of elements in a kline row we actually read.
const KLINE_FIELDS: usize = 6;

/// Transport settings for [`BinanceClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    /// Optional HTTP(S) proxy applied to every request.
    pub proxy_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            proxy_url: None,
        }
    }
}

/// Binance REST client restricted to public market data.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(options: ClientOptions) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = options.proxy_url.as_deref().filter(|p| !p.is_empty()) {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy).with_context(|| format!("invalid proxy url '{proxy}'"))?,
            );
        }
        let client = builder.build().context("failed to build reqwest client")?;

        let base_url = options.base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, timeout = ?options.timeout, "BinanceClient initialised");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/klines (public — no signature required).
    ///
    /// Returns the closed candles of the response: the last row is the
    /// still-forming period and is always dropped.
    ///
    /// Array indices read:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume
    #[instrument(skip(self), name = "binance::fetch_klines")]
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> Result<CandleSeries, AnalysisError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AnalysisError::DataUnavailable(format!("GET /api/v3/klines request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::DataUnavailable(format!(
                "Binance GET /api/v3/klines returned {status}: {body}"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AnalysisError::DataUnavailable(format!("failed to read klines response: {e}")))?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| AnalysisError::MalformedData(format!("klines response is not JSON: {e}")))?;

        let series = parse_klines(CandleKey::new(symbol, interval), &body)?;
        debug!(symbol, interval = %interval, count = series.len(), "klines fetched");
        Ok(series)
    }

    /// Same as [`fetch_klines`](Self::fetch_klines) but consults `cache` first
    /// and stores successful results in it. Failures are never cached.
    pub async fn fetch_klines_cached(
        &self,
        cache: &KlineCache,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> Result<CandleSeries, AnalysisError> {
        let key = CandleKey::new(symbol, interval);
        if let Some(series) = cache.get(&key, Instant::now()) {
            debug!(key = %key, "klines served from cache");
            return Ok(series);
        }

        let series = self.fetch_klines(symbol, interval, limit).await?;
        cache.insert(series.clone(), Instant::now());
        Ok(series)
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Response parsing
// -----------------------------------------------------------------------------

/// Normalise a klines array-of-arrays body into a [`CandleSeries`], dropping
/// the final (in-progress) row.
pub fn parse_klines(key: CandleKey, body: &serde_json::Value) -> Result<CandleSeries, AnalysisError> {
    let raw = body
        .as_array()
        .ok_or_else(|| AnalysisError::MalformedData("klines response is not an array".into()))?;

    let closed = &raw[..raw.len().saturating_sub(1)];
    let mut candles = Vec::with_capacity(closed.len());

    for (idx, entry) in closed.iter().enumerate() {
        let arr = entry
            .as_array()
            .ok_or_else(|| AnalysisError::MalformedData(format!("kline entry {idx} is not an array")))?;

        if arr.len() < KLINE_FIELDS {
            return Err(AnalysisError::MalformedData(format!(
                "kline entry {idx} has {} elements, expected at least {KLINE_FIELDS}",
                arr.len()
            )));
        }

        let open_time_ms = parse_open_time(&arr[0])
            .map_err(|e| AnalysisError::MalformedData(format!("kline entry {idx}: {e}")))?;
        let open_time = DateTime::from_timestamp_millis(open_time_ms).ok_or_else(|| {
            AnalysisError::MalformedData(format!("kline entry {idx}: timestamp {open_time_ms} out of range"))
        })?;

        let field = |i: usize, name: &str| {
            parse_str_f64(&arr[i]).map_err(|e| AnalysisError::MalformedData(format!("kline entry {idx} {name}: {e}")))
        };

        candles.push(Candle::new(
            open_time,
            field(1, "open")?,
            field(2, "high")?,
            field(3, "low")?,
            field(4, "close")?,
            field(5, "volume")?,
        ));
    }

    CandleSeries::new(key, candles)
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> std::result::Result<f64, String> {
    if let Some(s) = val.as_str() {
        s.trim()
            .parse::<f64>()
            .map_err(|_| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        Err(format!("expected string or number, got: {val}"))
    }
}

fn parse_open_time(val: &serde_json::Value) -> std::result::Result<i64, String> {
    if let Some(ms) = val.as_i64() {
        Ok(ms)
    } else if let Some(s) = val.as_str() {
        s.trim()
            .parse::<i64>()
            .map_err(|_| format!("failed to parse open time '{s}'"))
    } else {
        Err(format!("expected integer open time, got: {val}"))
    }
}
