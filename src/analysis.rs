// =============================================================================
// Analysis Pipeline — fetch → indicators → signals → dashboard report
// =============================================================================
//
// One instrument per call, stages strictly in sequence. Each stage either
// succeeds or ends the run with an `AnalysisError`; nothing is retried.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::app_state::AppState;
use crate::catalog::Instrument;
use crate::error::AnalysisError;
use crate::indicators::rsi::RsiZone;
use crate::indicators::{self, IndicatorRow};
use crate::market_data::Interval;
use crate::signals::{self, Signal};

/// Number of closes handed to the price chart.
pub const CHART_POINTS: usize = 60;

/// One point of the closing-price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosePoint {
    pub date: DateTime<Utc>,
    pub close: f64,
}

/// Headline metrics of the latest row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub volatility: f64,
    pub ma50_slope: f64,
    /// Percent above (positive) or below MA200.
    pub distance_from_ma200: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    /// Bollinger band width, in percent of the middle band.
    pub bb_width: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub volume: f64,
    pub pct_change_1d: f64,
    /// Close-to-close change over the last seven periods.
    pub pct_change_7d: f64,
}

/// Everything the dashboard needs to render one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub name: String,
    pub interval: Interval,
    pub as_of: DateTime<Utc>,
    pub current_price: f64,
    pub signals: Vec<Signal>,
    /// True when no rule fired.
    pub neutral: bool,
    pub metrics: KeyMetrics,
    pub recent_closes: Vec<ClosePoint>,
}

/// Run the whole pipeline for `symbol`.
#[instrument(skip(state), name = "analysis::analyze")]
pub async fn analyze(state: &AppState, symbol: &str) -> Result<AnalysisReport, AnalysisError> {
    let instrument = state
        .catalog
        .get(symbol)
        .cloned()
        .ok_or_else(|| AnalysisError::UnknownInstrument(symbol.to_string()))?;

    let config = &state.config;
    let series = state
        .client
        .fetch_klines_cached(&state.cache, &instrument.symbol, config.interval, config.limit)
        .await?;

    let rows = indicators::compute(&series)?;
    let signals = signals::evaluate(&rows);

    let report = build_report(&instrument, config.interval, &rows, signals)?;
    info!(
        symbol = %report.symbol,
        price = report.current_price,
        signals = report.signals.len(),
        "analysis complete"
    );
    Ok(report)
}

/// Assemble the dashboard report from computed rows.
///
/// No rows at all means there was not enough history, which is reported as
/// "no analysis available" rather than as a neutral reading.
pub fn build_report(
    instrument: &Instrument,
    interval: Interval,
    rows: &[IndicatorRow],
    signals: Vec<Signal>,
) -> Result<AnalysisReport, AnalysisError> {
    let latest = rows.last().ok_or_else(|| {
        AnalysisError::ComputationError(format!(
            "{}: not enough history to derive indicators",
            instrument.symbol
        ))
    })?;

    let chart_start = rows.len().saturating_sub(CHART_POINTS);
    let recent_closes = rows[chart_start..]
        .iter()
        .map(|r| ClosePoint {
            date: r.candle.open_time,
            close: r.candle.close,
        })
        .collect();

    Ok(AnalysisReport {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        interval,
        as_of: latest.candle.open_time,
        current_price: latest.candle.close,
        neutral: signals.is_empty(),
        signals,
        metrics: KeyMetrics {
            rsi: latest.rsi,
            rsi_zone: RsiZone::of(latest.rsi),
            volatility: latest.volatility,
            ma50_slope: latest.ma50_slope,
            distance_from_ma200: latest.distance_from_ma200(),
            ma20: latest.ma20,
            ma50: latest.ma50,
            ma200: latest.ma200,
            bb_upper: latest.bb_upper,
            bb_lower: latest.bb_lower,
            bb_width: latest.bb_width,
            macd: latest.macd,
            macd_signal: latest.macd_signal,
            macd_hist: latest.macd_hist,
            volume: latest.candle.volume,
            pct_change_1d: latest.pct_change_1d,
            pct_change_7d: latest.pct_change_7d,
        },
        recent_closes,
    })
}
