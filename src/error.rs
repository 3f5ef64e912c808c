// =============================================================================
// Analysis Errors — the failure kinds of the fetch → compute → evaluate pipeline
// =============================================================================
//
// Every kind is non-fatal: the API layer turns it into a JSON message and the
// process keeps serving. "Zero signals" is never an error.
// =============================================================================

use serde::Serialize;

/// Failure of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Transport failure or non-success response from the kline endpoint.
    DataUnavailable(String),
    /// The upstream response does not have the expected shape or types.
    MalformedData(String),
    /// Indicators could not be derived from the series.
    ComputationError(String),
    /// The symbol is not part of the instrument catalog.
    UnknownInstrument(String),
}

/// Machine-readable discriminant, serialised into API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    DataUnavailable,
    MalformedData,
    ComputationError,
    UnknownInstrument,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable(_) => ErrorKind::DataUnavailable,
            Self::MalformedData(_) => ErrorKind::MalformedData,
            Self::ComputationError(_) => ErrorKind::ComputationError,
            Self::UnknownInstrument(_) => ErrorKind::UnknownInstrument,
        }
    }

    /// `DataUnavailable` and `MalformedData` both mean the upstream let us down.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::DataUnavailable(_) | Self::MalformedData(_))
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataUnavailable(cause) => write!(f, "market data unavailable: {cause}"),
            Self::MalformedData(cause) => write!(f, "malformed market data: {cause}"),
            Self::ComputationError(cause) => write!(f, "no analysis available: {cause}"),
            Self::UnknownInstrument(symbol) => write!(f, "unknown instrument '{symbol}'"),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_kinds() {
        assert!(AnalysisError::DataUnavailable("timeout".into()).is_upstream());
        assert!(AnalysisError::MalformedData("bad row".into()).is_upstream());
        assert!(!AnalysisError::ComputationError("nan".into()).is_upstream());
        assert!(!AnalysisError::UnknownInstrument("FOO".into()).is_upstream());
    }

    #[test]
    fn display_carries_cause() {
        let err = AnalysisError::DataUnavailable("HTTP 503".into());
        assert_eq!(err.to_string(), "market data unavailable: HTTP 503");
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }
}
