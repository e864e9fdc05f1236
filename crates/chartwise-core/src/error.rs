use thiserror::Error;

use crate::Symbol;

/// Validation and contract errors exposed by `chartwise-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid timeframe '{value}', expected one of 1W, 1M, 3M, 1Y")]
    InvalidTimeframe { value: String },
    #[error("invalid view mode '{value}', expected one of price, volume, correlation")]
    InvalidViewMode { value: String },
    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("threshold table '{table}' must list strictly descending bounds")]
    UnorderedThresholds { table: &'static str },
    #[error("tolerance '{field}' must be finite and non-negative")]
    InvalidTolerance { field: &'static str },

    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
}

/// Catalog data that contradicts the invariants the analytics rely on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataIntegrityError {
    #[error("symbol {symbol} appears more than once in the catalog")]
    DuplicateSymbol { symbol: Symbol },
    #[error("{symbol}: bar dates must be strictly increasing (index {index})")]
    UnorderedBars { symbol: Symbol, index: usize },
    #[error("{symbol}: bar {index} high {high} is below low {low}")]
    InvalidBarRange {
        symbol: Symbol,
        index: usize,
        high: f64,
        low: f64,
    },
    #[error("{symbol}: bar {index} open/close must be within high/low range")]
    InvalidBarBounds { symbol: Symbol, index: usize },
    #[error("{symbol}: current price {current} disagrees with last close {last_close}")]
    CurrentPriceMismatch {
        symbol: Symbol,
        current: f64,
        last_close: f64,
    },
    #[error("{symbol}: reported change {reported} disagrees with implied change {implied}")]
    ChangeMismatch {
        symbol: Symbol,
        reported: f64,
        implied: f64,
    },
    #[error("allocation '{name}' has a negative weight {weight}")]
    NegativeAllocation { name: String, weight: f64 },
    #[error("allocation weights sum to {total}, expected 100")]
    AllocationTotal { total: f64 },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown instrument '{symbol}'")]
    UnknownInstrument { symbol: Symbol },

    #[error("instrument {symbol} has no bars in the analyzed window")]
    EmptyHistory { symbol: Symbol },

    #[error("catalog must contain at least one instrument")]
    EmptyCatalog,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("data integrity violation: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Stable machine-readable code for envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownInstrument { .. } => "unknown_instrument",
            Self::EmptyHistory { .. } => "empty_history",
            Self::EmptyCatalog => "empty_catalog",
            Self::Validation(_) => "validation",
            Self::DataIntegrity(_) => "data_integrity",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }
}
