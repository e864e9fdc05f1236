use serde::{Deserialize, Serialize};

use crate::{Symbol, TradeDate, ValidationError};

/// Daily OHLCV bar.
///
/// Construction only rejects values that cannot be priced (non-finite or
/// negative). Whether open/close sit inside the high/low range is an
/// integrity question answered by the catalog audit, because upstream feeds
/// routinely ship bars that violate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BarRecord")]
pub struct Bar {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        date: TradeDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn has_valid_range(&self) -> bool {
        self.high >= self.low
    }

    pub fn body_within_range(&self) -> bool {
        let within = |price: f64| price >= self.low && price <= self.high;
        within(self.open) && within(self.close)
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Instrument metadata, session quote and daily history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InstrumentRecord")]
pub struct Instrument {
    pub symbol: Symbol,
    pub name: String,
    /// Latest traded price.
    pub current: f64,
    /// Absolute session change.
    pub change: f64,
    /// Session change in percent, as reported by the feed.
    pub change_percent: f64,
    /// Session volume in shares.
    pub volume: u64,
    pub market_cap: f64,
    pub bars: Vec<Bar>,
}

impl Instrument {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Symbol,
        name: impl Into<String>,
        current: f64,
        change: f64,
        change_percent: f64,
        volume: u64,
        market_cap: f64,
        bars: Vec<Bar>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("current", current)?;
        validate_finite("change", change)?;
        validate_finite("change_percent", change_percent)?;
        validate_non_negative("market_cap", market_cap)?;

        Ok(Self {
            symbol,
            name: name.into(),
            current,
            change,
            change_percent,
            volume,
            market_cap,
            bars,
        })
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.close)
    }
}

/// One slice of the portfolio allocation pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AllocationRecord")]
pub struct AllocationEntry {
    pub name: String,
    /// Weight in percent.
    pub weight: f64,
}

impl AllocationEntry {
    pub fn new(name: impl Into<String>, weight: f64) -> Result<Self, ValidationError> {
        validate_finite("weight", weight)?;
        Ok(Self {
            name: name.into(),
            weight,
        })
    }
}

// Wire shapes: deserialization goes through the validating constructors.

#[derive(Deserialize)]
struct BarRecord {
    date: TradeDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl TryFrom<BarRecord> for Bar {
    type Error = ValidationError;

    fn try_from(record: BarRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.date,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        )
    }
}

#[derive(Deserialize)]
struct InstrumentRecord {
    symbol: Symbol,
    name: String,
    current: f64,
    change: f64,
    change_percent: f64,
    volume: u64,
    market_cap: f64,
    bars: Vec<Bar>,
}

impl TryFrom<InstrumentRecord> for Instrument {
    type Error = ValidationError;

    fn try_from(record: InstrumentRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.symbol,
            record.name,
            record.current,
            record.change,
            record.change_percent,
            record.volume,
            record.market_cap,
            record.bars,
        )
    }
}

#[derive(Deserialize)]
struct AllocationRecord {
    name: String,
    weight: f64,
}

impl TryFrom<AllocationRecord> for AllocationEntry {
    type Error = ValidationError;

    fn try_from(record: AllocationRecord) -> Result<Self, Self::Error> {
        Self::new(record.name, record.weight)
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
