//! Core engine for chartwise market dashboards.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The instrument catalog and its integrity audit
//! - Chart-ready derived series
//! - Analytics snapshots and narrative classification
//! - The view-state controller and response envelope

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod integrity;
pub mod narrative;
pub mod sample;
pub mod series;
pub mod thresholds;

pub use analytics::{
    analyze, AnalyticsEngine, AnalyticsRules, AnalyticsSnapshot, Liquidity, MarketCapTier,
    Momentum, Participation, Position, RelativePerformance, RelativeStanding, Trend, VolumeClass,
};
pub use catalog::{Catalog, CatalogDocument};
pub use config::{
    ChangeBasis, DashboardConfig, IntegrityConfig, IntegrityMode, MarketCapThresholds,
    MomentumThresholds, OpportunityThresholds, OutlookThresholds, ParticipationThresholds,
    RiskThresholds, ThresholdConfig, VolumeRatioThresholds,
};
pub use controller::{DashboardFrame, Epoch, PrimarySeries, ViewState, ViewStateController};
pub use domain::{AllocationEntry, Bar, Instrument, Symbol, Timeframe, TradeDate, ViewMode};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, DataIntegrityError, ValidationError};
pub use narrative::{
    narrate, LabeledSentence, Narrative, NarrativeRules, Narrator, Opportunity, Outlook,
    RiskLevel, Theme, TimeHorizon,
};
pub use series::{
    allocation_shares, build_candles, build_comparison, build_correlation_pairs,
    build_price_series, build_volume_series, instrument_cards, AllocationShare, CandlePoint,
    ComparisonRow, CorrelationPoint, DerivedSeries, InstrumentCard, PricePoint, VolumePoint,
};
pub use thresholds::{Bound, ThresholdTable};
