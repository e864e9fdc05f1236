//! # Domain Models
//!
//! Canonical types shared by the catalog, analytics and controller.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker, the catalog key |
//! | [`TradeDate`] | Calendar date of a daily bar |
//! | [`Bar`] | Daily OHLCV record |
//! | [`Instrument`] | Session quote, metadata and bar history |
//! | [`AllocationEntry`] | Portfolio allocation slice |
//! | [`Timeframe`] | Lookback selector (1W, 1M, 3M, 1Y) |
//! | [`ViewMode`] | Primary chart (price, volume, correlation) |
//!
//! Constructors reject values that cannot be computed with (non-finite or
//! negative prices, malformed tickers and dates). Cross-field expectations
//! such as "current equals the last close" are checked by
//! [`crate::integrity`] when a catalog is assembled.

mod date;
mod models;
mod symbol;
mod timeframe;
mod view_mode;

pub use date::TradeDate;
pub use models::{AllocationEntry, Bar, Instrument};
pub use symbol::Symbol;
pub use timeframe::Timeframe;
pub use view_mode::ViewMode;
