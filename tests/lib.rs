// Shared fixtures for the behavior suites.
pub use chartwise_core::{
    sample::{sample_catalog, sample_document},
    Bar, Catalog, CatalogDocument, CoreError, DashboardConfig, Instrument, IntegrityConfig,
    Symbol, TradeDate, ViewStateController,
};
pub use std::sync::Arc;

pub fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}

/// Controller over the bundled sample catalog with default configuration.
pub fn sample_controller() -> ViewStateController {
    let catalog = Arc::new(sample_catalog().expect("sample catalog loads"));
    ViewStateController::with_defaults(catalog).expect("controller")
}

/// Instrument whose bars are internally consistent and whose session fields
/// agree with the last two closes.
pub fn consistent_instrument(ticker: &str, closes: &[f64], volume: u64) -> Instrument {
    let start = TradeDate::parse("2024-03-01").expect("date");
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(offset, close)| {
            Bar::new(
                start.days_before(-(offset as i64)),
                *close,
                close + 1.0,
                close - 1.0,
                *close,
                volume,
            )
            .expect("bar")
        })
        .collect();

    let last = closes.last().copied().unwrap_or_default();
    let previous = closes
        .len()
        .checked_sub(2)
        .map_or(last, |index| closes[index]);
    let change = last - previous;
    let change_percent = if previous > 0.0 {
        change / previous * 100.0
    } else {
        0.0
    };

    Instrument::new(
        symbol(ticker),
        format!("{ticker} Corp."),
        last,
        change,
        change_percent,
        volume,
        1.5e12,
        bars,
    )
    .expect("instrument")
}
