//! Bundled sample feed.
//!
//! Three large-cap equities with five daily bars each plus a five-sector
//! allocation, exactly as the mocked dashboard feed ships them. The data is
//! deliberately left as-is: several bars open outside their high/low range
//! and the reported session changes do not match the closes, so the catalog
//! only loads in audit mode.

use time::macros::date;
use time::Date;

use crate::{
    AllocationEntry, Bar, Catalog, CatalogDocument, CoreError, Instrument, IntegrityConfig,
    Symbol, TradeDate, ValidationError,
};

type BarRow = (Date, f64, f64, f64, f64, u64);

const AAPL_BARS: [BarRow; 5] = [
    (date!(2024 - 01 - 01), 179.1, 182.5, 178.3, 180.25, 52_000_000),
    (date!(2024 - 01 - 02), 180.25, 184.2, 180.8, 182.15, 48_000_000),
    (date!(2024 - 01 - 03), 182.15, 183.1, 177.5, 178.90, 61_000_000),
    (date!(2024 - 01 - 04), 178.90, 183.8, 179.2, 181.75, 43_000_000),
    (date!(2024 - 01 - 05), 181.75, 186.9, 182.1, 185.42, 45_623_000),
];

const GOOGL_BARS: [BarRow; 5] = [
    (date!(2024 - 01 - 01), 144.5, 147.1, 143.8, 145.20, 28_000_000),
    (date!(2024 - 01 - 02), 145.20, 146.2, 142.9, 143.85, 31_000_000),
    (date!(2024 - 01 - 03), 143.85, 148.5, 144.1, 147.30, 25_000_000),
    (date!(2024 - 01 - 04), 147.30, 148.0, 143.2, 144.55, 29_000_000),
    (date!(2024 - 01 - 05), 144.55, 145.8, 141.9, 142.68, 23_450_000),
];

const TSLA_BARS: [BarRow; 5] = [
    (date!(2024 - 01 - 01), 234.0, 238.5, 232.1, 235.20, 95_000_000),
    (date!(2024 - 01 - 02), 235.20, 243.2, 236.8, 240.75, 78_000_000),
    (date!(2024 - 01 - 03), 240.75, 242.9, 235.3, 238.46, 102_000_000),
    (date!(2024 - 01 - 04), 238.46, 248.1, 239.7, 245.33, 84_000_000),
    (date!(2024 - 01 - 05), 245.33, 251.8, 246.2, 248.91, 89_234_000),
];

const ALLOCATION: [(&str, f64); 5] = [
    ("Technology", 45.0),
    ("Healthcare", 20.0),
    ("Finance", 15.0),
    ("Energy", 12.0),
    ("Consumer", 8.0),
];

pub fn sample_document() -> Result<CatalogDocument, ValidationError> {
    let instruments = vec![
        instrument(
            "AAPL",
            "Apple Inc.",
            (185.42, 2.34, 1.28, 45_623_000, 2_890_000_000_000.0),
            &AAPL_BARS,
        )?,
        instrument(
            "GOOGL",
            "Alphabet Inc.",
            (142.68, -1.87, -1.29, 23_450_000, 1_780_000_000_000.0),
            &GOOGL_BARS,
        )?,
        instrument(
            "TSLA",
            "Tesla Inc.",
            (248.91, 8.45, 3.51, 89_234_000, 790_000_000_000.0),
            &TSLA_BARS,
        )?,
    ];

    let allocation = ALLOCATION
        .iter()
        .map(|(name, weight)| AllocationEntry::new(*name, *weight))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CatalogDocument {
        instruments,
        allocation,
    })
}

/// Sample catalog audited with the default (audit-mode) integrity settings.
pub fn sample_catalog() -> Result<Catalog, CoreError> {
    Catalog::from_document(sample_document()?, &IntegrityConfig::default())
}

fn instrument(
    symbol: &str,
    name: &str,
    (current, change, change_percent, volume, market_cap): (f64, f64, f64, u64, f64),
    rows: &[BarRow],
) -> Result<Instrument, ValidationError> {
    let bars = rows
        .iter()
        .map(|(date, open, high, low, close, volume)| {
            Bar::new(TradeDate::from_date(*date), *open, *high, *low, *close, *volume)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Instrument::new(
        Symbol::parse(symbol)?,
        name,
        current,
        change,
        change_percent,
        volume,
        market_cap,
        bars,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataIntegrityError;

    #[test]
    fn sample_catalog_loads_in_audit_mode() {
        let catalog = sample_catalog().expect("sample catalog");

        let symbols: Vec<&str> = catalog.symbols().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "TSLA"]);
        assert_eq!(catalog.allocation().len(), 5);
        assert!(catalog
            .issues()
            .iter()
            .any(|issue| matches!(issue, DataIntegrityError::InvalidBarBounds { .. })));
        assert!(catalog
            .issues()
            .iter()
            .all(|issue| !matches!(issue, DataIntegrityError::CurrentPriceMismatch { .. })));
    }

    #[test]
    fn sample_catalog_fails_strict_audit() {
        let document = sample_document().expect("sample document");
        let err = Catalog::from_document(document, &IntegrityConfig::strict())
            .expect_err("must fail");
        assert!(matches!(err, CoreError::DataIntegrity(_)));
    }
}
