//! Integrity audit for externally supplied catalog data.
//!
//! The mocked feed the dashboards were built against ships bars whose open
//! sits outside the high/low range and session changes that do not match the
//! last two closes. Structural problems (duplicate symbols, unordered or
//! repeated dates, high below low) break the analytics and always reject a
//! catalog; the remaining issues are rejected only in strict mode.

use std::collections::HashSet;

use crate::{AllocationEntry, DataIntegrityError, Instrument, IntegrityConfig};

impl DataIntegrityError {
    /// Whether the analytics cannot run on data with this issue.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSymbol { .. } | Self::UnorderedBars { .. } | Self::InvalidBarRange { .. }
        )
    }
}

/// Every issue found across `instruments`, in catalog order.
pub fn audit_instruments(
    instruments: &[Instrument],
    config: &IntegrityConfig,
) -> Vec<DataIntegrityError> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for instrument in instruments {
        if !seen.insert(&instrument.symbol) {
            issues.push(DataIntegrityError::DuplicateSymbol {
                symbol: instrument.symbol.clone(),
            });
        }
        issues.extend(audit_instrument(instrument, config));
    }

    issues
}

pub fn audit_instrument(
    instrument: &Instrument,
    config: &IntegrityConfig,
) -> Vec<DataIntegrityError> {
    let symbol = &instrument.symbol;
    let mut issues = Vec::new();

    for (index, pair) in instrument.bars.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            issues.push(DataIntegrityError::UnorderedBars {
                symbol: symbol.clone(),
                index: index + 1,
            });
        }
    }

    for (index, bar) in instrument.bars.iter().enumerate() {
        if !bar.has_valid_range() {
            issues.push(DataIntegrityError::InvalidBarRange {
                symbol: symbol.clone(),
                index,
                high: bar.high,
                low: bar.low,
            });
        } else if !bar.body_within_range() {
            issues.push(DataIntegrityError::InvalidBarBounds {
                symbol: symbol.clone(),
                index,
            });
        }
    }

    if let Some(last_close) = instrument.last_close() {
        if (instrument.current - last_close).abs() > config.price_tolerance {
            issues.push(DataIntegrityError::CurrentPriceMismatch {
                symbol: symbol.clone(),
                current: instrument.current,
                last_close,
            });
        }
    }

    if let [.., previous, _] = instrument.bars.as_slice() {
        let implied = instrument.current - previous.close;
        if (instrument.change - implied).abs() > config.price_tolerance {
            issues.push(DataIntegrityError::ChangeMismatch {
                symbol: symbol.clone(),
                reported: instrument.change,
                implied,
            });
        }
    }

    issues
}

pub fn audit_allocation(
    entries: &[AllocationEntry],
    config: &IntegrityConfig,
) -> Vec<DataIntegrityError> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut issues: Vec<DataIntegrityError> = entries
        .iter()
        .filter(|entry| entry.weight < 0.0)
        .map(|entry| DataIntegrityError::NegativeAllocation {
            name: entry.name.clone(),
            weight: entry.weight,
        })
        .collect();

    let total: f64 = entries.iter().map(|entry| entry.weight).sum();
    if (total - 100.0).abs() > config.allocation_tolerance {
        issues.push(DataIntegrityError::AllocationTotal { total });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bar, Symbol, TradeDate};

    fn bar(date: &str, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(TradeDate::parse(date).expect("date"), open, high, low, close, 1_000).expect("bar")
    }

    fn instrument(current: f64, change: f64, bars: Vec<Bar>) -> Instrument {
        let symbol = Symbol::parse("TEST").expect("symbol");
        Instrument::new(symbol, "Test Corp", current, change, 0.0, 1_000, 1e9, bars)
            .expect("instrument")
    }

    #[test]
    fn consistent_instrument_has_no_issues() {
        let bars = vec![
            bar("2024-01-01", 10.0, 11.0, 9.5, 10.5),
            bar("2024-01-02", 10.5, 12.0, 10.0, 11.5),
        ];
        let issues = audit_instrument(&instrument(11.5, 1.0, bars), &IntegrityConfig::default());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn flags_price_and_change_mismatch() {
        let bars = vec![
            bar("2024-01-01", 10.0, 11.0, 9.5, 10.5),
            bar("2024-01-02", 10.5, 12.0, 10.0, 11.5),
        ];
        let issues = audit_instrument(&instrument(11.0, 2.0, bars), &IntegrityConfig::default());

        assert!(matches!(issues[0], DataIntegrityError::CurrentPriceMismatch { .. }));
        assert!(matches!(issues[1], DataIntegrityError::ChangeMismatch { .. }));
        assert!(issues.iter().all(|issue| !issue.is_structural()));
    }

    #[test]
    fn flags_structural_bar_problems() {
        let bars = vec![
            bar("2024-01-02", 10.0, 11.0, 9.5, 10.5),
            bar("2024-01-01", 10.5, 9.0, 10.0, 9.5),
        ];
        let issues = audit_instrument(&instrument(9.5, -1.0, bars), &IntegrityConfig::default());

        assert!(issues.contains(&DataIntegrityError::UnorderedBars {
            symbol: Symbol::parse("TEST").expect("symbol"),
            index: 1,
        }));
        assert!(issues
            .iter()
            .any(|issue| matches!(issue, DataIntegrityError::InvalidBarRange { index: 1, .. })));
    }

    #[test]
    fn duplicate_symbols_are_reported_once_per_repeat() {
        let one = instrument(10.5, 0.0, vec![bar("2024-01-01", 10.0, 11.0, 9.5, 10.5)]);
        let issues = audit_instruments(&[one.clone(), one], &IntegrityConfig::default());
        assert_eq!(
            issues
                .iter()
                .filter(|issue| matches!(issue, DataIntegrityError::DuplicateSymbol { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn allocation_must_sum_to_one_hundred() {
        let entries = vec![
            AllocationEntry::new("Technology", 60.0).expect("entry"),
            AllocationEntry::new("Energy", -5.0).expect("entry"),
        ];
        let issues = audit_allocation(&entries, &IntegrityConfig::default());

        assert!(matches!(issues[0], DataIntegrityError::NegativeAllocation { .. }));
        assert_eq!(issues[1], DataIntegrityError::AllocationTotal { total: 55.0 });
    }
}
