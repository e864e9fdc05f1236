//! Chart-ready projections of raw history.
//!
//! All builders are pure and total: an empty input produces an empty output
//! and every output has one point per input bar. Scaling is plain
//! floating-point division; rounding is left to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AllocationEntry, Bar, Catalog, Instrument, Symbol, Timeframe, TradeDate};

/// Shares per "M" on volume axes.
pub const VOLUME_SCALE: f64 = 1_000_000.0;
/// Dollars per "T" on market-cap labels.
pub const MARKET_CAP_SCALE: f64 = 1_000_000_000_000.0;

pub fn volume_in_millions(volume: u64) -> f64 {
    volume as f64 / VOLUME_SCALE
}

pub fn market_cap_in_trillions(market_cap: f64) -> f64 {
    market_cap / MARKET_CAP_SCALE
}

/// Percent move from `from` to `to`, or 0 when `from` is not positive.
///
/// The difference is scaled before dividing so whole-percent moves such as
/// 100 -> 102 come out exactly 2.0 and classify on the right side of a
/// threshold.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) * 100.0 / from
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradeDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: TradeDate,
    pub volume_millions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPoint {
    pub date: TradeDate,
    pub volume_millions: f64,
    pub price: f64,
}

/// OHLC glyph: the wick spans low..high, the body spans open..close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub body_low: f64,
    pub body_high: f64,
    pub bullish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationShare {
    pub name: String,
    pub weight: f64,
    /// Weight as a percentage of the summed weights.
    pub share_percent: f64,
}

/// One date of the multi-instrument performance chart. Each value is the
/// cumulative percent change from that instrument's first close in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub date: TradeDate,
    pub values: BTreeMap<Symbol, f64>,
}

/// Summary tile for one instrument in the comparative section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCard {
    pub symbol: Symbol,
    pub name: String,
    pub current: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume_millions: f64,
    pub market_cap_trillions: f64,
    pub selected: bool,
}

pub fn build_price_series(bars: &[Bar]) -> Vec<PricePoint> {
    bars.iter()
        .map(|bar| PricePoint {
            date: bar.date,
            price: bar.close,
        })
        .collect()
}

pub fn build_volume_series(bars: &[Bar]) -> Vec<VolumePoint> {
    bars.iter()
        .map(|bar| VolumePoint {
            date: bar.date,
            volume_millions: volume_in_millions(bar.volume),
        })
        .collect()
}

pub fn build_correlation_pairs(bars: &[Bar]) -> Vec<CorrelationPoint> {
    bars.iter()
        .map(|bar| CorrelationPoint {
            date: bar.date,
            volume_millions: volume_in_millions(bar.volume),
            price: bar.close,
        })
        .collect()
}

pub fn build_candles(bars: &[Bar]) -> Vec<CandlePoint> {
    bars.iter()
        .map(|bar| CandlePoint {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            body_low: bar.open.min(bar.close),
            body_high: bar.open.max(bar.close),
            bullish: bar.is_bullish(),
        })
        .collect()
}

pub fn allocation_shares(entries: &[AllocationEntry]) -> Vec<AllocationShare> {
    let total: f64 = entries.iter().map(|entry| entry.weight).sum();
    entries
        .iter()
        .map(|entry| AllocationShare {
            name: entry.name.clone(),
            weight: entry.weight,
            share_percent: if total > 0.0 {
                entry.weight / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Date-aligned cumulative performance of every instrument over `timeframe`.
/// Instruments without bars, or whose first close is zero, are left out.
pub fn build_comparison(catalog: &Catalog, timeframe: Timeframe) -> Vec<ComparisonRow> {
    let mut rows: BTreeMap<TradeDate, BTreeMap<Symbol, f64>> = BTreeMap::new();

    for instrument in catalog.instruments() {
        let window = timeframe.window(&instrument.bars);
        let Some(base) = window.first().map(|bar| bar.close).filter(|close| *close > 0.0) else {
            continue;
        };
        for bar in window {
            rows.entry(bar.date)
                .or_default()
                .insert(instrument.symbol.clone(), percent_change(base, bar.close));
        }
    }

    rows.into_iter()
        .map(|(date, values)| ComparisonRow { date, values })
        .collect()
}

pub fn instrument_cards(catalog: &Catalog, selected: &Symbol) -> Vec<InstrumentCard> {
    catalog
        .instruments()
        .iter()
        .map(|instrument| card(instrument, &instrument.symbol == selected))
        .collect()
}

fn card(instrument: &Instrument, selected: bool) -> InstrumentCard {
    InstrumentCard {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        current: instrument.current,
        change: instrument.change,
        change_percent: instrument.change_percent,
        volume_millions: volume_in_millions(instrument.volume),
        market_cap_trillions: market_cap_in_trillions(instrument.market_cap),
        selected,
    }
}

/// Every per-instrument series the dashboard can chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub price: Vec<PricePoint>,
    pub volume: Vec<VolumePoint>,
    pub correlation: Vec<CorrelationPoint>,
    pub candles: Vec<CandlePoint>,
}

impl DerivedSeries {
    pub fn build(bars: &[Bar]) -> Self {
        Self {
            price: build_price_series(bars),
            volume: build_volume_series(bars),
            correlation: build_correlation_pairs(bars),
            candles: build_candles(bars),
        }
    }
}
