//! Descriptive analytics for one instrument.
//!
//! A snapshot is computed fresh from an instrument's bars and the catalog it
//! belongs to. Nothing is cached; identical inputs always produce identical
//! snapshots, and the catalog mean used for relative standing does not depend
//! on iteration order.

use serde::{Deserialize, Serialize};

use crate::series::{market_cap_in_trillions, percent_change, volume_in_millions};
use crate::thresholds::{Bound, ThresholdTable};
use crate::{
    Bar, Catalog, ChangeBasis, CoreError, DashboardConfig, Instrument, Symbol, ThresholdConfig,
    Timeframe, TradeDate, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trend {
    Upward,
    Downward,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upward => "upward",
            Self::Downward => "downward",
        }
    }
}

/// Current price relative to the window's mean close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Above,
    Below,
}

impl Position {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Momentum {
    StrongBullish,
    MildBullish,
    MildBearish,
    StrongBearish,
}

impl Momentum {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBullish => "strong-bullish",
            Self::MildBullish => "mild-bullish",
            Self::MildBearish => "mild-bearish",
            Self::StrongBearish => "strong-bearish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeClass {
    Exceptional,
    AboveAverage,
    Normal,
    BelowAverage,
}

impl VolumeClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exceptional => "exceptional",
            Self::AboveAverage => "above-average",
            Self::Normal => "normal",
            Self::BelowAverage => "below-average",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Liquidity {
    HighlyLiquid,
    ModeratelyLiquid,
}

impl Liquidity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighlyLiquid => "highly-liquid",
            Self::ModeratelyLiquid => "moderately-liquid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketCapTier {
    MegaCap,
    LargeCap,
    MidToLargeCap,
}

impl MarketCapTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MegaCap => "mega-cap",
            Self::LargeCap => "large-cap",
            Self::MidToLargeCap => "mid-to-large-cap",
        }
    }
}

/// Absolute session-volume tier used by the market story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Participation {
    Exceptional,
    AboveAverage,
    Steady,
}

impl Participation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exceptional => "exceptional",
            Self::AboveAverage => "above-average",
            Self::Steady => "steady",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeStanding {
    Outperforming,
    InLine,
    Underperforming,
}

impl RelativeStanding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outperforming => "outperforming",
            Self::InLine => "in-line",
            Self::Underperforming => "underperforming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativePerformance {
    /// Mean percent change across every instrument that contributed.
    pub catalog_mean: f64,
    /// Selected percent change minus `catalog_mean`.
    pub delta: f64,
    pub standing: RelativeStanding,
    pub peers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub symbol: Symbol,
    pub name: String,
    pub window_start: TradeDate,
    pub window_end: TradeDate,
    pub bar_count: usize,

    pub first_close: f64,
    pub last_close: f64,
    pub net_change_percent: f64,
    pub trend: Trend,

    pub min_close: f64,
    pub max_close: f64,
    pub mean_close: f64,
    pub volatility_range: f64,
    pub volatility_percent: f64,

    pub current_price: f64,
    pub position: Position,
    pub momentum: Momentum,

    pub current_volume: u64,
    pub current_volume_millions: f64,
    pub average_volume: f64,
    pub volume_ratio: f64,
    pub volume_class: VolumeClass,
    pub liquidity: Liquidity,
    pub participation: Participation,

    pub market_cap: f64,
    pub market_cap_trillions: f64,
    pub market_cap_tier: MarketCapTier,

    pub session_change: f64,
    pub session_change_percent: f64,
    pub change_basis: ChangeBasis,
    /// Percent change selected by `change_basis`; drives relative standing
    /// and the risk, opportunity and outlook labels.
    pub reference_change_percent: f64,
    pub relative: RelativePerformance,
}

/// Classification tables used by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRules {
    pub momentum: ThresholdTable<Momentum>,
    pub volume_ratio: ThresholdTable<VolumeClass>,
    pub liquidity: ThresholdTable<Liquidity>,
    pub market_cap: ThresholdTable<MarketCapTier>,
    pub participation: ThresholdTable<Participation>,
    pub relative: ThresholdTable<RelativeStanding>,
}

impl AnalyticsRules {
    pub fn from_config(config: &ThresholdConfig) -> Result<Self, ValidationError> {
        let momentum = &config.momentum;
        let ratio = &config.volume_ratio;
        let cap = &config.market_cap;
        let participation = &config.participation;

        Ok(Self {
            momentum: ThresholdTable::new(
                "momentum",
                vec![
                    (Bound::Above(momentum.strong_bullish_above), Momentum::StrongBullish),
                    (Bound::Above(momentum.mild_bullish_above), Momentum::MildBullish),
                    (Bound::AtLeast(momentum.mild_bearish_at_least), Momentum::MildBearish),
                ],
                Momentum::StrongBearish,
            )?,
            volume_ratio: ThresholdTable::new(
                "volume_ratio",
                vec![
                    (Bound::Above(ratio.exceptional_above), VolumeClass::Exceptional),
                    (Bound::Above(ratio.above_average_above), VolumeClass::AboveAverage),
                    (Bound::AtLeast(ratio.normal_at_least), VolumeClass::Normal),
                ],
                VolumeClass::BelowAverage,
            )?,
            liquidity: ThresholdTable::new(
                "liquidity",
                vec![(Bound::Above(config.highly_liquid_above), Liquidity::HighlyLiquid)],
                Liquidity::ModeratelyLiquid,
            )?,
            market_cap: ThresholdTable::new(
                "market_cap",
                vec![
                    (Bound::Above(cap.mega_cap_above), MarketCapTier::MegaCap),
                    (Bound::Above(cap.large_cap_above), MarketCapTier::LargeCap),
                ],
                MarketCapTier::MidToLargeCap,
            )?,
            participation: ThresholdTable::new(
                "participation",
                vec![
                    (Bound::Above(participation.exceptional_above), Participation::Exceptional),
                    (Bound::Above(participation.above_average_above), Participation::AboveAverage),
                ],
                Participation::Steady,
            )?,
            relative: ThresholdTable::new(
                "relative",
                vec![
                    (Bound::Above(config.relative_band), RelativeStanding::Outperforming),
                    (Bound::AtLeast(-config.relative_band), RelativeStanding::InLine),
                ],
                RelativeStanding::Underperforming,
            )?,
        })
    }
}

impl Default for AnalyticsRules {
    fn default() -> Self {
        Self::from_config(&ThresholdConfig::default()).expect("default thresholds are ordered")
    }
}

/// Close and volume statistics over a non-empty window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowStats {
    first_close: f64,
    last_close: f64,
    min_close: f64,
    max_close: f64,
    mean_close: f64,
    mean_volume: f64,
}

impl WindowStats {
    fn compute(bars: &[Bar]) -> Option<Self> {
        let first = bars.first()?;
        let last = bars.last()?;
        let count = bars.len() as f64;

        let (min_close, max_close, close_sum, volume_sum) = bars.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0.0),
            |(min, max, closes, volumes), bar| {
                (
                    min.min(bar.close),
                    max.max(bar.close),
                    closes + bar.close,
                    volumes + bar.volume as f64,
                )
            },
        );

        Some(Self {
            first_close: first.close,
            last_close: last.close,
            min_close,
            max_close,
            mean_close: close_sum / count,
            mean_volume: volume_sum / count,
        })
    }

    fn net_change_percent(&self) -> f64 {
        percent_change(self.first_close, self.last_close)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Computes [`AnalyticsSnapshot`]s under a fixed set of rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsEngine {
    rules: AnalyticsRules,
    change_basis: ChangeBasis,
}

impl AnalyticsEngine {
    pub fn new(rules: AnalyticsRules, change_basis: ChangeBasis) -> Self {
        Self {
            rules,
            change_basis,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ValidationError> {
        Ok(Self::new(
            AnalyticsRules::from_config(&config.thresholds)?,
            config.change_basis,
        ))
    }

    pub fn rules(&self) -> &AnalyticsRules {
        &self.rules
    }

    pub fn change_basis(&self) -> ChangeBasis {
        self.change_basis
    }

    /// Snapshot over the instrument's full history.
    pub fn analyze(
        &self,
        instrument: &Instrument,
        catalog: &Catalog,
    ) -> Result<AnalyticsSnapshot, CoreError> {
        self.snapshot(instrument, &instrument.bars, catalog, None)
    }

    /// Snapshot over the trailing `timeframe` window.
    pub fn analyze_window(
        &self,
        instrument: &Instrument,
        catalog: &Catalog,
        timeframe: Timeframe,
    ) -> Result<AnalyticsSnapshot, CoreError> {
        self.snapshot(instrument, timeframe.window(&instrument.bars), catalog, Some(timeframe))
    }

    pub fn analyze_symbol(
        &self,
        symbol: &Symbol,
        catalog: &Catalog,
        timeframe: Timeframe,
    ) -> Result<AnalyticsSnapshot, CoreError> {
        let instrument = catalog.require(symbol)?;
        self.analyze_window(instrument, catalog, timeframe)
    }

    /// Snapshots for every instrument; one instrument failing does not affect
    /// the others.
    pub fn analyze_all(
        &self,
        catalog: &Catalog,
        timeframe: Timeframe,
    ) -> Vec<(Symbol, Result<AnalyticsSnapshot, CoreError>)> {
        catalog
            .instruments()
            .iter()
            .map(|instrument| {
                (
                    instrument.symbol.clone(),
                    self.analyze_window(instrument, catalog, timeframe),
                )
            })
            .collect()
    }

    fn snapshot(
        &self,
        instrument: &Instrument,
        window: &[Bar],
        catalog: &Catalog,
        timeframe: Option<Timeframe>,
    ) -> Result<AnalyticsSnapshot, CoreError> {
        let symbol = &instrument.symbol;
        if !catalog.contains(symbol) {
            return Err(CoreError::UnknownInstrument {
                symbol: symbol.clone(),
            });
        }

        let (Some(stats), Some(start), Some(end)) =
            (WindowStats::compute(window), window.first(), window.last())
        else {
            return Err(CoreError::EmptyHistory {
                symbol: symbol.clone(),
            });
        };

        let net_change_percent = stats.net_change_percent();
        let trend = if stats.last_close > stats.first_close {
            Trend::Upward
        } else {
            Trend::Downward
        };
        let volatility_range = stats.max_close - stats.min_close;
        let position = if instrument.current > stats.mean_close {
            Position::Above
        } else {
            Position::Below
        };

        let current_volume = instrument.volume as f64;
        let volume_ratio = ratio(current_volume, stats.mean_volume);

        let reference_change_percent = match self.change_basis {
            ChangeBasis::Session => instrument.change_percent,
            ChangeBasis::Window => net_change_percent,
        };
        let relative = self.relative_performance(reference_change_percent, catalog, timeframe);

        let snapshot = AnalyticsSnapshot {
            symbol: symbol.clone(),
            name: instrument.name.clone(),
            window_start: start.date,
            window_end: end.date,
            bar_count: window.len(),
            first_close: stats.first_close,
            last_close: stats.last_close,
            net_change_percent,
            trend,
            min_close: stats.min_close,
            max_close: stats.max_close,
            mean_close: stats.mean_close,
            volatility_range,
            volatility_percent: ratio(volatility_range, stats.mean_close) * 100.0,
            current_price: instrument.current,
            position,
            momentum: self.rules.momentum.classify(net_change_percent),
            current_volume: instrument.volume,
            current_volume_millions: volume_in_millions(instrument.volume),
            average_volume: stats.mean_volume,
            volume_ratio,
            volume_class: self.rules.volume_ratio.classify(volume_ratio),
            liquidity: self.rules.liquidity.classify(current_volume),
            participation: self.rules.participation.classify(current_volume),
            market_cap: instrument.market_cap,
            market_cap_trillions: market_cap_in_trillions(instrument.market_cap),
            market_cap_tier: self.rules.market_cap.classify(instrument.market_cap),
            session_change: instrument.change,
            session_change_percent: instrument.change_percent,
            change_basis: self.change_basis,
            reference_change_percent,
            relative,
        };

        tracing::debug!(
            symbol = %snapshot.symbol,
            bars = snapshot.bar_count,
            net_change = snapshot.net_change_percent,
            momentum = ?snapshot.momentum,
            standing = ?snapshot.relative.standing,
            "snapshot computed"
        );

        Ok(snapshot)
    }

    /// Standing of `selected_change` against the catalog mean under the
    /// engine's change basis. With the window basis, instruments whose window
    /// is empty do not contribute to the mean.
    fn relative_performance(
        &self,
        selected_change: f64,
        catalog: &Catalog,
        timeframe: Option<Timeframe>,
    ) -> RelativePerformance {
        let changes: Vec<f64> = catalog
            .instruments()
            .iter()
            .filter_map(|instrument| match self.change_basis {
                ChangeBasis::Session => Some(instrument.change_percent),
                ChangeBasis::Window => {
                    let window = match timeframe {
                        Some(timeframe) => timeframe.window(&instrument.bars),
                        None => &instrument.bars,
                    };
                    WindowStats::compute(window).map(|stats| stats.net_change_percent())
                }
            })
            .collect();

        let peers = changes.len();
        let catalog_mean = if peers == 0 {
            selected_change
        } else {
            changes.iter().sum::<f64>() / peers as f64
        };
        let delta = selected_change - catalog_mean;

        RelativePerformance {
            catalog_mean,
            delta,
            standing: self.rules.relative.classify(delta),
            peers,
        }
    }
}

/// Full-history snapshot under the default rules.
pub fn analyze(instrument: &Instrument, catalog: &Catalog) -> Result<AnalyticsSnapshot, CoreError> {
    AnalyticsEngine::default().analyze(instrument, catalog)
}
