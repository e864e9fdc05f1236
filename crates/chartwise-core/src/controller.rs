//! Selection state and the frames computed from it.
//!
//! [`ViewStateController`] is the only mutable entry point of the crate. It
//! owns one [`ViewState`] record and a shared, read-only [`Catalog`]; every
//! successful selection change advances the epoch by one. Frames are
//! recomputed on each read and never cached.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, AnalyticsSnapshot};
use crate::envelope::{Envelope, EnvelopeError, EnvelopeMeta};
use crate::narrative::{Narrative, Narrator};
use crate::series::{
    allocation_shares, build_comparison, instrument_cards, AllocationShare, ComparisonRow,
    CorrelationPoint, DerivedSeries, InstrumentCard, PricePoint, VolumePoint,
};
use crate::{Catalog, CoreError, DashboardConfig, Symbol, Timeframe, ViewMode};

/// Opaque invalidation token handed to the rendering layer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    pub const fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub view_mode: ViewMode,
    pub epoch: Epoch,
}

/// Series the chart area draws for the active [`ViewMode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "points", rename_all = "snake_case")]
pub enum PrimarySeries {
    Price(Vec<PricePoint>),
    Volume(Vec<VolumePoint>),
    Correlation(Vec<CorrelationPoint>),
}

impl PrimarySeries {
    fn select(view_mode: ViewMode, series: &DerivedSeries) -> Self {
        match view_mode {
            ViewMode::Price => Self::Price(series.price.clone()),
            ViewMode::Volume => Self::Volume(series.volume.clone()),
            ViewMode::Correlation => Self::Correlation(series.correlation.clone()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Price(points) => points.len(),
            Self::Volume(points) => points.len(),
            Self::Correlation(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the rendering layer needs for one epoch. All fields are
/// computed against the same catalog and the same state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFrame {
    pub state: ViewState,
    pub snapshot: AnalyticsSnapshot,
    pub series: DerivedSeries,
    pub primary: PrimarySeries,
    pub narrative: Narrative,
    pub cards: Vec<InstrumentCard>,
    pub comparison: Vec<ComparisonRow>,
    pub allocation: Vec<AllocationShare>,
}

#[derive(Debug, Clone)]
pub struct ViewStateController {
    catalog: Arc<Catalog>,
    state: ViewState,
    engine: AnalyticsEngine,
    narrator: Narrator,
}

impl ViewStateController {
    /// Starts on the first catalog entry with the configured default
    /// timeframe and view mode at epoch 0.
    pub fn new(catalog: Arc<Catalog>, config: &DashboardConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let symbol = catalog
            .first()
            .map(|instrument| instrument.symbol.clone())
            .ok_or(CoreError::EmptyCatalog)?;

        let state = ViewState {
            symbol,
            timeframe: config.default_timeframe,
            view_mode: config.default_view_mode,
            epoch: Epoch::default(),
        };
        tracing::debug!(
            symbol = %state.symbol,
            timeframe = %state.timeframe,
            "view state initialized"
        );

        Ok(Self {
            catalog,
            state,
            engine: AnalyticsEngine::from_config(config)?,
            narrator: Narrator::from_config(config)?,
        })
    }

    pub fn with_defaults(catalog: Arc<Catalog>) -> Result<Self, CoreError> {
        Self::new(catalog, &DashboardConfig::default())
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn select_instrument(&mut self, symbol: &Symbol) -> Result<Epoch, CoreError> {
        if !self.catalog.contains(symbol) {
            tracing::warn!(
                %symbol,
                epoch = %self.state.epoch,
                "selection rejected: unknown instrument"
            );
            return Err(CoreError::UnknownInstrument {
                symbol: symbol.clone(),
            });
        }

        self.state.symbol = symbol.clone();
        Ok(self.advance("instrument"))
    }

    pub fn select_timeframe(&mut self, timeframe: Timeframe) -> Epoch {
        self.state.timeframe = timeframe;
        self.advance("timeframe")
    }

    pub fn select_view_mode(&mut self, view_mode: ViewMode) -> Epoch {
        self.state.view_mode = view_mode;
        self.advance("view_mode")
    }

    pub fn refresh(&mut self) -> Epoch {
        self.advance("refresh")
    }

    /// Swaps in a new catalog as one unit and advances the epoch. Fails with
    /// [`CoreError::UnknownInstrument`] when the current selection is not in
    /// `catalog`; the old catalog then stays in place.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) -> Result<Epoch, CoreError> {
        if !catalog.contains(&self.state.symbol) {
            tracing::warn!(symbol = %self.state.symbol, "catalog replacement rejected");
            return Err(CoreError::UnknownInstrument {
                symbol: self.state.symbol.clone(),
            });
        }

        self.catalog = catalog;
        Ok(self.advance("catalog"))
    }

    /// Analytics, series and narrative for the current selection.
    pub fn frame(&self) -> Result<DashboardFrame, CoreError> {
        let catalog = Arc::clone(&self.catalog);
        let state = self.state.clone();
        let instrument = catalog.require(&state.symbol)?;

        let snapshot = self
            .engine
            .analyze_window(instrument, &catalog, state.timeframe)?;
        let series = DerivedSeries::build(state.timeframe.window(&instrument.bars));
        let primary = PrimarySeries::select(state.view_mode, &series);
        let narrative = self.narrator.narrate(&snapshot);

        tracing::debug!(
            symbol = %state.symbol,
            epoch = %state.epoch,
            mode = %state.view_mode,
            points = primary.len(),
            "frame computed"
        );

        Ok(DashboardFrame {
            cards: instrument_cards(&catalog, &state.symbol),
            comparison: build_comparison(&catalog, state.timeframe),
            allocation: allocation_shares(catalog.allocation()),
            state,
            snapshot,
            series,
            primary,
            narrative,
        })
    }

    /// [`Self::frame`] wrapped in an envelope carrying the epoch and the
    /// catalog's audit warnings.
    pub fn publish(&self) -> Result<Envelope<DashboardFrame>, CoreError> {
        let frame = self.frame()?;
        let meta = EnvelopeMeta::generate(self.state.epoch).with_catalog_warnings(&self.catalog);
        Ok(Envelope::success(meta, frame))
    }

    /// Snapshots for every instrument in the current timeframe. Instruments
    /// that cannot be analyzed are reported as envelope errors.
    pub fn overview(&self) -> Envelope<Vec<AnalyticsSnapshot>> {
        let meta = EnvelopeMeta::generate(self.state.epoch).with_catalog_warnings(&self.catalog);
        let mut envelope = Envelope::success(meta, Vec::with_capacity(self.catalog.len()));

        for (symbol, result) in self.engine.analyze_all(&self.catalog, self.state.timeframe) {
            match result {
                Ok(snapshot) => envelope.data.push(snapshot),
                Err(err) => {
                    tracing::warn!(%symbol, error = %err, "instrument skipped in overview");
                    envelope.push_error(EnvelopeError::from_core(&err).with_symbol(symbol));
                }
            }
        }

        envelope
    }

    fn advance(&mut self, cause: &'static str) -> Epoch {
        self.state.epoch = self.state.epoch.next();
        tracing::debug!(
            cause,
            symbol = %self.state.symbol,
            timeframe = %self.state.timeframe,
            mode = %self.state.view_mode,
            epoch = %self.state.epoch,
            "view state advanced"
        );
        self.state.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{sample_catalog, sample_document};
    use crate::{IntegrityConfig, RelativeStanding};

    fn controller() -> ViewStateController {
        let catalog = Arc::new(sample_catalog().expect("sample catalog"));
        ViewStateController::with_defaults(catalog).expect("controller")
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("symbol")
    }

    #[test]
    fn starts_on_first_instrument_with_defaults() {
        let controller = controller();
        let state = controller.state();
        assert_eq!(state.symbol.as_str(), "AAPL");
        assert_eq!(state.timeframe, Timeframe::OneMonth);
        assert_eq!(state.view_mode, ViewMode::Price);
        assert_eq!(state.epoch.value(), 0);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let catalog = Catalog::new(Vec::new(), Vec::new(), &IntegrityConfig::default())
            .expect("empty catalog is structurally valid");
        let err = ViewStateController::with_defaults(Arc::new(catalog)).expect_err("must fail");
        assert!(matches!(err, CoreError::EmptyCatalog));
    }

    #[test]
    fn every_mutation_advances_epoch_by_one() {
        let mut controller = controller();
        assert_eq!(controller.select_instrument(&symbol("TSLA")).expect("select").value(), 1);
        assert_eq!(controller.select_timeframe(Timeframe::OneWeek).value(), 2);
        assert_eq!(controller.select_view_mode(ViewMode::Volume).value(), 3);
        assert_eq!(controller.refresh().value(), 4);

        let state = controller.state();
        assert_eq!(state.symbol.as_str(), "TSLA");
        assert_eq!(state.timeframe, Timeframe::OneWeek);
        assert_eq!(state.view_mode, ViewMode::Volume);
    }

    #[test]
    fn unknown_symbol_leaves_state_untouched() {
        let mut controller = controller();
        controller.select_view_mode(ViewMode::Correlation);
        let before = controller.state().clone();

        let err = controller
            .select_instrument(&symbol("NFLX"))
            .expect_err("must fail");
        assert!(matches!(err, CoreError::UnknownInstrument { .. }));
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn frame_follows_view_mode() {
        let mut controller = controller();
        let frame = controller.frame().expect("frame");
        assert!(matches!(frame.primary, PrimarySeries::Price(ref points) if points.len() == 5));
        assert_eq!(frame.cards.len(), 3);
        assert_eq!(frame.allocation.len(), 5);

        controller.select_view_mode(ViewMode::Correlation);
        let frame = controller.frame().expect("frame");
        assert!(matches!(frame.primary, PrimarySeries::Correlation(_)));
        assert_eq!(frame.state.epoch.value(), 1);
    }

    #[test]
    fn frame_narrates_the_selected_instrument() {
        let mut controller = controller();
        controller.select_instrument(&symbol("TSLA")).expect("select");

        let frame = controller.frame().expect("frame");
        assert_eq!(frame.snapshot.symbol.as_str(), "TSLA");
        assert_eq!(frame.snapshot.relative.standing, RelativeStanding::Outperforming);
        assert!(frame.cards.iter().any(|card| card.selected && card.symbol.as_str() == "TSLA"));
    }

    #[test]
    fn replace_catalog_requires_current_selection() {
        let mut controller = controller();
        let mut document = sample_document().expect("sample document");
        document.instruments.remove(0);
        let without_aapl = Arc::new(
            Catalog::from_document(document, &IntegrityConfig::default()).expect("catalog"),
        );

        let err = controller
            .replace_catalog(Arc::clone(&without_aapl))
            .expect_err("must fail");
        assert!(matches!(err, CoreError::UnknownInstrument { .. }));
        assert_eq!(controller.catalog().len(), 3);
        assert_eq!(controller.state().epoch.value(), 0);

        controller.select_instrument(&symbol("GOOGL")).expect("select");
        let epoch = controller.replace_catalog(without_aapl).expect("replace");
        assert_eq!(epoch.value(), 2);
        assert_eq!(controller.catalog().len(), 2);
    }

    #[test]
    fn overview_reports_failures_per_instrument() {
        let mut document = sample_document().expect("sample document");
        document.instruments[2].bars.clear();
        let catalog =
            Catalog::from_document(document, &IntegrityConfig::default()).expect("catalog");
        let controller = ViewStateController::with_defaults(Arc::new(catalog)).expect("controller");

        let envelope = controller.overview();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].code, "empty_history");
        assert_eq!(envelope.errors[0].symbol.as_ref().map(Symbol::as_str), Some("TSLA"));
    }

    #[test]
    fn publish_carries_epoch_and_audit_warnings() {
        let mut controller = controller();
        controller.refresh();

        let envelope = controller.publish().expect("envelope");
        assert_eq!(envelope.meta.epoch.value(), 1);
        assert!(!envelope.meta.warnings.is_empty());
        assert_eq!(envelope.data.state.epoch.value(), 1);
    }
}
