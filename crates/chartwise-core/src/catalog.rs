//! Instrument catalog.
//!
//! An immutable, insertion-ordered map from [`Symbol`] to [`Instrument`],
//! built once from whatever the data source supplies and shared read-only
//! (usually behind an `Arc`) by every computation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::integrity::{audit_allocation, audit_instruments};
use crate::{
    AllocationEntry, CoreError, DataIntegrityError, Instrument, IntegrityConfig, IntegrityMode,
    Symbol,
};

/// Wire shape accepted from a data-source collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub allocation: Vec<AllocationEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    instruments: Vec<Instrument>,
    index: HashMap<Symbol, usize>,
    allocation: Vec<AllocationEntry>,
    issues: Vec<DataIntegrityError>,
}

impl Catalog {
    /// Assemble a catalog, auditing it against `config`.
    ///
    /// Structural issues always fail. Other issues fail in
    /// [`IntegrityMode::Strict`] and are retained as [`Catalog::issues`] in
    /// [`IntegrityMode::Audit`].
    pub fn new(
        instruments: Vec<Instrument>,
        allocation: Vec<AllocationEntry>,
        config: &IntegrityConfig,
    ) -> Result<Self, CoreError> {
        let mut issues = audit_instruments(&instruments, config);
        issues.extend(audit_allocation(&allocation, config));

        let rejected = issues
            .iter()
            .find(|issue| issue.is_structural() || config.mode == IntegrityMode::Strict);
        if let Some(issue) = rejected {
            tracing::warn!(%issue, "catalog rejected");
            return Err(issue.clone().into());
        }

        for issue in &issues {
            tracing::warn!(%issue, "catalog integrity issue");
        }

        let index = instruments
            .iter()
            .enumerate()
            .map(|(position, instrument)| (instrument.symbol.clone(), position))
            .collect();

        tracing::debug!(
            instruments = instruments.len(),
            issues = issues.len(),
            "catalog assembled"
        );

        Ok(Self {
            instruments,
            index,
            allocation,
            issues,
        })
    }

    pub fn from_document(
        document: CatalogDocument,
        config: &IntegrityConfig,
    ) -> Result<Self, CoreError> {
        Self::new(document.instruments, document.allocation, config)
    }

    pub fn from_json_str(input: &str, config: &IntegrityConfig) -> Result<Self, CoreError> {
        let document: CatalogDocument = serde_json::from_str(input)?;
        Self::from_document(document, config)
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&Instrument> {
        self.index
            .get(symbol)
            .and_then(|position| self.instruments.get(*position))
    }

    /// Like [`Catalog::get`], but reports an absent symbol as
    /// [`CoreError::UnknownInstrument`].
    pub fn require(&self, symbol: &Symbol) -> Result<&Instrument, CoreError> {
        self.get(symbol).ok_or_else(|| CoreError::UnknownInstrument {
            symbol: symbol.clone(),
        })
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn first(&self) -> Option<&Instrument> {
        self.instruments.first()
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.instruments.iter().map(|instrument| &instrument.symbol)
    }

    pub fn allocation(&self) -> &[AllocationEntry] {
        &self.allocation
    }

    /// Non-structural integrity issues tolerated in audit mode.
    pub fn issues(&self) -> &[DataIntegrityError] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
