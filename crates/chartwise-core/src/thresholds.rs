//! Ordered threshold tables.
//!
//! Every categorical label in the engine comes from a table of
//! `(bound, class)` rules evaluated top to bottom; the first bound the value
//! satisfies wins and a fallback class catches everything else. Bounds must
//! be strictly descending so that each rule covers a contiguous band.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Lower edge of a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Bound {
    /// `value > edge`
    Above(f64),
    /// `value >= edge`
    AtLeast(f64),
}

impl Bound {
    pub fn edge(self) -> f64 {
        match self {
            Self::Above(edge) | Self::AtLeast(edge) => edge,
        }
    }

    pub fn admits(self, value: f64) -> bool {
        match self {
            Self::Above(edge) => value > edge,
            Self::AtLeast(edge) => value >= edge,
        }
    }
}

/// First-match-wins classification table.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable<C> {
    name: &'static str,
    rules: Vec<(Bound, C)>,
    fallback: C,
}

impl<C: Copy> ThresholdTable<C> {
    pub fn new(
        name: &'static str,
        rules: Vec<(Bound, C)>,
        fallback: C,
    ) -> Result<Self, ValidationError> {
        let ordered = rules
            .iter()
            .all(|(bound, _)| bound.edge().is_finite())
            && rules
                .windows(2)
                .all(|pair| pair[0].0.edge() > pair[1].0.edge());
        if !ordered {
            return Err(ValidationError::UnorderedThresholds { table: name });
        }

        Ok(Self {
            name,
            rules,
            fallback,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Class for `value`. NaN never satisfies a bound and lands in the fallback.
    pub fn classify(&self, value: f64) -> C {
        let class = self
            .rules
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map_or(self.fallback, |(_, class)| *class);
        tracing::trace!(table = self.name, value, "classified");
        class
    }
}
