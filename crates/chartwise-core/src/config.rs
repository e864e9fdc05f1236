use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Timeframe, ValidationError, ViewMode};

/// Runtime configuration for the dashboard engine.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub thresholds: ThresholdConfig,
    pub integrity: IntegrityConfig,
    pub change_basis: ChangeBasis,
    pub default_timeframe: Timeframe,
    pub default_view_mode: ViewMode,
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks tolerances and that every threshold table can be built.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.integrity.validate()?;
        crate::analytics::AnalyticsRules::from_config(&self.thresholds)?;
        crate::narrative::NarrativeRules::from_config(&self.thresholds)?;
        Ok(())
    }
}

/// Which percent change drives cross-instrument standing, risk, opportunity
/// and outlook labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeBasis {
    /// The feed's reported session change.
    #[default]
    Session,
    /// Net change across the analyzed window.
    Window,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityMode {
    /// Any integrity issue rejects the catalog.
    Strict,
    /// Issues are logged and carried as envelope warnings.
    #[default]
    Audit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrityConfig {
    pub mode: IntegrityMode,
    /// Allowed absolute gap between `current` and the last close, and between
    /// the reported change and the change implied by the last two closes.
    pub price_tolerance: f64,
    /// Allowed gap, in percentage points, between the allocation total and 100.
    pub allocation_tolerance: f64,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            mode: IntegrityMode::Audit,
            price_tolerance: 0.01,
            allocation_tolerance: 0.5,
        }
    }
}

impl IntegrityConfig {
    pub fn strict() -> Self {
        Self {
            mode: IntegrityMode::Strict,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("price_tolerance", self.price_tolerance),
            ("allocation_tolerance", self.allocation_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidTolerance { field });
            }
        }
        Ok(())
    }
}

/// Numeric edges of every classification table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub momentum: MomentumThresholds,
    pub volume_ratio: VolumeRatioThresholds,
    pub highly_liquid_above: f64,
    pub market_cap: MarketCapThresholds,
    pub participation: ParticipationThresholds,
    /// Half-width, in percentage points, of the "in line" band around the
    /// catalog mean.
    pub relative_band: f64,
    pub risk: RiskThresholds,
    pub opportunity: OpportunityThresholds,
    pub short_term_volume_above: f64,
    pub outlook: OutlookThresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            momentum: MomentumThresholds::default(),
            volume_ratio: VolumeRatioThresholds::default(),
            highly_liquid_above: 50_000_000.0,
            market_cap: MarketCapThresholds::default(),
            participation: ParticipationThresholds::default(),
            relative_band: 1.0,
            risk: RiskThresholds::default(),
            opportunity: OpportunityThresholds::default(),
            short_term_volume_above: 60_000_000.0,
            outlook: OutlookThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MomentumThresholds {
    pub strong_bullish_above: f64,
    pub mild_bullish_above: f64,
    pub mild_bearish_at_least: f64,
}

impl Default for MomentumThresholds {
    fn default() -> Self {
        Self {
            strong_bullish_above: 2.0,
            mild_bullish_above: 0.0,
            mild_bearish_at_least: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VolumeRatioThresholds {
    pub exceptional_above: f64,
    pub above_average_above: f64,
    pub normal_at_least: f64,
}

impl Default for VolumeRatioThresholds {
    fn default() -> Self {
        Self {
            exceptional_above: 1.5,
            above_average_above: 1.2,
            normal_at_least: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketCapThresholds {
    pub mega_cap_above: f64,
    pub large_cap_above: f64,
}

impl Default for MarketCapThresholds {
    fn default() -> Self {
        Self {
            mega_cap_above: 2_000_000_000_000.0,
            large_cap_above: 1_000_000_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticipationThresholds {
    pub exceptional_above: f64,
    pub above_average_above: f64,
}

impl Default for ParticipationThresholds {
    fn default() -> Self {
        Self {
            exceptional_above: 70_000_000.0,
            above_average_above: 40_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskThresholds {
    pub high_volume_above: f64,
    pub moderate_high_move_above: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_volume_above: 80_000_000.0,
            moderate_high_move_above: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpportunityThresholds {
    pub momentum_play_above: f64,
    /// Changes strictly below this edge are value plays.
    pub value_play_below: f64,
}

impl Default for OpportunityThresholds {
    fn default() -> Self {
        Self {
            momentum_play_above: 2.0,
            value_play_below: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlookThresholds {
    pub strong_momentum_above: f64,
    pub uptrend_above: f64,
}

impl Default for OutlookThresholds {
    fn default() -> Self {
        Self {
            strong_momentum_above: 2.0,
            uptrend_above: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_dashboard_rules() {
        let config = DashboardConfig::default();

        assert_eq!(config.thresholds.momentum.strong_bullish_above, 2.0);
        assert_eq!(config.thresholds.volume_ratio.normal_at_least, 0.8);
        assert_eq!(config.thresholds.highly_liquid_above, 50_000_000.0);
        assert_eq!(config.integrity.mode, IntegrityMode::Audit);
        assert_eq!(config.change_basis, ChangeBasis::Session);
        assert_eq!(config.default_timeframe, Timeframe::OneMonth);
        assert_eq!(config.default_view_mode, ViewMode::Price);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = DashboardConfig::from_json_str(
            r#"{
                "change_basis": "window",
                "default_timeframe": "1Y",
                "thresholds": { "relative_band": 0.5 }
            }"#,
        )
        .expect("config should parse");

        assert_eq!(config.change_basis, ChangeBasis::Window);
        assert_eq!(config.default_timeframe, Timeframe::OneYear);
        assert_eq!(config.thresholds.relative_band, 0.5);
        assert_eq!(config.thresholds.risk.high_volume_above, 80_000_000.0);
    }

    #[test]
    fn rejects_unordered_momentum_edges() {
        let err = DashboardConfig::from_json_str(
            r#"{ "thresholds": { "momentum": { "mild_bullish_above": 3.0 } } }"#,
        )
        .expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnorderedThresholds { table: "momentum" })
        ));
    }

    #[test]
    fn rejects_unknown_keys_and_negative_tolerance() {
        let err = DashboardConfig::from_json_str(r#"{ "colour": "blue" }"#).expect_err("must fail");
        assert!(matches!(err, CoreError::Serialization(_)));

        let err = DashboardConfig::from_json_str(r#"{ "integrity": { "price_tolerance": -1 } }"#)
            .expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidTolerance { field: "price_tolerance" })
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "integrity": {{ "mode": "strict" }} }}"#).expect("write config");

        let config = DashboardConfig::from_path(file.path()).expect("config should load");
        assert_eq!(config.integrity.mode, IntegrityMode::Strict);
        assert_eq!(config.integrity.price_tolerance, 0.01);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err =
            DashboardConfig::from_path(dir.path().join("absent.json")).expect_err("must fail");
        assert!(matches!(err, CoreError::Io(_)));
    }
}
