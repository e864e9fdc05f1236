//! Behavior-driven tests for the narrative classifier.
//!
//! These tests verify WHICH template each theme selects and that sentences
//! interpolate the snapshot's raw numbers.

use chartwise_core::{
    analyze, narrate, AnalyticsSnapshot, Narrator, Opportunity, Outlook, RiskLevel, Theme,
    TimeHorizon,
};
use chartwise_tests::{
    consistent_instrument, sample_catalog, symbol, Catalog, DashboardConfig, IntegrityConfig,
};

fn sample_snapshot(ticker: &str) -> AnalyticsSnapshot {
    let catalog = sample_catalog().expect("catalog");
    let instrument = catalog.require(&symbol(ticker)).expect("instrument");
    analyze(instrument, &catalog).expect("snapshot")
}

fn single_snapshot(ticker: &str, closes: &[f64], volume: u64) -> AnalyticsSnapshot {
    let catalog = Catalog::new(
        vec![consistent_instrument(ticker, closes, volume)],
        Vec::new(),
        &IntegrityConfig::strict(),
    )
    .expect("catalog");
    analyze(&catalog.instruments()[0], &catalog).expect("snapshot")
}

fn label(snapshot: &AnalyticsSnapshot, theme: Theme) -> String {
    narrate(snapshot)
        .sentence(theme)
        .map(|sentence| sentence.label.clone())
        .expect("theme present")
}

// =============================================================================
// Labels
// =============================================================================

#[test]
fn when_volume_is_heavy_risk_is_high_regardless_of_movement() {
    // Given: TSLA trades 89.2M shares on a +3.51% session
    let snapshot = sample_snapshot("TSLA");

    // When: It is narrated
    let narrative = narrate(&snapshot);

    // Then: The volume gate wins and the horizon is short-term
    assert_eq!(narrative.risk, RiskLevel::High);
    assert_eq!(narrative.opportunity, Opportunity::MomentumPlay);
    assert_eq!(narrative.time_horizon, TimeHorizon::ShortTerm);
    assert_eq!(narrative.outlook, Outlook::StrongMomentum);
    assert_eq!(label(&snapshot, Theme::Risk), "high");
}

#[test]
fn when_quiet_instrument_moves_sharply_risk_is_moderate_high() {
    // Given: A thinly traded instrument up 4%
    let rally = single_snapshot("RALLY", &[100.0, 104.0], 1_000_000);
    // And: One down 4%
    let slump = single_snapshot("SLUMP", &[100.0, 96.0], 1_000_000);

    // When: Both are narrated
    let up = narrate(&rally);
    let down = narrate(&slump);

    // Then: The absolute move drives risk and the sign drives opportunity
    assert_eq!(up.risk, RiskLevel::ModerateHigh);
    assert_eq!(down.risk, RiskLevel::ModerateHigh);
    assert_eq!(up.opportunity, Opportunity::MomentumPlay);
    assert_eq!(down.opportunity, Opportunity::ValuePlay);
    assert_eq!(down.outlook, Outlook::Oversold);
    assert_eq!(down.signals[0], "Potential oversold conditions emerging");
    assert_eq!(up.time_horizon, TimeHorizon::MediumTerm);
}

#[test]
fn when_move_is_small_instrument_is_a_steady_performer() {
    // Given: AAPL's +1.28% session on 45.6M shares
    let snapshot = sample_snapshot("AAPL");

    // When: It is narrated
    let narrative = narrate(&snapshot);

    // Then: Every label sits in its calm bucket
    assert_eq!(narrative.risk, RiskLevel::Moderate);
    assert_eq!(narrative.opportunity, Opportunity::SteadyPerformer);
    assert_eq!(narrative.time_horizon, TimeHorizon::MediumTerm);
    assert_eq!(narrative.outlook, Outlook::ModestUptrend);
    assert_eq!(narrative.signals.len(), 3);
}

// =============================================================================
// Sentences
// =============================================================================

#[test]
fn when_session_declines_market_story_reports_absolute_values() {
    // Given: GOOGL's -1.87 / -1.29% session on light volume
    let snapshot = sample_snapshot("GOOGL");

    // When: It is narrated
    let narrative = narrate(&snapshot);
    let story = narrative.sentence(Theme::MarketStory).expect("story");

    // Then: The decline template carries positive magnitudes
    assert_eq!(story.label, "decline");
    assert!(story.text.contains("1.29% decline (-1.87)"), "{}", story.text);
    assert!(story.text.contains("steady, balanced trading"), "{}", story.text);
}

#[test]
fn when_narrated_every_theme_has_one_sentence_with_its_class_label() {
    // Given: The AAPL snapshot
    let snapshot = sample_snapshot("AAPL");

    // When: It is narrated
    let narrative = narrate(&snapshot);

    // Then: Each theme appears once, labeled with its category token
    assert_eq!(narrative.sentences.len(), 9);
    assert_eq!(label(&snapshot, Theme::PriceTrend), "strong-bullish");
    assert_eq!(label(&snapshot, Theme::Volume), "normal");
    assert_eq!(label(&snapshot, Theme::Liquidity), "moderately-liquid");
    assert_eq!(label(&snapshot, Theme::MarketContext), "mega-cap");
    assert_eq!(label(&snapshot, Theme::Opportunity), "steady-performer");
    assert_eq!(label(&snapshot, Theme::TimeHorizon), "medium-term");
    assert_eq!(label(&snapshot, Theme::RelativePerformance), "in-line");

    let volume = narrative.sentence(Theme::Volume).expect("volume");
    assert!(volume.text.contains("45.6M shares is 91%"), "{}", volume.text);
}

#[test]
fn when_narrative_serialized_labels_are_kebab_case_tokens() {
    // Given: A TSLA narrative
    let narrative = narrate(&sample_snapshot("TSLA"));

    // When: It is serialized
    let json = serde_json::to_value(&narrative).expect("json");

    // Then: Enumerations use kebab-case tokens
    assert_eq!(json["risk"], "high");
    assert_eq!(json["opportunity"], "momentum-play");
    assert_eq!(json["time_horizon"], "short-term");
    assert_eq!(json["sentences"][0]["theme"], "market-story");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn when_risk_threshold_loaded_from_file_narrator_applies_it() {
    // Given: A config file lowering the high-risk volume gate to 10M shares
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.json");
    std::fs::write(
        &path,
        r#"{ "thresholds": { "risk": { "high_volume_above": 10000000 } } }"#,
    )
    .expect("write config");
    let config = DashboardConfig::from_path(&path).expect("config");

    // When: AAPL is narrated with that config
    let narrator = Narrator::from_config(&config).expect("narrator");
    let narrative = narrator.narrate(&sample_snapshot("AAPL"));

    // Then: 45.6M shares now counts as high risk
    assert_eq!(narrative.risk, RiskLevel::High);
    assert_eq!(narrator.rules().risk(10_000_000.0, 0.0), RiskLevel::Moderate);
    assert_eq!(narrator.rules().risk(10_000_001.0, 0.0), RiskLevel::High);
}
