//! Sentence templates over an [`AnalyticsSnapshot`].
//!
//! The narrator adds no analysis of its own: it picks one template per theme
//! from the snapshot's classes (plus the risk, opportunity, horizon and
//! outlook tables below) and interpolates the snapshot's numbers.

use serde::{Deserialize, Serialize};

use crate::analytics::{
    AnalyticsSnapshot, Liquidity, MarketCapTier, Momentum, Participation, Position,
    RelativeStanding, VolumeClass,
};
use crate::thresholds::{Bound, ThresholdTable};
use crate::{DashboardConfig, ThresholdConfig, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    MarketStory,
    PriceTrend,
    Volume,
    Liquidity,
    MarketContext,
    Risk,
    Opportunity,
    TimeHorizon,
    RelativePerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    High,
    ModerateHigh,
    Moderate,
}

impl RiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::ModerateHigh => "moderate-high",
            Self::Moderate => "moderate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Opportunity {
    MomentumPlay,
    ValuePlay,
    SteadyPerformer,
}

impl Opportunity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MomentumPlay => "momentum-play",
            Self::ValuePlay => "value-play",
            Self::SteadyPerformer => "steady-performer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeHorizon {
    ShortTerm,
    MediumTerm,
}

impl TimeHorizon {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short-term",
            Self::MediumTerm => "medium-term",
        }
    }
}

/// Which "technical indicators suggest" bullet list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outlook {
    StrongMomentum,
    ModestUptrend,
    Oversold,
}

impl Outlook {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongMomentum => "strong-momentum",
            Self::ModestUptrend => "modest-uptrend",
            Self::Oversold => "oversold",
        }
    }

    pub fn signals(self) -> [&'static str; 3] {
        match self {
            Self::StrongMomentum => [
                "Strong momentum may continue short-term",
                "Watch for profit-taking at resistance levels",
                "Consider position sizing on pullbacks",
            ],
            Self::ModestUptrend => [
                "Modest uptrend with room for growth",
                "Stable foundation for continued gains",
                "Monitor volume for confirmation",
            ],
            Self::Oversold => [
                "Potential oversold conditions emerging",
                "Value opportunity for patient investors",
                "Watch for reversal signals",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSentence {
    pub theme: Theme,
    /// Category token the template was chosen by.
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub sentences: Vec<LabeledSentence>,
    pub risk: RiskLevel,
    pub opportunity: Opportunity,
    pub time_horizon: TimeHorizon,
    pub outlook: Outlook,
    pub signals: Vec<String>,
}

impl Narrative {
    pub fn sentence(&self, theme: Theme) -> Option<&LabeledSentence> {
        self.sentences.iter().find(|sentence| sentence.theme == theme)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRules {
    /// Volume gate checked before price movement.
    pub risk_volume: ThresholdTable<RiskLevel>,
    /// Applied to the absolute percent change.
    pub risk_move: ThresholdTable<RiskLevel>,
    pub opportunity: ThresholdTable<Opportunity>,
    pub time_horizon: ThresholdTable<TimeHorizon>,
    pub outlook: ThresholdTable<Outlook>,
}

impl NarrativeRules {
    pub fn from_config(config: &ThresholdConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            risk_volume: ThresholdTable::new(
                "risk_volume",
                vec![(Bound::Above(config.risk.high_volume_above), RiskLevel::High)],
                RiskLevel::Moderate,
            )?,
            risk_move: ThresholdTable::new(
                "risk_move",
                vec![(
                    Bound::Above(config.risk.moderate_high_move_above),
                    RiskLevel::ModerateHigh,
                )],
                RiskLevel::Moderate,
            )?,
            opportunity: ThresholdTable::new(
                "opportunity",
                vec![
                    (
                        Bound::Above(config.opportunity.momentum_play_above),
                        Opportunity::MomentumPlay,
                    ),
                    (
                        Bound::AtLeast(config.opportunity.value_play_below),
                        Opportunity::SteadyPerformer,
                    ),
                ],
                Opportunity::ValuePlay,
            )?,
            time_horizon: ThresholdTable::new(
                "time_horizon",
                vec![(Bound::Above(config.short_term_volume_above), TimeHorizon::ShortTerm)],
                TimeHorizon::MediumTerm,
            )?,
            outlook: ThresholdTable::new(
                "outlook",
                vec![
                    (
                        Bound::Above(config.outlook.strong_momentum_above),
                        Outlook::StrongMomentum,
                    ),
                    (Bound::Above(config.outlook.uptrend_above), Outlook::ModestUptrend),
                ],
                Outlook::Oversold,
            )?,
        })
    }

    pub fn risk(&self, volume: f64, change_percent: f64) -> RiskLevel {
        match self.risk_volume.classify(volume) {
            RiskLevel::High => RiskLevel::High,
            _ => self.risk_move.classify(change_percent.abs()),
        }
    }
}

impl Default for NarrativeRules {
    fn default() -> Self {
        Self::from_config(&ThresholdConfig::default()).expect("default thresholds are ordered")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrator {
    rules: NarrativeRules,
}

impl Narrator {
    pub fn new(rules: NarrativeRules) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ValidationError> {
        Ok(Self::new(NarrativeRules::from_config(&config.thresholds)?))
    }

    pub fn rules(&self) -> &NarrativeRules {
        &self.rules
    }

    pub fn narrate(&self, snapshot: &AnalyticsSnapshot) -> Narrative {
        let volume = snapshot.current_volume as f64;
        let change = snapshot.reference_change_percent;
        let risk = self.rules.risk(volume, change);
        let opportunity = self.rules.opportunity.classify(change);
        let time_horizon = self.rules.time_horizon.classify(volume);
        let outlook = self.rules.outlook.classify(change);

        let sentences = vec![
            market_story(snapshot),
            price_trend(snapshot),
            volume_story(snapshot),
            liquidity(snapshot),
            market_context(snapshot),
            risk_sentence(risk, change),
            opportunity_sentence(opportunity),
            horizon_sentence(time_horizon),
            relative_sentence(snapshot),
        ];

        Narrative {
            sentences,
            risk,
            opportunity,
            time_horizon,
            outlook,
            signals: outlook.signals().iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Narrative under the default rules.
pub fn narrate(snapshot: &AnalyticsSnapshot) -> Narrative {
    Narrator::default().narrate(snapshot)
}

fn sentence(theme: Theme, label: &str, text: String) -> LabeledSentence {
    LabeledSentence {
        theme,
        label: label.to_owned(),
        text,
    }
}

fn market_story(s: &AnalyticsSnapshot) -> LabeledSentence {
    let (label, movement) = if s.session_change >= 0.0 {
        (
            "gain",
            format!(
                "showing bullish momentum with a {:.2}% gain (+{:.2})",
                s.session_change_percent, s.session_change
            ),
        )
    } else {
        (
            "decline",
            format!(
                "facing bearish pressure with a {:.2}% decline (-{:.2})",
                s.session_change_percent.abs(),
                s.session_change.abs()
            ),
        )
    };
    let participation = match s.participation {
        Participation::Exceptional => "indicates exceptional market interest",
        Participation::AboveAverage => "represents above-average market participation",
        Participation::Steady => "shows steady, balanced trading conditions",
    };

    sentence(
        Theme::MarketStory,
        label,
        format!(
            "{} is trading at {:.2}, {movement}. Session volume of {:.1}M shares {participation}.",
            s.name, s.current_price, s.current_volume_millions
        ),
    )
}

fn price_trend(s: &AnalyticsSnapshot) -> LabeledSentence {
    let lead = match s.momentum {
        Momentum::StrongBullish => "Strong bullish momentum",
        Momentum::MildBullish => "Mild bullish momentum",
        Momentum::MildBearish => "Mild bearish momentum",
        Momentum::StrongBearish => "Strong bearish momentum",
    };
    let side = match s.position {
        Position::Above => "above",
        Position::Below => "below",
    };

    sentence(
        Theme::PriceTrend,
        s.momentum.as_str(),
        format!(
            "{lead}: the {}-session trend is {} with a {:+.1}% net change. Closes ranged {:.2} \
             ({:.1}% of the {:.2} average) and the current price sits {side} that average.",
            s.bar_count,
            s.trend.as_str(),
            s.net_change_percent,
            s.volatility_range,
            s.volatility_percent,
            s.mean_close
        ),
    )
}

fn volume_story(s: &AnalyticsSnapshot) -> LabeledSentence {
    let verdict = match s.volume_class {
        VolumeClass::Exceptional => {
            "exceptionally high, pointing to news or institutional activity"
        }
        VolumeClass::AboveAverage => "above average, signalling heightened investor attention",
        VolumeClass::Normal => "within its normal range",
        VolumeClass::BelowAverage => "below average, suggesting muted interest",
    };

    sentence(
        Theme::Volume,
        s.volume_class.as_str(),
        format!(
            "Volume of {:.1}M shares is {:.0}% of the {:.1}M window average: {verdict}.",
            s.current_volume_millions,
            s.volume_ratio * 100.0,
            s.average_volume / crate::series::VOLUME_SCALE
        ),
    )
}

fn liquidity(s: &AnalyticsSnapshot) -> LabeledSentence {
    let text = match s.liquidity {
        Liquidity::HighlyLiquid => "Highly liquid; entries and exits are easy.",
        Liquidity::ModeratelyLiquid => "Moderately liquid; standard entry and exit conditions.",
    };
    sentence(Theme::Liquidity, s.liquidity.as_str(), text.to_owned())
}

fn market_context(s: &AnalyticsSnapshot) -> LabeledSentence {
    let context = match s.market_cap_tier {
        MarketCapTier::MegaCap => {
            "this stock commands significant market influence as a mega-cap leader, often \
             serving as a market bellwether"
        }
        MarketCapTier::LargeCap => {
            "this is a large-cap stalwart with substantial institutional ownership and a lower \
             volatility profile"
        }
        MarketCapTier::MidToLargeCap => {
            "this mid-to-large cap position offers growth potential while maintaining relative \
             stability"
        }
    };

    sentence(
        Theme::MarketContext,
        s.market_cap_tier.as_str(),
        format!(
            "With a market capitalization of {:.2}T, {context}.",
            s.market_cap_trillions
        ),
    )
}

fn risk_sentence(risk: RiskLevel, change: f64) -> LabeledSentence {
    let text = match risk {
        RiskLevel::High => "High risk: elevated volume suggests volatility.".to_owned(),
        RiskLevel::ModerateHigh => {
            format!("Moderate-high risk: a significant {change:+.2}% price movement.")
        }
        RiskLevel::Moderate => "Moderate risk: stable trading conditions.".to_owned(),
    };
    sentence(Theme::Risk, risk.as_str(), text)
}

fn opportunity_sentence(opportunity: Opportunity) -> LabeledSentence {
    let text = match opportunity {
        Opportunity::MomentumPlay => "High opportunity score as a momentum play.",
        Opportunity::ValuePlay => "High opportunity score as a value play.",
        Opportunity::SteadyPerformer => "Moderate opportunity score as a steady performer.",
    };
    sentence(Theme::Opportunity, opportunity.as_str(), text.to_owned())
}

fn horizon_sentence(horizon: TimeHorizon) -> LabeledSentence {
    let text = match horizon {
        TimeHorizon::ShortTerm => "A short-term focus is recommended.",
        TimeHorizon::MediumTerm => "A medium-term hold is recommended.",
    };
    sentence(Theme::TimeHorizon, horizon.as_str(), text.to_owned())
}

fn relative_sentence(s: &AnalyticsSnapshot) -> LabeledSentence {
    let relative = &s.relative;
    let verdict = match relative.standing {
        RelativeStanding::Outperforming => {
            "is significantly outperforming the tracked instruments, suggesting company-specific \
             catalysts or sector strength"
        }
        RelativeStanding::Underperforming => {
            "is underperforming its peers, which could indicate stock-specific headwinds or a \
             relative value opportunity"
        }
        RelativeStanding::InLine => {
            "is performing in line with the broader trend, moving with the other tracked \
             instruments"
        }
    };

    sentence(
        Theme::RelativePerformance,
        relative.standing.as_str(),
        format!(
            "{} {verdict} ({:+.2} points against the {:.2}% mean of {} instruments).",
            s.name, relative.delta, relative.catalog_mean, relative.peers
        ),
    )
}
