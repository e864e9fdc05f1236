use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Bar, ValidationError};

/// Lookback selector offered by the dashboard toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1W")]
    OneWeek,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl Timeframe {
    pub const ALL: [Self; 4] = [
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::OneYear,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
        }
    }

    /// Calendar days covered behind the most recent bar.
    pub const fn lookback_days(self) -> i64 {
        match self {
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 91,
            Self::OneYear => 365,
        }
    }

    /// Trailing slice of `bars` whose dates fall within the lookback of the
    /// last bar, inclusive on both ends. Expects chronologically ordered bars.
    pub fn window(self, bars: &[Bar]) -> &[Bar] {
        let Some(last) = bars.last() else {
            return bars;
        };
        let cutoff = last.date.days_before(self.lookback_days());
        let start = bars.partition_point(|bar| bar.date < cutoff);
        &bars[start..]
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1W" => Ok(Self::OneWeek),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "1Y" => Ok(Self::OneYear),
            _ => Err(ValidationError::InvalidTimeframe {
                value: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradeDate;

    fn bar(date: &str) -> Bar {
        let date = TradeDate::parse(date).expect("date");
        Bar::new(date, 10.0, 11.0, 9.0, 10.5, 1_000).expect("bar")
    }

    #[test]
    fn parses_timeframe_tokens() {
        assert_eq!(Timeframe::from_str("3m").expect("must parse"), Timeframe::ThreeMonths);
        assert_eq!(Timeframe::from_str(" 1Y ").expect("must parse"), Timeframe::OneYear);
    }

    #[test]
    fn rejects_unknown_timeframe() {
        let err = Timeframe::from_str("5D").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimeframe { .. }));
    }

    #[test]
    fn week_window_keeps_only_trailing_seven_days() {
        let bars = vec![
            bar("2023-12-01"),
            bar("2023-12-28"),
            bar("2023-12-29"),
            bar("2024-01-05"),
        ];

        let window = Timeframe::OneWeek.window(&bars);
        let dates: Vec<String> = window.iter().map(|bar| bar.date.to_string()).collect();
        assert_eq!(dates, vec!["2023-12-29", "2024-01-05"]);
        assert_eq!(Timeframe::OneYear.window(&bars).len(), 4);
    }

    #[test]
    fn window_of_empty_history_is_empty() {
        assert!(Timeframe::OneMonth.window(&[]).is_empty());
    }
}
