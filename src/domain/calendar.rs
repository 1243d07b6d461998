//! Trading-calendar conventions.

use std::fmt;
use std::str::FromStr;

/// Day-count convention for annualization and lookback lengths.
///
/// `TradingDays` assumes market days only (252/year); `CalendarDays`
/// assumes the series was filled for weekends upstream (365/year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMode {
    TradingDays,
    CalendarDays,
}

impl CalendarMode {
    pub fn days_per_year(self) -> usize {
        match self {
            CalendarMode::TradingDays => 252,
            CalendarMode::CalendarDays => 365,
        }
    }

    pub fn days_per_5_years(self) -> usize {
        self.days_per_year() * 5
    }
}

impl fmt::Display for CalendarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarMode::TradingDays => write!(f, "trading"),
            CalendarMode::CalendarDays => write!(f, "calendar"),
        }
    }
}

impl FromStr for CalendarMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trading" => Ok(CalendarMode::TradingDays),
            "calendar" => Ok(CalendarMode::CalendarDays),
            other => Err(format!(
                "unknown calendar mode '{other}' (expected 'trading' or 'calendar')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trading_days_per_year() {
        assert_eq!(CalendarMode::TradingDays.days_per_year(), 252);
        assert_eq!(CalendarMode::TradingDays.days_per_5_years(), 1260);
    }

    #[test]
    fn calendar_days_per_year() {
        assert_eq!(CalendarMode::CalendarDays.days_per_year(), 365);
        assert_eq!(CalendarMode::CalendarDays.days_per_5_years(), 1825);
    }

    #[test]
    fn parse_modes() {
        assert_eq!(
            "trading".parse::<CalendarMode>().unwrap(),
            CalendarMode::TradingDays
        );
        assert_eq!(
            " Calendar ".parse::<CalendarMode>().unwrap(),
            CalendarMode::CalendarDays
        );
        assert!("weekly".parse::<CalendarMode>().is_err());
    }
}
