//! The fixed, ordered enumeration of reporting periods.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Period {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Period {
    pub const COUNT: usize = 12;

    /// Every period in enumeration order.
    pub const ALL: [Period; Period::COUNT] = [
        Period::January,
        Period::February,
        Period::March,
        Period::April,
        Period::May,
        Period::June,
        Period::July,
        Period::August,
        Period::September,
        Period::October,
        Period::November,
        Period::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Period::January => "January",
            Period::February => "February",
            Period::March => "March",
            Period::April => "April",
            Period::May => "May",
            Period::June => "June",
            Period::July => "July",
            Period::August => "August",
            Period::September => "September",
            Period::October => "October",
            Period::November => "November",
            Period::December => "December",
        }
    }

    /// Three-letter label used on chart axes.
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// Zero-based position within [`Period::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = DashboardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|period| period.name() == raw)
            .ok_or_else(|| DashboardError::InvalidPeriod(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_parse() {
        for period in Period::ALL {
            assert_eq!(period.name().parse::<Period>(), Ok(period));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "Smarch".parse::<Period>(),
            Err(DashboardError::InvalidPeriod("Smarch".into()))
        );
        // Matching is exact; the checkbox values always carry the canonical name.
        assert!("march".parse::<Period>().is_err());
    }

    #[test]
    fn index_follows_enumeration_order() {
        for (idx, period) in Period::ALL.into_iter().enumerate() {
            assert_eq!(period.index(), idx);
        }
        assert_eq!(Period::September.short_name(), "Sep");
    }
}
