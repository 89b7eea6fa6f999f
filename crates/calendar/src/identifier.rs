//! Calendar system identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// The calendar systems a [`Calendar`](crate::Calendar) can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalendarIdentifier {
    /// Proleptic Gregorian calendar.
    Gregorian,
    /// Thai solar calendar: Gregorian months, Buddhist Era years.
    Buddhist,
    /// Chinese lunisolar calendar with sexagenary year cycles.
    Chinese,
    /// Coptic calendar.
    Coptic,
    /// Ethiopian calendar, Amete Mihret era reckoning.
    EthiopicAmeteMihret,
    /// Ethiopian calendar, Amete Alem era reckoning.
    EthiopicAmeteAlem,
    /// Hebrew lunisolar calendar.
    Hebrew,
    /// Gregorian calendar with ISO-8601 week rules.
    Iso8601,
    /// Indian national (Saka) calendar.
    Indian,
    /// Islamic calendar with months starting on the day of the
    /// astronomical new moon.
    Islamic,
    /// Arithmetic Islamic calendar, Friday epoch.
    IslamicCivil,
    /// Japanese imperial calendar.
    Japanese,
    /// Persian solar hijri calendar.
    Persian,
    /// Republic of China (Minguo) calendar.
    RepublicOfChina,
    /// Arithmetic Islamic calendar, Thursday epoch.
    IslamicTabular,
    /// Islamic calendar of Saudi Arabia.
    IslamicUmmAlQura,
}

impl CalendarIdentifier {
    /// Every identifier.
    pub const ALL: [CalendarIdentifier; 16] = [
        CalendarIdentifier::Gregorian,
        CalendarIdentifier::Buddhist,
        CalendarIdentifier::Chinese,
        CalendarIdentifier::Coptic,
        CalendarIdentifier::EthiopicAmeteMihret,
        CalendarIdentifier::EthiopicAmeteAlem,
        CalendarIdentifier::Hebrew,
        CalendarIdentifier::Iso8601,
        CalendarIdentifier::Indian,
        CalendarIdentifier::Islamic,
        CalendarIdentifier::IslamicCivil,
        CalendarIdentifier::Japanese,
        CalendarIdentifier::Persian,
        CalendarIdentifier::RepublicOfChina,
        CalendarIdentifier::IslamicTabular,
        CalendarIdentifier::IslamicUmmAlQura,
    ];

    /// The identifier's name.
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarIdentifier::Gregorian => "gregorian",
            CalendarIdentifier::Buddhist => "buddhist",
            CalendarIdentifier::Chinese => "chinese",
            CalendarIdentifier::Coptic => "coptic",
            CalendarIdentifier::EthiopicAmeteMihret => "ethiopicAmeteMihret",
            CalendarIdentifier::EthiopicAmeteAlem => "ethiopicAmeteAlem",
            CalendarIdentifier::Hebrew => "hebrew",
            CalendarIdentifier::Iso8601 => "iso8601",
            CalendarIdentifier::Indian => "indian",
            CalendarIdentifier::Islamic => "islamic",
            CalendarIdentifier::IslamicCivil => "islamicCivil",
            CalendarIdentifier::Japanese => "japanese",
            CalendarIdentifier::Persian => "persian",
            CalendarIdentifier::RepublicOfChina => "republicOfChina",
            CalendarIdentifier::IslamicTabular => "islamicTabular",
            CalendarIdentifier::IslamicUmmAlQura => "islamicUmmAlQura",
        }
    }
}

impl fmt::Display for CalendarIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarIdentifier {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarIdentifier::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalendarError::UnknownName {
                kind: "calendar",
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for id in CalendarIdentifier::ALL {
            assert_eq!(id.as_str().parse::<CalendarIdentifier>().unwrap(), id);
            assert_eq!(id.to_string(), id.as_str());
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            "ISO8601".parse::<CalendarIdentifier>().unwrap(),
            CalendarIdentifier::Iso8601
        );
        assert!("julian".parse::<CalendarIdentifier>().is_err());
    }
}
