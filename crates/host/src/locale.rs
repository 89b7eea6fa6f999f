//! Locale identifiers and the calendar-related defaults derived from them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HostError;

/// A parsed locale identifier such as `en_US`, `ja_JP` or `en_US_POSIX`.
///
/// Identifiers are normalised to underscore separators, a lowercase
/// language, a titlecase script and an uppercase region. POSIX encodings
/// and modifiers (`.UTF-8`, `@euro`) are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    identifier: String,
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parses a locale identifier. `C` and `POSIX` map to `en_US_POSIX`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownLocale`] if the identifier is not a
    /// language subtag followed by optional script, region and variant
    /// subtags.
    pub fn new(identifier: &str) -> Result<Self, HostError> {
        let unknown = || HostError::UnknownLocale {
            locale: identifier.to_string(),
        };
        let base = identifier
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();
        if base == "C" || base == "POSIX" {
            return Ok(Self::posix());
        }

        let mut parts = base.split(['_', '-']);
        let language = parts.next().ok_or_else(unknown)?;
        if !(2..=3).contains(&language.len()) || !language.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(unknown());
        }
        let language = language.to_ascii_lowercase();
        let mut subtags = vec![language.clone()];
        let mut region = None;

        for part in parts {
            let all_alpha = part.bytes().all(|b| b.is_ascii_alphabetic());
            let all_digit = part.bytes().all(|b| b.is_ascii_digit());
            if part.len() == 4 && all_alpha && region.is_none() && subtags.len() == 1 {
                let mut script = part.to_ascii_lowercase();
                script[..1].make_ascii_uppercase();
                subtags.push(script);
            } else if region.is_none()
                && ((part.len() == 2 && all_alpha) || (part.len() == 3 && all_digit))
            {
                let r = part.to_ascii_uppercase();
                subtags.push(r.clone());
                region = Some(r);
            } else if (4..=8).contains(&part.len())
                && part.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                subtags.push(part.to_ascii_uppercase());
            } else {
                return Err(unknown());
            }
        }

        Ok(Self {
            identifier: subtags.join("_"),
            language,
            region,
        })
    }

    /// The `en_US_POSIX` locale.
    pub fn posix() -> Self {
        Self {
            identifier: "en_US_POSIX".to_string(),
            language: "en".to_string(),
            region: Some("US".to_string()),
        }
    }

    /// Returns the normalised identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the lowercase language subtag.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Region used for regional defaults: the explicit region, else the
    /// likely region of the language, else `001` (world).
    pub fn effective_region(&self) -> &str {
        if let Some(region) = &self.region {
            return region;
        }
        LIKELY_REGIONS
            .iter()
            .find(|(lang, _)| *lang == self.language)
            .map_or("001", |(_, region)| *region)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.identifier)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let identifier = String::deserialize(deserializer)?;
        Locale::new(&identifier).map_err(serde::de::Error::custom)
    }
}

/// Calendar parameters a locale supplies. Weekdays are numbered
/// 1 = Sunday through 7 = Saturday.
pub trait LocaleDefaults {
    /// First day of the week.
    fn first_weekday(&self, locale: &Locale) -> u8;

    /// Minimum number of days of a year (or month) that its first week
    /// must contain.
    fn minimum_days_in_first_week(&self, locale: &Locale) -> u8;

    /// Weekend as an inclusive `(start, end)` weekday range, which may wrap
    /// past Saturday.
    fn weekend(&self, locale: &Locale) -> (u8, u8);

    /// Symbol for times before noon.
    fn am_symbol(&self, locale: &Locale) -> String;

    /// Symbol for times from noon on.
    fn pm_symbol(&self, locale: &Locale) -> String;
}

/// Built-in regional week data and day-period symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinLocaleData;

const LIKELY_REGIONS: &[(&str, &str)] = &[
    ("ar", "EG"),
    ("de", "DE"),
    ("en", "US"),
    ("es", "ES"),
    ("fa", "IR"),
    ("fr", "FR"),
    ("he", "IL"),
    ("hi", "IN"),
    ("it", "IT"),
    ("ja", "JP"),
    ("ko", "KR"),
    ("nl", "NL"),
    ("pl", "PL"),
    ("pt", "BR"),
    ("ru", "RU"),
    ("sv", "SE"),
    ("th", "TH"),
    ("tr", "TR"),
    ("zh", "CN"),
];

const SUNDAY_FIRST: &[&str] = &[
    "AG", "AS", "BD", "BR", "BS", "BT", "BW", "BZ", "CA", "CN", "CO", "DM", "DO", "ET", "GT", "GU",
    "HK", "HN", "ID", "IL", "IN", "JM", "JP", "KE", "KH", "KR", "LA", "MH", "MM", "MO", "MT", "MX",
    "MZ", "NI", "NP", "PA", "PE", "PH", "PK", "PR", "PT", "PY", "SA", "SG", "SV", "TH", "TT", "TW",
    "UM", "US", "VE", "VI", "WS", "YE", "ZA", "ZW",
];

const SATURDAY_FIRST: &[&str] = &[
    "AE", "AF", "BH", "DJ", "DZ", "EG", "IQ", "IR", "JO", "KW", "LY", "OM", "QA", "SD", "SY",
];

const FOUR_DAY_FIRST_WEEK: &[&str] = &[
    "AD", "AN", "AT", "AX", "BE", "BG", "CH", "CZ", "DE", "DK", "EE", "ES", "FI", "FJ", "FO", "FR",
    "GB", "GF", "GG", "GI", "GP", "GR", "HU", "IE", "IM", "IS", "IT", "JE", "LI", "LT", "LU", "MC",
    "MQ", "NL", "NO", "PL", "RE", "RU", "SE", "SJ", "SK", "SM", "VA",
];

const FRIDAY_SATURDAY_WEEKEND: &[&str] = &[
    "AE", "BH", "DZ", "EG", "IL", "IQ", "JO", "KW", "LY", "OM", "QA", "SA", "SD", "SY", "YE",
];

impl LocaleDefaults for BuiltinLocaleData {
    fn first_weekday(&self, locale: &Locale) -> u8 {
        let region = locale.effective_region();
        if SUNDAY_FIRST.contains(&region) {
            1
        } else if SATURDAY_FIRST.contains(&region) {
            7
        } else {
            2
        }
    }

    fn minimum_days_in_first_week(&self, locale: &Locale) -> u8 {
        if FOUR_DAY_FIRST_WEEK.contains(&locale.effective_region()) {
            4
        } else {
            1
        }
    }

    fn weekend(&self, locale: &Locale) -> (u8, u8) {
        match locale.effective_region() {
            "IN" | "UG" => (1, 1),
            "AF" => (5, 6),
            "IR" => (6, 6),
            r if FRIDAY_SATURDAY_WEEKEND.contains(&r) => (6, 7),
            _ => (7, 1),
        }
    }

    fn am_symbol(&self, locale: &Locale) -> String {
        match locale.language() {
            "ja" => "午前",
            "zh" => "上午",
            "ko" => "오전",
            "es" => "a. m.",
            _ => "AM",
        }
        .to_string()
    }

    fn pm_symbol(&self, locale: &Locale) -> String {
        match locale.language() {
            "ja" => "午後",
            "zh" => "下午",
            "ko" => "오후",
            "es" => "p. m.",
            _ => "PM",
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises() {
        let l = Locale::new("en-us").unwrap();
        assert_eq!(l.identifier(), "en_US");
        assert_eq!(l.language(), "en");
        assert_eq!(l.region(), Some("US"));

        let l = Locale::new("zh_hant_tw").unwrap();
        assert_eq!(l.identifier(), "zh_Hant_TW");
        assert_eq!(l.region(), Some("TW"));
    }

    #[test]
    fn posix_forms() {
        assert_eq!(Locale::new("C").unwrap(), Locale::posix());
        assert_eq!(Locale::new("C.UTF-8").unwrap(), Locale::posix());
        assert_eq!(Locale::new("en_US_POSIX").unwrap().identifier(), "en_US_POSIX");
        assert_eq!(Locale::new("de_DE.UTF-8@euro").unwrap().identifier(), "de_DE");
    }

    #[test]
    fn rejects_malformed() {
        assert!(Locale::new("").is_err());
        assert!(Locale::new("e").is_err());
        assert!(Locale::new("english_US").is_err());
        assert!(Locale::new("en_U$").is_err());
    }

    #[test]
    fn likely_region_fallback() {
        assert_eq!(Locale::new("ja").unwrap().effective_region(), "JP");
        assert_eq!(Locale::new("xx").unwrap().effective_region(), "001");
    }

    #[test]
    fn week_data() {
        let data = BuiltinLocaleData;
        let us = Locale::new("en_US").unwrap();
        let de = Locale::new("de_DE").unwrap();
        let eg = Locale::new("ar_EG").unwrap();
        assert_eq!(data.first_weekday(&us), 1);
        assert_eq!(data.minimum_days_in_first_week(&us), 1);
        assert_eq!(data.first_weekday(&de), 2);
        assert_eq!(data.minimum_days_in_first_week(&de), 4);
        assert_eq!(data.first_weekday(&eg), 7);
        assert_eq!(data.weekend(&us), (7, 1));
        assert_eq!(data.weekend(&eg), (6, 7));
    }

    #[test]
    fn day_period_symbols() {
        let data = BuiltinLocaleData;
        assert_eq!(data.am_symbol(&Locale::posix()), "AM");
        assert_eq!(data.pm_symbol(&Locale::posix()), "PM");
        assert_eq!(data.am_symbol(&Locale::new("ja_JP").unwrap()), "午前");
    }
}
