use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First year covered by the vendor's series; used when no start year is given.
pub const DEFAULT_START_YEAR: i32 = 1960;

/// Frequency class of a query.
///
/// The vendor keeps a separate indicator index namespace per class, and each class
/// addresses countries differently (see [`Frequency::resolve_countries`](crate::countries)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Frequency {
    /// Yearly series, addressed by ISO alpha-2 country codes.
    Annual,
    /// Monthly and quarterly series, addressed by vendor country ids.
    SubAnnual,
}

impl Frequency {
    pub const ALL: [Frequency; 2] = [Frequency::Annual, Frequency::SubAnnual];

    /// Value of the `tp` query parameter.
    pub fn request_type(self) -> u8 {
        match self {
            Frequency::Annual => 1,
            Frequency::SubAnnual => 2,
        }
    }

    /// File name of the persisted indicator lookup table for this class.
    pub fn lookup_file_name(self) -> &'static str {
        match self {
            Frequency::Annual => "indicator-annual.csv",
            Frequency::SubAnnual => "indicator-monthly.csv",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Annual => f.write_str("annual"),
            Frequency::SubAnnual => f.write_str("monthly"),
        }
    }
}

/// How to specify the `prd` window in API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// Only the most recent observation of every series.
    Latest,
    /// Inclusive year range like 1960..=2020
    Range { start: i32, end: i32 },
}

impl Period {
    /// Range from `start` (default 1960) to `end` (default: the current year).
    pub fn years(start: Option<i32>, end: Option<i32>) -> Self {
        Period::Range {
            start: start.unwrap_or(DEFAULT_START_YEAR),
            end: end.unwrap_or_else(|| chrono::Local::now().year()),
        }
    }

    pub fn to_query_param(&self) -> String {
        match *self {
            Period::Latest => "latest".to_string(),
            Period::Range { start, end } => format!("{}:{}", start, end),
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::years(None, None)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_param())
    }
}

impl FromStr for Period {
    type Err = String;

    /// Accepts `latest`, a single year `YYYY`, or an inclusive range `YYYY:YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Period::Latest);
        }
        let year = |v: &str| {
            v.trim()
                .parse::<i32>()
                .map_err(|_| format!("invalid period '{s}', expected latest, YYYY or YYYY:YYYY"))
        };
        match s.split_once(':') {
            Some((a, b)) => Ok(Period::Range {
                start: year(a)?,
                end: year(b)?,
            }),
            None => {
                let y = year(s)?;
                Ok(Period::Range { start: y, end: y })
            }
        }
    }
}

/// Tidy structure used by this crate (one row = one observation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Country id as reported by the payload's `id` attribute.
    pub id: String,
    /// First day of the observed month (January for annual series).
    pub date: NaiveDate,
    pub indicator: String,
    pub value: Option<f64>,
}

/// Serde helper: parse a `String` from either a scalar string or a number.
///
/// Credential files written by hand often carry the account id unquoted.
pub(crate) fn de_string_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct StringVisitor;

    impl Visitor<'_> for StringVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a string or a number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(s.to_string())
        }
    }

    deserializer.deserialize_any(StringVisitor)
}
