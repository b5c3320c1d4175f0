//! Query URI composition.
//!
//! `<root>?tp=<1|2>&ind=<indexes>&cnt=<codes>&prd=<period>&uid=<uid>&uidc=<uidc>`

use crate::catalog::Catalog;
use crate::config::Credentials;
use crate::error::ResolveError;
use crate::models::{Frequency, Period};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Allow -, _, . and : unescaped (period ranges are `start:end`)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b':');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

fn enc_join<I, T>(parts: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    parts
        .into_iter()
        .map(|p| enc(&p.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Optional query settings.
///
/// When both `indicator_names` and `indicator_indexes` are set the names win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UriOptions {
    /// Explicit period; overrides `start_year`/`end_year`.
    pub period: Option<Period>,
    /// Defaults to 1960.
    pub start_year: Option<i32>,
    /// Defaults to the current year.
    pub end_year: Option<i32>,
    pub indicator_names: Option<Vec<String>>,
    pub indicator_indexes: Option<Vec<u32>>,
}

impl UriOptions {
    pub fn names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            indicator_names: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn indexes(indexes: impl IntoIterator<Item = u32>) -> Self {
        Self {
            indicator_indexes: Some(indexes.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn years(mut self, start: i32, end: i32) -> Self {
        self.start_year = Some(start);
        self.end_year = Some(end);
        self
    }

    pub fn resolved_period(&self) -> Period {
        self.period
            .unwrap_or_else(|| Period::years(self.start_year, self.end_year))
    }
}

/// Everything a URI needs besides the per-query arguments.
#[derive(Debug, Clone, Copy)]
pub struct UriContext<'a> {
    pub root: &'a str,
    pub credentials: &'a Credentials,
    pub catalog: &'a Catalog,
}

impl UriContext<'_> {
    /// Compose the export URI for `countries` (mixed ISO alpha-2/alpha-3 codes).
    ///
    /// Fails when no country or no indicator survives resolution; the reason is
    /// logged as well.
    pub fn build_uri<S: AsRef<str>>(
        &self,
        countries: &[S],
        frequency: Frequency,
        opts: &UriOptions,
    ) -> Result<String, ResolveError> {
        let codes = frequency.resolve_countries(self.catalog.countries(), countries);

        let indexes = match (&opts.indicator_names, &opts.indicator_indexes) {
            (Some(names), _) => self.catalog.resolve_indexes(frequency, names.as_slice()),
            (None, Some(indexes)) => indexes.clone(),
            (None, None) => Vec::new(),
        };

        let err = if codes.is_empty() {
            Some(ResolveError::NoCountries)
        } else if indexes.is_empty() {
            Some(ResolveError::NoIndicators)
        } else {
            None
        };
        if let Some(err) = err {
            log::error!("{}", err);
            return Err(err);
        }

        Ok(format!(
            "{}?tp={}&ind={}&cnt={}&prd={}&uid={}&uidc={}",
            self.root,
            frequency.request_type(),
            enc_join(&indexes),
            enc_join(&codes),
            enc(&opts.resolved_period().to_query_param()),
            enc(&self.credentials.uid),
            enc(&self.credentials.uidc),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::CountryTable;
    use crate::indicators::{IndicatorEntry, IndicatorTable};

    fn catalog() -> Catalog {
        Catalog::new(
            CountryTable::from_pairs([("IND", 100u32), ("CHN", 47)]),
            IndicatorTable::new(vec![IndicatorEntry { index: 2, name: "GDP".into() }]),
            IndicatorTable::default(),
        )
    }

    #[test]
    fn names_take_precedence_over_indexes() {
        let cat = catalog();
        let creds = Credentials::new("1", "abc");
        let ctx = UriContext { root: "http://h/x.php", credentials: &creds, catalog: &cat };
        let mut opts = UriOptions::names(["GDP"]).period(Period::Latest);
        opts.indicator_indexes = Some(vec![99]);
        let uri = ctx.build_uri(&["IN"], Frequency::Annual, &opts).unwrap();
        assert_eq!(uri, "http://h/x.php?tp=1&ind=2&cnt=IN&prd=latest&uid=1&uidc=abc");
    }

    #[test]
    fn indexes_are_used_directly() {
        let cat = catalog();
        let creds = Credentials::new("1", "abc");
        let ctx = UriContext { root: "r", credentials: &creds, catalog: &cat };
        let opts = UriOptions::indexes([5, 6]).years(2000, 2001);
        let uri = ctx.build_uri(&["CHN"], Frequency::SubAnnual, &opts).unwrap();
        assert_eq!(uri, "r?tp=2&ind=5,6&cnt=47&prd=2000:2001&uid=1&uidc=abc");
    }

    #[test]
    fn empty_resolution_fails() {
        let cat = catalog();
        let creds = Credentials::new("1", "abc");
        let ctx = UriContext { root: "r", credentials: &creds, catalog: &cat };
        assert_eq!(
            ctx.build_uri(&["XX"], Frequency::Annual, &UriOptions::indexes([1])),
            Err(ResolveError::NoCountries)
        );
        assert_eq!(
            ctx.build_uri(&["IN"], Frequency::Annual, &UriOptions::names(["Unknown"])),
            Err(ResolveError::NoIndicators)
        );
        assert_eq!(
            ctx.build_uri(&["IN"], Frequency::Annual, &UriOptions::default()),
            Err(ResolveError::NoIndicators)
        );
        // sub-annual needs a vendor id, ISO validity alone is not enough
        assert_eq!(
            ctx.build_uri(&["DE"], Frequency::SubAnnual, &UriOptions::indexes([1])),
            Err(ResolveError::NoCountries)
        );
    }

    #[test]
    fn credentials_are_escaped() {
        let cat = catalog();
        let creds = Credentials::new("a b", "x&y");
        let ctx = UriContext { root: "r", credentials: &creds, catalog: &cat };
        let uri = ctx
            .build_uri(&["IN"], Frequency::Annual, &UriOptions::indexes([1]).period(Period::Latest))
            .unwrap();
        assert!(uri.ends_with("&uid=a%20b&uidc=x%26y"));
    }
}
