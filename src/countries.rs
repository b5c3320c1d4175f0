//! Country code translation.
//!
//! Annual queries address countries by ISO alpha-2 code. Monthly and quarterly
//! queries use the vendor's own numeric ids, which are looked up through the
//! alpha-3 code in `country-code.csv`.

use crate::error::ConfigError;
use crate::iso3166;
use crate::models::Frequency;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Row of `country-code.csv`. Extra columns (`name`, a leading index) are ignored.
#[derive(Debug, Clone, Deserialize)]
struct VendorRow {
    code: String,
    id: u32,
}

/// Vendor country table: alpha-3 derived code -> vendor ids.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    ids: BTreeMap<String, BTreeSet<u32>>,
}

impl CountryTable {
    /// Load the vendor table from a CSV file with `code` and `id` columns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let table_err = |source| ConfigError::Table {
            path: path.to_path_buf(),
            source,
        };
        let mut rdr = csv::Reader::from_path(path).map_err(table_err)?;
        let mut rows = Vec::new();
        for row in rdr.deserialize::<VendorRow>() {
            let row = row.map_err(table_err)?;
            rows.push((row.code, row.id));
        }
        Ok(Self::from_pairs(rows))
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut ids: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
        for (code, id) in pairs {
            ids.entry(code.as_ref().trim().to_ascii_uppercase())
                .or_default()
                .insert(id);
        }
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Vendor ids for the given countries (mixed alpha-2/alpha-3).
    ///
    /// Codes that are not ISO codes, or have no vendor row, are logged and dropped.
    pub fn vendor_ids<S: AsRef<str>>(&self, codes: &[S]) -> BTreeSet<u32> {
        let mut out = BTreeSet::new();
        for code in alpha3_codes(codes) {
            match self.ids.get(&code) {
                Some(ids) => out.extend(ids.iter().copied()),
                None => log::error!("Error: no vendor country id for '{}'", code),
            }
        }
        out
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Translate mixed alpha-2/alpha-3 codes into the set of alpha-2 codes.
///
/// Two-letter input must be an ISO 3166-1 alpha-2 code as well. Vendor-only
/// codes outside ISO 3166-1 (`XK` for Kosovo, for instance) are logged and
/// dropped, even though the annual endpoint would accept them.
pub fn alpha2_codes<S: AsRef<str>>(codes: &[S]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for code in codes {
        let code = normalize(code.as_ref());
        let resolved = match code.len() {
            2 => iso3166::alpha3(&code).map(|_| code.as_str()),
            3 => iso3166::alpha2(&code),
            _ => None,
        };
        match resolved {
            Some(a2) => {
                out.insert(a2.to_string());
            }
            None => log::error!("Error: unknown country code '{}'", code),
        }
    }
    out
}

/// Translate mixed alpha-2/alpha-3 codes into the set of alpha-3 codes.
pub fn alpha3_codes<S: AsRef<str>>(codes: &[S]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for code in codes {
        let code = normalize(code.as_ref());
        let resolved = match code.len() {
            2 => iso3166::alpha3(&code),
            3 => iso3166::alpha2(&code).map(|_| code.as_str()),
            _ => None,
        };
        match resolved {
            Some(a3) => {
                out.insert(a3.to_string());
            }
            None => log::error!("Error: unknown country code '{}'", code),
        }
    }
    out
}

impl Frequency {
    /// Country codes as the `cnt` parameter expects them for this frequency class.
    pub fn resolve_countries<S: AsRef<str>>(
        self,
        vendor: &CountryTable,
        codes: &[S],
    ) -> BTreeSet<String> {
        match self {
            Frequency::Annual => alpha2_codes(codes),
            Frequency::SubAnnual => vendor
                .vendor_ids(codes)
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}
