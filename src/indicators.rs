//! Indicator name -> vendor index lookup tables.
//!
//! The vendor publishes no catalogue, so each table is built once by probing
//! consecutive indexes and reading back the indicator name of every answer.

use crate::error::ConfigError;
use crate::xml::Document;
use anyhow::Context;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One `(index, name)` pair as persisted in `indicator-*.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub index: u32,
    pub name: String,
}

/// Lookup table for one frequency class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorTable {
    entries: Vec<IndicatorEntry>,
}

impl IndicatorTable {
    pub fn new(entries: Vec<IndicatorEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[IndicatorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a persisted table (`index`, `name` columns; extra columns ignored).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let table_err = |source| ConfigError::Table {
            path: path.to_path_buf(),
            source,
        };
        let mut rdr = csv::Reader::from_path(path).map_err(table_err)?;
        let entries = rdr
            .deserialize::<IndicatorEntry>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(table_err)?;
        Ok(Self { entries })
    }

    /// Persist the table as CSV with an `index,name` header.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let mut wtr = WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("create {}", path.display()))?;
        // explicit header: an empty table must still load
        wtr.write_record(["index", "name"])?;
        for e in &self.entries {
            wtr.write_record([e.index.to_string().as_str(), e.name.as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Index of `name`, when exactly one entry carries it.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        let mut hits = self.entries.iter().filter(|e| e.name == name);
        match (hits.next(), hits.next()) {
            (Some(e), None) => Some(e.index),
            _ => None,
        }
    }

    /// Resolve indicator names to indexes, skipping unknown and ambiguous names.
    pub fn resolve_indexes<S: AsRef<str>>(&self, names: &[S]) -> Vec<u32> {
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match self.lookup(name) {
                Some(idx) => out.push(idx),
                None => log::error!("Indicator name not found / duplicated: {}", name),
            }
        }
        out
    }

    /// Case-insensitive substring search over names.
    pub fn search<'a>(
        &'a self,
        needle: &'a str,
    ) -> impl Iterator<Item = &'a IndicatorEntry> + 'a {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| e.name.to_lowercase().contains(&needle))
    }

    /// Build a table by probing indexes `1..max_index` one after another.
    ///
    /// `fetch` performs the request for a single index. Failed requests and
    /// answers without an indicator name are logged and skipped. `delay` is
    /// slept after every probe.
    pub fn probe<F, E>(max_index: u32, delay: Duration, mut fetch: F) -> Self
    where
        F: FnMut(u32) -> Result<Document, E>,
        E: std::fmt::Display,
    {
        let mut entries = Vec::new();
        for idx in 1..max_index {
            match fetch(idx) {
                Ok(doc) => match declared_name(&doc) {
                    Some(name) => {
                        log::debug!("indicator {} -> {}", idx, name);
                        entries.push(IndicatorEntry { index: idx, name });
                    }
                    None => log::error!("Error: index {} returned no indicator name", idx),
                },
                // the fetcher reports its own failures
                Err(e) => log::debug!("index {} skipped: {}", idx, e),
            }
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
        log::info!(
            "probed {} indexes, found {} indicators",
            max_index.saturating_sub(1),
            entries.len()
        );
        Self { entries }
    }
}

/// Name declared by the first `country/element/indicator` of a probe answer.
fn declared_name(doc: &Document) -> Option<String> {
    let name = doc
        .root
        .child("country")?
        .child("element")?
        .child("indicator")?
        .text
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}
