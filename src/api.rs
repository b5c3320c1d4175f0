//! Synchronous client for the **Global Economy XML export API**.
//!
//! The API is addressed with vendor codes only: numeric indicator indexes and,
//! for monthly/quarterly series, numeric country ids. [`Client`] hides this behind
//! indicator names and ISO country codes, using lookup tables loaded from the
//! configuration directory when the client is opened.
//!
//! ### Notes
//! - Every request is a single attempt with a short timeout (5 s by default).
//! - Indicator tables missing from the configuration directory are generated by
//!   probing the API index by index. This takes a while (one request per index).
//! - [`Client::query`] never fails: errors are logged and surface as `None`.
//!
//! Typical usage:
//! ```no_run
//! # use gecon::{Client, ClientConfig, Frequency, Period, UriOptions};
//! let client = Client::open(ClientConfig::default())?;
//! let rows = client.query(
//!     &["IN", "CN"],
//!     Frequency::SubAnnual,
//!     &UriOptions::names(["Debt service ratios for private non-financial sector"])
//!         .period(Period::Latest),
//! );
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::catalog::Catalog;
use crate::config::{ClientConfig, Credentials};
use crate::countries::CountryTable;
use crate::error::{ConfigError, FetchError, ResolveError};
use crate::indicators::IndicatorTable;
use crate::models::{Frequency, Period, Record};
use crate::table;
use crate::uri::{UriContext, UriOptions};
use crate::xml::Document;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;

#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    credentials: Credentials,
    catalog: Catalog,
    http: HttpClient,
}

fn http_client(config: &ClientConfig) -> Result<HttpClient, reqwest::Error> {
    HttpClient::builder()
        .timeout(config.timeout) // total request timeout
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::limited(5)) // cap redirects
        .user_agent(config.user_agent.as_str())
        .build()
}

impl Client {
    /// Build a client from already loaded parts. Nothing is read from disk.
    pub fn new(
        config: ClientConfig,
        credentials: Credentials,
        catalog: Catalog,
    ) -> Result<Self, ConfigError> {
        let http = http_client(&config)?;
        Ok(Self {
            config,
            credentials,
            catalog,
            http,
        })
    }

    /// Load credentials and lookup tables from `config.cfg_dir`.
    ///
    /// Indicator tables that do not exist yet are probed from the API and written
    /// to the configuration directory so later runs can load them directly. An
    /// empty probe result is not written, so the next run probes again.
    pub fn open(config: ClientConfig) -> anyhow::Result<Self> {
        let mut client = Self::open_without_indicators(config)?;
        for frequency in Frequency::ALL {
            let path = client.config.indicator_table_path(frequency);
            let table = if path.exists() {
                IndicatorTable::load(&path)?
            } else {
                log::info!(
                    "{} missing, probing {} indicators from the API",
                    path.display(),
                    frequency
                );
                let table = client.probe_indicators(frequency, client.config.probe_max_index);
                if table.is_empty() {
                    log::warn!(
                        "no {} indicators found, {} not written",
                        frequency,
                        path.display()
                    );
                } else {
                    table.save(&path)?;
                }
                table
            };
            log::debug!("loaded {} {} indicators", table.len(), frequency);
            client.catalog.set_indicators(frequency, table);
        }
        Ok(client)
    }

    /// Load credentials and the vendor country table only.
    ///
    /// Indicator tables stay empty and nothing is probed; enough for
    /// [`Client::bootstrap`] and for queries by index.
    pub fn open_without_indicators(config: ClientConfig) -> anyhow::Result<Self> {
        let credentials = Credentials::load(config.credentials_path())?;
        let countries = CountryTable::load(config.country_table_path())?;
        log::debug!("loaded {} vendor country codes", countries.len());

        let catalog = Catalog::new(
            countries,
            IndicatorTable::default(),
            IndicatorTable::default(),
        );
        Ok(Self::new(config, credentials, catalog)?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn uri_context(&self) -> UriContext<'_> {
        UriContext {
            root: &self.config.root,
            credentials: &self.credentials,
            catalog: &self.catalog,
        }
    }

    /// Compose the export URI; see [`UriContext::build_uri`].
    pub fn build_uri<S: AsRef<str>>(
        &self,
        countries: &[S],
        frequency: Frequency,
        opts: &UriOptions,
    ) -> Result<String, ResolveError> {
        self.uri_context().build_uri(countries, frequency, opts)
    }

    /// Issue a single GET and parse the body as XML.
    ///
    /// Every failure is logged once with its category before being returned.
    pub fn fetch(&self, uri: &str) -> Result<Document, FetchError> {
        let result = self.fetch_inner(uri);
        if let Err(e) = &result {
            log::error!("{}", e);
        }
        result
    }

    fn fetch_inner(&self, uri: &str) -> Result<Document, FetchError> {
        log::debug!("GET {}", uri);
        let body = self.http.get(uri).send()?.error_for_status()?.text()?;
        Document::parse(&body).map_err(FetchError::NotXml)
    }

    /// Build, fetch and tabulate in one go.
    ///
    /// Returns `None` when the arguments do not resolve, the request fails, or the
    /// payload holds no usable rows. Details are in the log.
    pub fn query<S: AsRef<str>>(
        &self,
        countries: &[S],
        frequency: Frequency,
        opts: &UriOptions,
    ) -> Option<Vec<Record>> {
        let uri = self.build_uri(countries, frequency, opts).ok()?;
        let doc = self.fetch(&uri).ok()?;
        table::to_table(&doc)
    }

    /// Scan indexes `1..max_index` for `frequency` and collect the declared names.
    ///
    /// Requests use the configured probe country and the `latest` period, and are
    /// spaced by `probe_delay`.
    pub fn probe_indicators(&self, frequency: Frequency, max_index: u32) -> IndicatorTable {
        let countries = [self.config.probe_country.as_str()];
        IndicatorTable::probe(max_index, self.config.probe_delay, |idx| {
            let opts = UriOptions::indexes([idx]).period(Period::Latest);
            let uri = self.build_uri(&countries, frequency, &opts)?;
            anyhow::Ok(self.fetch(&uri)?)
        })
    }

    /// Re-probe the table for `frequency`, persist it, and return it.
    ///
    /// The table is written even when empty. The loaded catalog is left
    /// untouched; open a new client to use the result.
    pub fn bootstrap(
        &self,
        frequency: Frequency,
        max_index: u32,
    ) -> anyhow::Result<IndicatorTable> {
        let table = self.probe_indicators(frequency, max_index);
        if table.is_empty() {
            log::warn!("no {} indicators found", frequency);
        }
        table.save(self.config.indicator_table_path(frequency))?;
        Ok(table)
    }
}
