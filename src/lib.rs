//! gecon
//!
//! A small Rust library for querying the Global Economy (theglobaleconomy.com)
//! XML export API by indicator name and ISO country code. Pairs with the `gecon` CLI.
//!
//! ### Features
//! - Translate ISO alpha-2/alpha-3 codes to the codes each frequency class expects
//! - Resolve indicator names to vendor indexes (tables are probed once and cached on disk)
//! - Fetch and validate XML payloads, flatten them into tidy records
//! - Save as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use gecon::{Client, ClientConfig, Frequency, UriOptions};
//!
//! let client = Client::open(ClientConfig::with_cfg_dir("cfg"))?;
//! let opts = UriOptions::names(["Exports, percent of GDP", "Access to electricity"])
//!     .years(1960, 2020);
//! if let Some(rows) = client.query(&["IND", "CHN"], Frequency::Annual, &opts) {
//!     gecon::storage::save_csv(&rows, "exports.csv")?;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod countries;
pub mod error;
pub mod indicators;
pub mod iso3166;
pub mod models;
pub mod storage;
pub mod table;
pub mod uri;
pub mod xml;

pub use api::Client;
pub use catalog::Catalog;
pub use config::{ClientConfig, Credentials};
pub use error::{ConfigError, FetchError, RecordError, ResolveError};
pub use models::{Frequency, Period, Record};
pub use table::to_table;
pub use uri::UriOptions;
pub use xml::Document;
