//! Client settings and the account credentials file.

use crate::error::ConfigError;
use crate::models::{Frequency, de_string_from_string_or_number};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Vendor endpoint for XML exports.
pub const DEFAULT_ROOT: &str = "https://www.theglobaleconomy.com/data_export_api.php";

/// Account identity sent with every request (`uid` / `uidc`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(deserialize_with = "de_string_from_string_or_number")]
    pub uid: String,
    #[serde(deserialize_with = "de_string_from_string_or_number")]
    pub uidc: String,
}

#[derive(Deserialize)]
struct CredentialsFile {
    credentials: Credentials,
}

impl Credentials {
    pub fn new(uid: impl Into<String>, uidc: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            uidc: uidc.into(),
        }
    }

    /// Parse the `credentials:` section of a YAML document.
    pub fn from_yaml(src: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<CredentialsFile>(src).map(|f| f.credentials)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&src).map_err(|source| ConfigError::Credentials {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration for [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Export endpoint.
    pub root: String,
    /// Directory holding `credentials.yml`, `country-code.csv` and the indicator tables.
    pub cfg_dir: PathBuf,
    /// Total request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Exclusive upper bound of the indexes scanned when building a lookup table.
    pub probe_max_index: u32,
    /// Pause after every probe request.
    pub probe_delay: Duration,
    /// Country used for probe requests.
    pub probe_country: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.into(),
            cfg_dir: PathBuf::from("cfg"),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("gecon-rs/", env!("CARGO_PKG_VERSION")).into(),
            probe_max_index: 2000,
            probe_delay: Duration::from_millis(100),
            probe_country: "IN".into(),
        }
    }
}

impl ClientConfig {
    pub fn with_cfg_dir(cfg_dir: impl Into<PathBuf>) -> Self {
        Self {
            cfg_dir: cfg_dir.into(),
            ..Self::default()
        }
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.cfg_dir.join("credentials.yml")
    }

    pub fn country_table_path(&self) -> PathBuf {
        self.cfg_dir.join("country-code.csv")
    }

    pub fn indicator_table_path(&self, frequency: Frequency) -> PathBuf {
        self.cfg_dir.join(frequency.lookup_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_accept_numbers_and_strings() {
        let c = Credentials::from_yaml(
            "credentials:\n  uid: 90902\n  uidc: 0318f527ddfd08c361f1df372fdfd2e4\n",
        )
        .unwrap();
        assert_eq!(c, Credentials::new("90902", "0318f527ddfd08c361f1df372fdfd2e4"));

        let c = Credentials::from_yaml("credentials:\n  uid: 'abc'\n  uidc: 17\n").unwrap();
        assert_eq!(c.uid, "abc");
        assert_eq!(c.uidc, "17");
    }

    #[test]
    fn credentials_require_section() {
        assert!(Credentials::from_yaml("uid: 1\nuidc: 2\n").is_err());
    }

    #[test]
    fn missing_credentials_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::load(dir.path().join("credentials.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn paths_live_under_cfg_dir() {
        let cfg = ClientConfig::with_cfg_dir("/tmp/ge");
        assert_eq!(
            cfg.indicator_table_path(Frequency::Annual),
            PathBuf::from("/tmp/ge/indicator-annual.csv")
        );
        assert_eq!(cfg.country_table_path(), PathBuf::from("/tmp/ge/country-code.csv"));
    }
}
