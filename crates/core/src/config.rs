//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Binaries read environment variables and feed the raw values
//! through the `*_from_env_value` helpers below; core code never reads the environment while
//! handling a request.

use crate::constants::{
    DEFAULT_CDC_ENDPOINT, DEFAULT_DATA_DIR, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_NOTIFICATION_INTERVAL_SECS, DEFAULT_NPI_REGISTRY_URL, DEFAULT_OPENFDA_URL,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Where documents are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON documents under the data directory, sharded by record id.
    File,
    /// Process-local maps; contents vanish on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(CoreError::NotAcceptable(format!(
                "unknown storage backend '{other}' (expected 'file' or 'memory')"
            ))),
        }
    }
}

/// Settings for the CDC reporting endpoint.
#[derive(Clone, Debug)]
pub struct CdcConfig {
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    storage: StorageBackend,
    data_dir: PathBuf,
    notification_interval: Duration,
    cdc: CdcConfig,
    npi_registry_url: String,
    openfda_url: String,
    http_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with default endpoints and intervals.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAcceptable` if `data_dir` is empty.
    pub fn new(storage: StorageBackend, data_dir: PathBuf) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::NotAcceptable(
                "data directory cannot be empty".into(),
            ));
        }

        Ok(Self {
            storage,
            data_dir,
            notification_interval: Duration::from_secs(DEFAULT_NOTIFICATION_INTERVAL_SECS),
            cdc: CdcConfig {
                endpoint: DEFAULT_CDC_ENDPOINT.into(),
                headers: Vec::new(),
            },
            npi_registry_url: DEFAULT_NPI_REGISTRY_URL.into(),
            openfda_url: DEFAULT_OPENFDA_URL.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    pub fn with_notification_interval(mut self, interval: Duration) -> Self {
        self.notification_interval = interval;
        self
    }

    pub fn with_cdc(mut self, endpoint: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        self.cdc = CdcConfig {
            endpoint: endpoint.into(),
            headers,
        };
        self
    }

    pub fn with_npi_registry_url(mut self, url: impl Into<String>) -> Self {
        self.npi_registry_url = url.into();
        self
    }

    pub fn with_openfda_url(mut self, url: impl Into<String>) -> Self {
        self.openfda_url = url.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn storage(&self) -> StorageBackend {
        self.storage
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Interval between scheduled notification scans. Zero disables the scheduler.
    pub fn notification_interval(&self) -> Duration {
        self.notification_interval
    }

    pub fn cdc(&self) -> &CdcConfig {
        &self.cdc
    }

    pub fn npi_registry_url(&self) -> &str {
        &self.npi_registry_url
    }

    pub fn openfda_url(&self) -> &str {
        &self.openfda_url
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the storage backend from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`StorageBackend::File`].
pub fn storage_backend_from_env_value(value: Option<String>) -> CoreResult<StorageBackend> {
    trimmed(value)
        .map(|v| v.parse())
        .transpose()
        .map(|parsed| parsed.unwrap_or(StorageBackend::File))
}

/// Parse a whole number of seconds, falling back to `default_secs` when unset.
pub fn seconds_from_env_value(
    name: &str,
    value: Option<String>,
    default_secs: u64,
) -> CoreResult<Duration> {
    let secs = match trimmed(value) {
        Some(v) => v.parse::<u64>().map_err(|_| {
            CoreError::NotAcceptable(format!("{name} must be a whole number of seconds, got '{v}'"))
        })?,
        None => default_secs,
    };
    Ok(Duration::from_secs(secs))
}

/// Parse static HTTP headers written as `name=value` pairs separated by `;`.
///
/// Empty segments are ignored, so a trailing `;` is harmless.
///
/// # Errors
///
/// Returns `CoreError::NotAcceptable` if a segment has no `=` or an empty name.
pub fn headers_from_env_value(value: Option<String>) -> CoreResult<Vec<(String, String)>> {
    let Some(raw) = trimmed(value) else {
        return Ok(Vec::new());
    };

    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                CoreError::NotAcceptable(format!("header '{segment}' is not in name=value form"))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(CoreError::NotAcceptable(format!(
                    "header '{segment}' has an empty name"
                )));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Builds a [`CoreConfig`] from `CDX_*` variables resolved through `lookup`.
///
/// Binaries pass `|name| std::env::var(name).ok()`; tests pass a map.
pub fn core_config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> CoreResult<CoreConfig> {
    let storage = storage_backend_from_env_value(lookup("CDX_STORAGE"))?;
    let data_dir = trimmed(lookup("CDX_DATA_DIR")).unwrap_or_else(|| DEFAULT_DATA_DIR.into());

    let mut cfg = CoreConfig::new(storage, PathBuf::from(data_dir))?
        .with_notification_interval(seconds_from_env_value(
            "CDX_NOTIFICATION_INTERVAL_SECS",
            lookup("CDX_NOTIFICATION_INTERVAL_SECS"),
            DEFAULT_NOTIFICATION_INTERVAL_SECS,
        )?)
        .with_http_timeout(seconds_from_env_value(
            "CDX_HTTP_TIMEOUT_SECS",
            lookup("CDX_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

    let cdc_endpoint =
        trimmed(lookup("CDX_CDC_ENDPOINT")).unwrap_or_else(|| DEFAULT_CDC_ENDPOINT.into());
    cfg = cfg.with_cdc(cdc_endpoint, headers_from_env_value(lookup("CDX_CDC_HEADERS"))?);

    if let Some(url) = trimmed(lookup("CDX_NPI_REGISTRY_URL")) {
        cfg = cfg.with_npi_registry_url(url);
    }
    if let Some(url) = trimmed(lookup("CDX_OPENFDA_URL")) {
        cfg = cfg.with_openfda_url(url);
    }
    Ok(cfg)
}

/// Reads the API key; blank values leave authentication disabled.
pub fn api_key_from_env_value(value: Option<String>) -> Option<String> {
    trimmed(value)
}

/// Interprets a boolean flag such as `CDX_ENABLE_REFLECTION`. Only `true` and `1` enable it.
pub fn flag_from_env_value(value: Option<String>) -> bool {
    matches!(
        trimmed(value).map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_new_rejects_empty_data_dir() {
        let err = CoreConfig::new(StorageBackend::File, PathBuf::new())
            .expect_err("empty data dir should be rejected");
        assert!(matches!(err, CoreError::NotAcceptable(_)));
    }

    #[test]
    fn test_new_applies_defaults() {
        let cfg = CoreConfig::new(StorageBackend::Memory, PathBuf::from("data"))
            .expect("config should build");
        assert_eq!(cfg.storage(), StorageBackend::Memory);
        assert_eq!(cfg.cdc().endpoint, DEFAULT_CDC_ENDPOINT);
        assert_eq!(
            cfg.notification_interval(),
            Duration::from_secs(DEFAULT_NOTIFICATION_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!(
            storage_backend_from_env_value(None).unwrap(),
            StorageBackend::File
        );
        assert_eq!(
            storage_backend_from_env_value(Some(" Memory ".into())).unwrap(),
            StorageBackend::Memory
        );
        assert!(storage_backend_from_env_value(Some("mongo".into())).is_err());
    }

    #[test]
    fn test_seconds_parsing() {
        assert_eq!(
            seconds_from_env_value("X", None, 7).unwrap(),
            Duration::from_secs(7)
        );
        assert_eq!(
            seconds_from_env_value("X", Some("0".into()), 7).unwrap(),
            Duration::ZERO
        );
        assert!(seconds_from_env_value("X", Some("soon".into()), 7).is_err());
    }

    #[test]
    fn test_headers_parsing() {
        let headers =
            headers_from_env_value(Some("Authorization=Bearer abc; X-Org = cdx ;".into()))
                .expect("headers should parse");
        assert_eq!(
            headers,
            vec![
                ("Authorization".to_string(), "Bearer abc".to_string()),
                ("X-Org".to_string(), "cdx".to_string()),
            ]
        );

        assert!(headers_from_env_value(None).unwrap().is_empty());
        assert!(headers_from_env_value(Some("novalue".into())).is_err());
        assert!(headers_from_env_value(Some("=value".into())).is_err());
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CDX_STORAGE", "memory"),
            ("CDX_DATA_DIR", "/tmp/cdx"),
            ("CDX_NOTIFICATION_INTERVAL_SECS", "0"),
            ("CDX_CDC_HEADERS", "Authorization=Bearer t"),
            ("CDX_OPENFDA_URL", "http://localhost:9000/ndc.json"),
        ]);
        let cfg = core_config_from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .expect("config should build");

        assert_eq!(cfg.storage(), StorageBackend::Memory);
        assert_eq!(cfg.data_dir(), Path::new("/tmp/cdx"));
        assert_eq!(cfg.notification_interval(), Duration::ZERO);
        assert_eq!(cfg.cdc().endpoint, DEFAULT_CDC_ENDPOINT);
        assert_eq!(cfg.cdc().headers.len(), 1);
        assert_eq!(cfg.openfda_url(), "http://localhost:9000/ndc.json");
        assert_eq!(cfg.npi_registry_url(), DEFAULT_NPI_REGISTRY_URL);
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let cfg = core_config_from_lookup(|_| None).expect("defaults should build");
        assert_eq!(cfg.storage(), StorageBackend::File);
        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert_eq!(cfg.http_timeout(), Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn test_flags_and_api_key() {
        assert!(flag_from_env_value(Some("TRUE".into())));
        assert!(flag_from_env_value(Some("1".into())));
        assert!(!flag_from_env_value(Some("yes".into())));
        assert!(!flag_from_env_value(None));
        assert_eq!(api_key_from_env_value(Some("  ".into())), None);
        assert_eq!(api_key_from_env_value(Some(" k ".into())).as_deref(), Some("k"));
    }
}
