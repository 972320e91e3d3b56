//! CMS NPI registry lookups.

use crate::{CoreError, CoreResult};
use api_shared::pb;
use serde::Deserialize;
use serde_json::Value;
use tonic::async_trait;

#[cfg(test)]
use mockall::automock;

/// Looks up providers by National Provider Identifier.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NpiRegistry: Send + Sync + 'static {
    /// Returns the registry's provider details, or `None` when the NPI is unknown.
    async fn lookup(&self, npi_number: &str) -> CoreResult<Option<pb::Provider>>;
}

#[derive(Debug, Default, Deserialize)]
struct NpiResponse {
    #[serde(default)]
    results: Vec<NpiResult>,
}

/// One entry of the registry's `results` array.
#[derive(Debug, Default, Deserialize)]
pub struct NpiResult {
    /// The registry returns the number as either a JSON number or string.
    #[serde(default)]
    pub number: Value,
    #[serde(default)]
    pub basic: NpiBasic,
    #[serde(default)]
    pub taxonomies: Vec<NpiTaxonomy>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NpiBasic {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NpiTaxonomy {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub primary: bool,
}

/// Maps a registry result onto an unsaved provider.
pub fn provider_from_npi_result(result: NpiResult) -> pb::Provider {
    let npi_number = match &result.number {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    };

    let taxonomy = result
        .taxonomies
        .iter()
        .find(|t| t.primary)
        .or_else(|| result.taxonomies.first())
        .map(|t| t.desc.clone())
        .unwrap_or_default();

    let status = match result.basic.status.as_str() {
        "A" => pb::ProviderStatus::Active,
        "" => pb::ProviderStatus::Unspecified,
        _ => pb::ProviderStatus::Inactive,
    };

    pb::Provider {
        npi_number,
        first_name: result.basic.first_name,
        last_name: result.basic.last_name,
        credential: result.basic.credential,
        taxonomy,
        organization_name: result.basic.organization_name,
        status: status as i32,
        ..Default::default()
    }
}

/// Queries the public NPI registry API (`?version=2.1&number=<npi>`).
#[derive(Clone, Debug)]
pub struct HttpNpiRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNpiRegistry {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl NpiRegistry for HttpNpiRegistry {
    async fn lookup(&self, npi_number: &str) -> CoreResult<Option<pb::Provider>> {
        tracing::debug!(npi_number, "querying NPI registry");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("version", "2.1"), ("number", npi_number)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::ExternalService(format!(
                "NPI registry returned {status}"
            )));
        }

        let body: NpiResponse = response.json().await?;
        Ok(body.results.into_iter().next().map(provider_from_npi_result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_http_client;
    use crate::http::test_support::serve_once;
    use std::time::Duration;

    const SAMPLE: &str = r#"{
        "result_count": 1,
        "results": [{
            "number": 1234567893,
            "basic": {"first_name": "ADA", "last_name": "LOVELACE", "credential": "MD", "status": "A"},
            "taxonomies": [
                {"desc": "Radiology", "primary": false},
                {"desc": "Family Medicine", "primary": true}
            ]
        }]
    }"#;

    #[test]
    fn test_provider_from_result_prefers_primary_taxonomy() {
        let result: NpiResponse = serde_json::from_str(SAMPLE).unwrap();
        let provider = provider_from_npi_result(result.results.into_iter().next().unwrap());
        assert_eq!(provider.npi_number, "1234567893");
        assert_eq!(provider.first_name, "ADA");
        assert_eq!(provider.taxonomy, "Family Medicine");
        assert_eq!(provider.status, pb::ProviderStatus::Active as i32);
    }

    #[tokio::test]
    async fn test_http_lookup_sends_version_and_number() {
        let (url, captured) = serve_once(200, SAMPLE).await;
        let registry = HttpNpiRegistry::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            format!("{url}/api/"),
        );

        let provider = registry.lookup("1234567893").await.unwrap();
        assert_eq!(provider.map(|p| p.last_name), Some("LOVELACE".into()));

        let request = captured.await.unwrap();
        assert!(request.head.starts_with("GET /api/?version=2.1&number=1234567893 "));
    }

    #[tokio::test]
    async fn test_http_lookup_empty_results_is_none() {
        let (url, _captured) = serve_once(200, r#"{"result_count":0,"results":[]}"#).await;
        let registry =
            HttpNpiRegistry::new(build_http_client(Duration::from_secs(5)).unwrap(), url);
        assert_eq!(registry.lookup("1234567893").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_http_lookup_error_status_is_external_failure() {
        let (url, _captured) = serve_once(503, "{}").await;
        let registry =
            HttpNpiRegistry::new(build_http_client(Duration::from_secs(5)).unwrap(), url);
        let err = registry.lookup("1234567893").await.unwrap_err();
        assert!(matches!(err, CoreError::ExternalService(_)));
    }
}
