//! OpenFDA NDC directory search.

use crate::{CoreError, CoreResult};
use api_shared::pb;
use reqwest::StatusCode;
use serde::Deserialize;
use tonic::async_trait;

#[cfg(test)]
use mockall::automock;

/// Number of suggestions requested from the catalog.
const SEARCH_LIMIT: &str = "20";

/// Searches a drug catalog by brand name.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DrugCatalog: Send + Sync + 'static {
    /// Returns unsaved medication suggestions for `brand_name`.
    async fn search(&self, brand_name: &str) -> CoreResult<Vec<pb::Medication>>;
}

#[derive(Debug, Default, Deserialize)]
struct NdcResponse {
    #[serde(default)]
    results: Vec<NdcProduct>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NdcProduct {
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub generic_name: String,
    #[serde(default)]
    pub dosage_form: String,
    #[serde(default)]
    pub route: Vec<String>,
    #[serde(default)]
    pub active_ingredients: Vec<NdcIngredient>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NdcIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strength: String,
}

/// Maps an NDC product to a medication suggestion.
pub fn medication_from_ndc_product(product: NdcProduct) -> pb::Medication {
    let name = if product.brand_name.is_empty() {
        product.generic_name
    } else {
        product.brand_name
    };

    let dosage = product
        .active_ingredients
        .iter()
        .map(|i| i.strength.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    pb::Medication {
        medication_name: name,
        dosage,
        route: product.route.join(", "),
        ..Default::default()
    }
}

/// Queries the OpenFDA NDC endpoint.
#[derive(Clone, Debug)]
pub struct OpenFdaCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl OpenFdaCatalog {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DrugCatalog for OpenFdaCatalog {
    async fn search(&self, brand_name: &str) -> CoreResult<Vec<pb::Medication>> {
        let search = format!("brand_name:\"{brand_name}\"");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("search", search.as_str()), ("limit", SEARCH_LIMIT)])
            .send()
            .await?;

        // OpenFDA answers 404 when nothing matches.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::ExternalService(format!("OpenFDA returned {status}")));
        }

        let body: NdcResponse = response.json().await?;
        Ok(body
            .results
            .into_iter()
            .map(medication_from_ndc_product)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_http_client;
    use crate::http::test_support::serve_once;
    use std::time::Duration;

    fn catalog(url: String) -> OpenFdaCatalog {
        OpenFdaCatalog::new(build_http_client(Duration::from_secs(5)).unwrap(), url)
    }

    #[test]
    fn test_product_mapping_falls_back_to_generic_name() {
        let med = medication_from_ndc_product(NdcProduct {
            generic_name: "ibuprofen".into(),
            route: vec!["ORAL".into()],
            active_ingredients: vec![NdcIngredient {
                name: "IBUPROFEN".into(),
                strength: "200 mg/1".into(),
            }],
            ..Default::default()
        });
        assert_eq!(med.medication_name, "ibuprofen");
        assert_eq!(med.dosage, "200 mg/1");
        assert_eq!(med.route, "ORAL");
        assert!(med.id.is_empty());
    }

    #[tokio::test]
    async fn test_search_builds_brand_name_query() {
        let (url, captured) = serve_once(
            200,
            r#"{"results":[{"brand_name":"Advil","route":["ORAL"],"active_ingredients":[{"name":"IBUPROFEN","strength":"200 mg/1"}]}]}"#,
        )
        .await;

        let meds = catalog(url).search("Advil").await.unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].medication_name, "Advil");

        let request = captured.await.unwrap();
        assert!(
            request
                .head
                .starts_with("GET /?search=brand_name%3A%22Advil%22&limit=20 "),
            "unexpected request line: {}",
            request.head
        );
    }

    #[tokio::test]
    async fn test_search_not_found_is_empty() {
        let (url, _captured) = serve_once(404, r#"{"error":{"code":"NOT_FOUND"}}"#).await;
        assert!(catalog(url).search("Nothing").await.unwrap().is_empty());
    }
}
