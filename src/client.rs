//! HTTP client for the catalog and resolver endpoints
//!
//! Endpoints, relative to the configured base URL:
//! - `GET /items?type={base|custom}` - list recipes
//! - `PUT /items` - create or replace a recipe
//! - `DELETE /items/{id}` - delete a recipe
//! - `GET /calculate/{id}?quantity={n}` - raw material breakdown

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::catalog::RecipeCatalog;
use crate::error::{CatalogError, ResolveError, Result};
use crate::models::{Breakdown, CatalogKind, Recipe};
use crate::resolver::BreakdownResolver;

/// Talks to the recipe service over HTTP
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client; `timeout` of `None` lets requests wait indefinitely
    pub fn new(base_url: Url, timeout: Option<Duration>) -> anyhow::Result<Self> {
        if base_url.cannot_be_a_base() {
            bail!("Base URL cannot carry a path: {}", base_url);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl RecipeCatalog for ApiClient {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<Recipe>> {
        let mut url = self.endpoint(&["items"]);
        url.query_pairs_mut().append_pair("type", kind.as_str());
        debug!("Fetching {} recipes from {}", kind, url);

        let fetch_err = |reason: String| CatalogError::Fetch { kind, reason };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| fetch_err(format!("invalid JSON: {}", e)))?;

        if !body.is_array() {
            return Err(CatalogError::UnexpectedFormat { kind });
        }

        let recipes: Vec<Recipe> =
            serde_json::from_value(body).map_err(|_| CatalogError::UnexpectedFormat { kind })?;

        debug!("Fetched {} {} recipes", recipes.len(), kind);
        Ok(recipes)
    }

    async fn create(&self, recipe: &Recipe) -> Result<()> {
        let url = self.endpoint(&["items"]);
        debug!("Creating recipe {} at {}", recipe.id, url);

        let create_err = |reason: String| CatalogError::Create {
            id: recipe.id.clone(),
            reason,
        };

        let response = self
            .client
            .put(url)
            .json(recipe)
            .send()
            .await
            .map_err(|e| create_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(create_err(format!("HTTP {}", status)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["items", id]);
        debug!("Deleting recipe {} at {}", id, url);

        let delete_err = |reason: String| CatalogError::Delete {
            id: id.to_string(),
            reason,
        };

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| delete_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(delete_err(format!("HTTP {}", status)));
        }
        Ok(())
    }
}

#[async_trait]
impl BreakdownResolver for ApiClient {
    async fn try_resolve(&self, recipe_id: &str, quantity: u64) -> Result<Breakdown, ResolveError> {
        let mut url = self.endpoint(&["calculate", recipe_id]);
        url.query_pairs_mut()
            .append_pair("quantity", &quantity.max(1).to_string());
        debug!("Resolving breakdown via {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| ResolveError::Malformed(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), None).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = client("https://api.example.com");
        assert_eq!(api.endpoint(&["items"]).as_str(), "https://api.example.com/items");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://api.example.com/prod/");
        assert_eq!(
            api.endpoint(&["calculate", "gear"]).as_str(),
            "https://api.example.com/prod/calculate/gear"
        );
    }

    #[test]
    fn test_endpoint_encodes_id_as_one_segment() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.endpoint(&["items", "a/b c"]).as_str(),
            "http://localhost:8080/items/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(ApiClient::new(Url::parse("mailto:someone@example.com").unwrap(), None).is_err());
    }

    #[tokio::test]
    async fn test_resolve_unreachable_returns_empty() {
        // Port 1 on loopback is not expected to be listening
        let api = client("http://127.0.0.1:1");
        assert!(api.try_resolve("gear", 1).await.is_err());

        let breakdown = api.resolve("gear", 1).await;
        assert!(breakdown.raw_materials.is_empty());
        assert!(breakdown.missing_recipes.is_empty());
    }
}
