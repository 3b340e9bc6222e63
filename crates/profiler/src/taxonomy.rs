use std::sync::Arc;

use analysis::TaxonomyEntry;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use gh_client::HttpExec;
use http::{header, Request};
use tracing::{debug, instrument};
use url::Url;

/// Where the keyword taxonomy comes from. Loaded once per inference run and
/// treated as read-only.
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    async fn load(&self) -> Result<Vec<TaxonomyEntry>>;
}

/// Remote JSON list of `{label, value}` entries.
pub struct HttpTaxonomySource {
    exec: Arc<dyn HttpExec>,
    url: Url,
    user_agent: String,
}

impl HttpTaxonomySource {
    pub fn new(exec: Arc<dyn HttpExec>, url: Url, user_agent: impl Into<String>) -> Self {
        Self {
            exec,
            url,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl TaxonomySource for HttpTaxonomySource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<Vec<TaxonomyEntry>> {
        let uri: http::Uri = self.url.as_str().parse()?;
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone())
            .header(header::ACCEPT, "application/json")
            .body(Vec::new())?;
        let response = self.exec.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("taxonomy request returned {status}"));
        }
        let entries: Vec<TaxonomyEntry> =
            serde_json::from_slice(response.body()).context("decoding taxonomy entries")?;
        debug!(entries = entries.len(), "taxonomy loaded");
        Ok(entries)
    }
}

/// Fixed in-memory taxonomy.
#[derive(Debug, Clone, Default)]
pub struct StaticTaxonomy(pub Vec<TaxonomyEntry>);

#[async_trait]
impl TaxonomySource for StaticTaxonomy {
    async fn load(&self) -> Result<Vec<TaxonomyEntry>> {
        Ok(self.0.clone())
    }
}
