use std::sync::Arc;
use std::time::Instant;

use gh_client::client::as_base;
use gh_client::HttpExec;
use http::{header, Request, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::DevtoError;
use crate::metrics;

/// Thin client for the public Dev.to user lookup; the response is passed
/// through as raw JSON.
pub struct DevtoClient {
    exec: Arc<dyn HttpExec>,
    base: Url,
    user_agent: String,
}

impl DevtoClient {
    pub fn new(exec: Arc<dyn HttpExec>, api_url: &str, user_agent: impl Into<String>) -> Result<Self, DevtoError> {
        Ok(Self {
            exec,
            base: as_base(Url::parse(api_url)?),
            user_agent: user_agent.into(),
        })
    }

    pub async fn fetch_user(&self, username: &str) -> Result<Value, DevtoError> {
        let started = Instant::now();
        let result = self.lookup(username).await;
        metrics::RUNS_TOTAL
            .with_label_values(&["devto", metrics::outcome(&result)])
            .inc();
        metrics::RUN_DURATION
            .with_label_values(&["devto"])
            .observe(started.elapsed().as_secs_f64());
        result
    }

    #[instrument(skip(self))]
    async fn lookup(&self, username: &str) -> Result<Value, DevtoError> {
        let mut url = self.base.join("users/by_username")?;
        url.query_pairs_mut().append_pair("url", username);
        let uri: http::Uri = url
            .as_str()
            .parse()
            .map_err(|err: http::uri::InvalidUri| DevtoError::Transport(err.into()))?;
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone())
            .header(header::ACCEPT, "application/json")
            .body(Vec::new())
            .map_err(|err| DevtoError::Transport(err.into()))?;

        let response = self.exec.execute(request).await.map_err(DevtoError::Transport)?;
        match response.status() {
            status if status.is_success() => {
                debug!(username, "dev.to user found");
                Ok(serde_json::from_slice(response.body())?)
            }
            StatusCode::NOT_FOUND => Err(DevtoError::UnknownUser {
                username: username.to_string(),
            }),
            status => Err(DevtoError::Status {
                status,
                username: username.to_string(),
            }),
        }
    }
}
