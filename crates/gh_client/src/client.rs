use std::sync::Arc;
use std::time::Instant;

use http::{header, HeaderMap, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::AuthContext;
use crate::error::GithubApiError;
use crate::exec::HttpExec;
use crate::metrics;
use crate::model::{parse_next_link, parse_remaining, Budget};

const DEFAULT_API_URL: &str = "https://api.github.com/";
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub endpoint: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GithubApiError> {
        serde_json::from_slice(&self.body).map_err(|source| GithubApiError::Decode {
            endpoint: self.endpoint.clone(),
            source,
        })
    }

    pub fn next_link(&self) -> Option<String> {
        parse_next_link(&self.headers)
    }

    pub fn remaining(&self) -> Option<i64> {
        parse_remaining(&self.headers)
    }
}

/// Authenticated GitHub transport: builds requests, classifies statuses and
/// records request metrics. Holds no state between calls besides its config.
pub struct GithubHttp {
    exec: Arc<dyn HttpExec>,
    auth: AuthContext,
    base: Url,
    graphql: Url,
    user_agent: String,
}

impl GithubHttp {
    pub fn new(exec: Arc<dyn HttpExec>, auth: AuthContext, user_agent: impl Into<String>) -> Self {
        Self {
            exec,
            auth,
            base: Url::parse(DEFAULT_API_URL).expect("valid base url"),
            graphql: Url::parse(DEFAULT_GRAPHQL_URL).expect("valid graphql url"),
            user_agent: user_agent.into(),
        }
    }

    pub fn with_endpoints(mut self, api_url: &str, graphql_url: &str) -> Result<Self, GithubApiError> {
        self.base = as_base(parse_url(api_url)?);
        self.graphql = parse_url(graphql_url)?;
        Ok(self)
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn join(&self, path: &str) -> Result<Url, GithubApiError> {
        self.base
            .join(path)
            .map_err(|source| GithubApiError::InvalidUrl {
                url: path.to_string(),
                source,
            })
    }

    /// GET with the status classified into [`GithubApiError`].
    pub async fn get(&self, url: Url) -> Result<ApiResponse, GithubApiError> {
        let response = self.send(Method::GET, url, Vec::new()).await?;
        GithubApiError::classify(response.status, &self.auth, response.endpoint.clone())?;
        Ok(response)
    }

    /// GET that hands back any status untouched; callers decide what a
    /// non-2xx means (a missing README is not an error).
    pub async fn get_lenient(&self, url: Url) -> Result<ApiResponse, GithubApiError> {
        self.send(Method::GET, url, Vec::new()).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GithubApiError> {
        self.get(url).await?.json()
    }

    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value, GithubApiError> {
        let payload = json!({
            "query": query,
            "variables": variables,
        });
        let body = serde_json::to_vec(&payload).map_err(|source| GithubApiError::Decode {
            endpoint: "graphql".to_string(),
            source,
        })?;
        let response = self.send(Method::POST, self.graphql.clone(), body).await?;
        GithubApiError::classify(response.status, &self.auth, "graphql")?;
        let value: Value = response.json()?;
        GithubApiError::check_graphql(&value)?;
        Ok(value)
    }

    #[instrument(skip(self, body), fields(url = %url))]
    async fn send(&self, method: Method, url: Url, body: Vec<u8>) -> Result<ApiResponse, GithubApiError> {
        let endpoint = endpoint_label(&url);
        let budget = Budget::classify(url.path(), None);
        let request = self
            .build_request(method, &url, body)
            .map_err(|source| GithubApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        debug!(endpoint = %endpoint, budget = budget.as_str(), "Dispatching GitHub request");
        let start = Instant::now();
        let response = self
            .exec
            .execute(request)
            .await
            .map_err(|source| GithubApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        metrics::LATENCY
            .with_label_values(&[budget.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let (parts, body) = response.into_parts();
        let budget = Budget::classify(url.path(), parts.headers.get("x-ratelimit-resource"));
        metrics::REQUESTS_TOTAL
            .with_label_values(&[budget.as_str(), metrics::status_class(parts.status)])
            .inc();
        let remaining = parse_remaining(&parts.headers);
        if let Some(remaining) = remaining {
            metrics::RATE_REMAINING
                .with_label_values(&[budget.as_str()])
                .set(remaining);
        }
        if !parts.status.is_success() {
            warn!(
                status = %parts.status,
                endpoint = %endpoint,
                budget = budget.as_str(),
                rate_limit_remaining = remaining,
                "GitHub returned error response"
            );
        }

        Ok(ApiResponse {
            status: parts.status,
            headers: parts.headers,
            body,
            endpoint,
        })
    }

    fn build_request(&self, method: Method, url: &Url, body: Vec<u8>) -> anyhow::Result<Request<Vec<u8>>> {
        let uri: http::Uri = url.as_str().parse()?;
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if !body.is_empty() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(value) = self.auth.authorization()? {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        Ok(builder.body(body)?)
    }
}

pub fn parse_url(raw: &str) -> Result<Url, GithubApiError> {
    Url::parse(raw).map_err(|source| GithubApiError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Relative joins replace the last path segment unless the base ends in `/`,
/// so `https://ghe.example.com/api/v3` is treated as `.../api/v3/`.
pub fn as_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn endpoint_label(url: &Url) -> String {
    url.path().trim_start_matches('/').to_string()
}
