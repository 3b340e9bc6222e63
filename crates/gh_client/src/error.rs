use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthContext;

/// Terminal failures of a GitHub call. None of these are retried; rate-limit
/// exhaustion observed while paginating is reported as truncation instead.
#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("this request requires a GitHub access token; provide one and try again")]
    AuthRequired,
    #[error("invalid GitHub access token; check the token and try again")]
    AuthInvalid,
    #[error("{}", rate_limit_message(.authenticated))]
    RateLimited { authenticated: bool },
    #[error("the requested data is unavailable ({endpoint}); check the parameters and try again")]
    NotFound { endpoint: String },
    #[error("GraphQL API query error: {message}")]
    GraphQl { message: String },
    #[error("github api error: {status} for {endpoint}")]
    Upstream { status: StatusCode, endpoint: String },
    #[error("transport error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected response shape from {endpoint}: expected {expected}")]
    Shape {
        endpoint: String,
        expected: &'static str,
    },
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

fn rate_limit_message(authenticated: &bool) -> &'static str {
    if *authenticated {
        "API rate limit exceeded, please try again later"
    } else {
        "API rate limit exceeded, please provide an access token to increase the rate limit"
    }
}

impl GithubApiError {
    /// Maps a response status onto the error taxonomy. `Ok(())` for 2xx.
    pub fn classify(
        status: StatusCode,
        auth: &AuthContext,
        endpoint: impl Into<String>,
    ) -> Result<(), Self> {
        if status.is_success() {
            return Ok(());
        }
        let err = match status {
            StatusCode::UNAUTHORIZED if auth.is_authenticated() => GithubApiError::AuthInvalid,
            StatusCode::UNAUTHORIZED => GithubApiError::AuthRequired,
            StatusCode::FORBIDDEN => GithubApiError::RateLimited {
                authenticated: auth.is_authenticated(),
            },
            StatusCode::NOT_FOUND => GithubApiError::NotFound {
                endpoint: endpoint.into(),
            },
            other => GithubApiError::Upstream {
                status: other,
                endpoint: endpoint.into(),
            },
        };
        Err(err)
    }

    /// GraphQL reports query failures with a 200 and an `errors` array.
    pub fn check_graphql(body: &Value) -> Result<(), Self> {
        match body.get("errors").and_then(Value::as_array) {
            Some(errors) if !errors.is_empty() => {
                let message = errors
                    .iter()
                    .find_map(|err| err.get("message").and_then(Value::as_str))
                    .unwrap_or("unknown GraphQL error")
                    .to_string();
                Err(GithubApiError::GraphQl { message })
            }
            _ => Ok(()),
        }
    }
}
