use gh_client::GithubApiError;
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Api(#[from] GithubApiError),
    #[error(
        "the access token belongs to {token_owner}, not {requested}; private repositories can only be read for the token owner"
    )]
    IdentityMismatch {
        requested: String,
        token_owner: String,
    },
    #[error("failed to load keyword taxonomy: {0}")]
    Taxonomy(#[source] anyhow::Error),
    #[error("failed to compile keyword taxonomy: {0}")]
    Keywords(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum DevtoError {
    #[error("dev.to user {username} does not exist")]
    UnknownUser { username: String },
    #[error("dev.to returned {status} for {username}")]
    Status { status: StatusCode, username: String },
    #[error("dev.to request failed: {0}")]
    Transport(#[source] anyhow::Error),
    #[error("failed to decode dev.to response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid dev.to url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
