use std::fmt::Debug;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("inference failed: {0}")]
    Inference(#[source] anyhow::Error),
    #[error("failed to write report: {0}")]
    Output(#[source] anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn inference(err: impl Into<anyhow::Error>) -> Self {
        Self::Inference(err.into())
    }

    pub fn output(err: impl Into<anyhow::Error>) -> Self {
        Self::Output(err.into())
    }
}
