pub mod auth;
pub mod client;
pub mod error;
pub mod exec;
pub mod metrics;
pub mod model;
pub mod pagination;

pub use auth::{AuthContext, GithubToken};
pub use client::{ApiResponse, GithubHttp};
pub use error::GithubApiError;
pub use exec::{HttpExec, ReqwestExecutor};
pub use model::Budget;
pub use pagination::{collect_pages, Paged};
