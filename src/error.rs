use format_serde_error::SerdeError;
use reqwest_middleware::reqwest::StatusCode;
use serde::Serialize;

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}

impl std::fmt::Debug for TickTickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Errors that stop the caller: they are never folded into an [`ApiError`]
#[derive(thiserror::Error)]
pub enum TickTickError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<config::ConfigError> for TickTickError {
    fn from(error: config::ConfigError) -> Self {
        TickTickError::Configuration(error.to_string())
    }
}

/// Failure of a remote call, returned to the caller instead of being raised.
///
/// Serializes as `{"error": ..., "status": ..., "body": ...}`.
#[derive(thiserror::Error, Serialize, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    #[serde(rename = "error")]
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn from_status(status: StatusCode, url: &str, body: String) -> Self {
        let kind = if status.is_client_error() {
            "Client Error"
        } else {
            "Server Error"
        };
        ApiError {
            message: format!("{} {kind} for url {url}: {body}", status.as_u16()),
            status: Some(status.as_u16()),
            body: Some(body),
        }
    }

    pub fn network(error: impl std::fmt::Display) -> Self {
        ApiError {
            message: format!("Network error: {error}"),
            status: None,
            body: None,
        }
    }

    pub fn from_json_serde_error(serde_error: serde_json::Error, input: String) -> Self {
        let rendered = SerdeError::new(input.clone(), serde_error).to_string();
        ApiError {
            message: format!("Json parsing error: {rendered}"),
            status: None,
            body: Some(input),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}
