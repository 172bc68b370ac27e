use thiserror::Error;

use crate::domain::entities::exchange::Exchange;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("API key not set: define {0} in the environment or .env file")]
    MissingApiKey(&'static str),

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl TransportError {
    /// HTTP status code, when the failure came from the remote server
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Unexpected {exchange} payload: {reason}")]
    UnexpectedPayload { exchange: Exchange, reason: String },
}

impl ExchangeError {
    pub fn unexpected(exchange: Exchange, reason: impl Into<String>) -> Self {
        ExchangeError::UnexpectedPayload {
            exchange,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Table exceeds worksheet limits at {0}")]
    TooLarge(String),
}

/// Anything that aborts a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}
