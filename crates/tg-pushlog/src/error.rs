use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushlogError {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("HTTP request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid pushlog response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to find a single pushlog_id for {repository} revision {revision}: {pushes}")]
    AmbiguousPushInfo {
        repository: String,
        revision: String,
        pushes: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PushlogResult<T> = Result<T, PushlogError>;
