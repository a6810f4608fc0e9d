//! Error types for archive requests

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {method} request to {url} failed with status code: {status}")]
    HttpStatus {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("Invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ProtocolError {
    /// Status code of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_carries_url_and_code() {
        let err = ProtocolError::HttpStatus {
            method: "GET",
            url: "https://archive.openrs2.org/caches.json".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "HTTP GET request to https://archive.openrs2.org/caches.json failed with status code: 503"
        );
        assert_eq!(err.status(), Some(503));
        assert_eq!(ProtocolError::InvalidEndpoint("x".into()).status(), None);
    }
}
