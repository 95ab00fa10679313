//! Crate-level error types.
//!
//! Each layer owns one enum: [`TransportError`] for the HTTP/cache layer,
//! [`BlogError`] for the blog facade, [`ConfigError`] for configuration
//! loading and [`EditorError`] for malformed visual-editor payloads.

use thiserror::Error;

/// Failure of the underlying content-delivery call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote server replied with a non-2xx HTTP status code.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },
    /// A TCP-level connection could not be established or the request
    /// did not complete.
    #[error("Connection failed to {url}: {detail}")]
    Connect { url: String, detail: String },
    /// Response body could not be parsed as JSON.
    #[error("JSON parse error on '{field}': {detail}")]
    Json { field: String, detail: String },
}

impl TransportError {
    /// HTTP status carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Failure of a blog-level operation.
#[derive(Debug, Error)]
pub enum BlogError {
    /// A hard-fail fetch operation could not complete. `operation` reads as
    /// a verb phrase, e.g. "fetch blog posts".
    #[error("Failed to {operation}: {message}")]
    Fetch {
        operation: &'static str,
        message: String,
    },
    /// The response arrived but did not have the expected shape.
    #[error("Failed to {operation}: unexpected response: {detail}")]
    Shape {
        operation: &'static str,
        detail: String,
    },
}

impl BlogError {
    pub(crate) fn fetch(operation: &'static str, source: &TransportError) -> Self {
        BlogError::Fetch {
            operation,
            message: source.to_string(),
        }
    }
}

/// Failure while loading [`crate::config::BlogConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("no access token configured; set STORYBLOK_TOKEN or access_token in the config file")]
    MissingToken,
}

/// Malformed payload received from the visual-editor bridge.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid bridge event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
    #[error("unknown bridge action '{0}'")]
    UnknownAction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_http_error_display_carries_status_and_url() {
        let err = TransportError::Http {
            status: 503,
            url: "https://api.storyblok.com/v2/cdn/stories".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("503"), "status in display: {s}");
        assert!(s.contains("cdn/stories"), "url in display: {s}");
    }

    #[test]
    fn test_transport_not_found_detected_from_status() {
        let err = TransportError::Http { status: 404, url: "x".to_string() };
        assert!(err.is_not_found());
        let err = TransportError::Connect { url: "x".to_string(), detail: "refused".to_string() };
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_blog_fetch_error_wraps_original_message() {
        let source = TransportError::Connect {
            url: "https://api".to_string(),
            detail: "connection refused".to_string(),
        };
        let err = BlogError::fetch("fetch blog posts", &source);
        let s = err.to_string();
        assert!(s.starts_with("Failed to fetch blog posts: "), "display: {s}");
        assert!(s.contains("connection refused"), "display: {s}");
    }

    #[test]
    fn test_missing_token_mentions_env_var() {
        assert!(ConfigError::MissingToken.to_string().contains("STORYBLOK_TOKEN"));
    }

    #[test]
    fn test_editor_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: EditorError = serde_err.into();
        assert!(err.to_string().starts_with("invalid bridge event"));
    }
}
