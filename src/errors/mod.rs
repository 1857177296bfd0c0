/// Structured error types for the performance cache
///
/// Fetch failures carry enough context (endpoint, status, body) to be
/// diagnosed from logs alone. Errors are cloneable because a single
/// failed fetch may have to settle several attached waiters.

/// Failure of one remote performance fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Could not reach the endpoint at all
    Connection {
        endpoint: String,
        reason: String,
    },

    /// The request went out but the server answered with a non-success status
    HttpStatus {
        endpoint: String,
        status: u16,
        body: Option<String>,
    },

    /// The response body did not parse as a performance series
    Decode {
        endpoint: String,
        reason: String,
    },

    /// The request was dropped before a fetch could settle it
    /// (cache shut down while the request was still queued)
    Abandoned,

    Generic {
        message: String,
    },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Connection { endpoint, reason } => {
                write!(f, "Connection to {} failed: {}", endpoint, reason)
            }
            FetchError::HttpStatus {
                endpoint,
                status,
                body,
            } => {
                write!(
                    f,
                    "HTTP {} from {}: {}",
                    status,
                    endpoint,
                    body.as_deref().unwrap_or("No body")
                )
            }
            FetchError::Decode { endpoint, reason } => {
                write!(f, "Failed to decode response from {}: {}", endpoint, reason)
            }
            FetchError::Abandoned => {
                write!(f, "Request abandoned before completion")
            }
            FetchError::Generic { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = FetchError::HttpStatus {
            endpoint: "https://api.example.com/portfolio/performance".to_string(),
            status: 503,
            body: Some("maintenance".to_string()),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("503"));
        assert!(rendered.contains("maintenance"));
    }
}
