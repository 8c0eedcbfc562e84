use thiserror::Error;

/// Errors returned by the deals backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, or an error envelope carrying a `statusCode`.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body carried an `error` member.
    #[error("Backend error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid backend URL '{0}'")]
    InvalidUrl(String),
}
