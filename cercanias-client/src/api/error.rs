//! Rapi client error types.

/// Errors from the Rapi HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request URL could not be built (bad base URL or path segment)
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed (no connectivity, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist (HTTP 404)
    #[error("not found: {message}")]
    NotFound { message: String },

    /// API returned a non-success status other than 404
    #[error("API error {status}: {message}")]
    Server { status: u16, message: String },

    /// Response body didn't match the expected shape
    #[error("decode error: {message}")]
    Decode {
        message: String,
        body: Option<String>,
    },

    /// The client's request slots were shut down
    #[error("client is shut down")]
    Shutdown,

    /// Departure or arrival station left empty
    #[error("departure and arrival stations are required")]
    MissingStation,

    /// Departure and arrival are the same station
    #[error("departure and arrival stations are the same")]
    SameStation,
}

impl ApiError {
    /// Whether the failure came from the network rather than the server.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }

    /// Message suitable for showing to the user next to a retry button.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) if e.is_timeout() => {
                "Request timed out. Please try again.".to_string()
            }
            ApiError::Http(e) if e.is_connect() => {
                "Please check your internet connection and try again.".to_string()
            }
            ApiError::Http(e) => format!("Network error: {e}"),
            ApiError::NotFound { .. } => {
                "The requested data couldn't be found because it is missing.".to_string()
            }
            ApiError::Server { status, .. } => {
                format!("The server returned an error ({status}). Please try again later.")
            }
            ApiError::Decode { .. } => {
                "The server sent data we couldn't read. Please try again later.".to_string()
            }
            ApiError::InvalidUrl(_) => "Could not build the request for this query.".to_string(),
            ApiError::Shutdown => "The app is shutting down. Please try again.".to_string(),
            ApiError::MissingStation => {
                "Please select departure and arrival stations".to_string()
            }
            ApiError::SameStation => {
                "Please select different stations for departure and arrival".to_string()
            }
        }
    }
}
