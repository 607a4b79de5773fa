/// What the user sees for any failed lookup, whatever the cause.
pub const USER_MESSAGE: &str = "Error fetching weather data. Please try again.";

/// Failure of a location or weather lookup.
///
/// The variants keep the detail for logs; the user is only ever shown
/// [`USER_MESSAGE`].
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Request to {service} failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed {service} response: {reason}")]
    Malformed { service: &'static str, reason: String },
}

impl LookupError {
    pub fn user_message(&self) -> &'static str {
        USER_MESSAGE
    }
}
