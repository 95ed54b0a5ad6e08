use thiserror::Error;

/// Everything that can go wrong while talking to the country-data provider.
///
/// None of these are fatal: front ends turn each variant into a user message.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The user submitted an empty (or whitespace-only) name.
    #[error("country name must not be empty")]
    EmptyName,
    /// The provider has no exact full-text match for the name.
    #[error("country not found: {name}")]
    NotFound { name: String },
    /// The provider answered with a non-success status.
    #[error("request failed with HTTP {status}")]
    FetchFailed { status: u16 },
    /// The request never got a response (DNS, refused connection, timeout, ...).
    #[error("connection error: {0}")]
    Connection(String),
    /// A success response whose body could not be decoded.
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl LookupError {
    /// Message shown to the user when a single-country lookup fails.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::EmptyName => "Please enter a country name.".to_string(),
            LookupError::NotFound { .. } => "Country not found. Please check spelling.".to_string(),
            LookupError::FetchFailed { .. } | LookupError::Connection(_) | LookupError::Decode(_) => {
                format!("Could not reach the country service: {}", self)
            }
        }
    }
}
