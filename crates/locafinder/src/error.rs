//! Error types for Locafinder.

use std::path::PathBuf;

use locafinder_net::NetworkError;

/// Result type alias for Locafinder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the map, selection and action layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A remote collaborator could not be reached or answered with an error status.
    #[error("Network failure: {0}")]
    NetworkFailure(#[source] NetworkError),

    /// A remote collaborator answered with a payload that could not be used.
    #[error("Malformed response: {0}")]
    MalformedResponse(#[source] NetworkError),

    /// Required form fields are missing; nothing was sent.
    #[error("Missing required input: {}", .fields.join(", "))]
    UserInputIncomplete { fields: Vec<&'static str> },

    /// No position source is available or it refused to start.
    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    /// Configuration file could not be read.
    #[error("Failed to read configuration '{}': {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid.
    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be written out.
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Create an incomplete-input error for the given field names.
    pub fn incomplete(fields: Vec<&'static str>) -> Self {
        Self::UserInputIncomplete { fields }
    }

    /// Create a geolocation error.
    pub fn geolocation(message: impl Into<String>) -> Self {
        Self::GeolocationUnavailable(message.into())
    }

    /// Whether this error came from a remote collaborator.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::MalformedResponse(_))
    }
}

impl From<NetworkError> for Error {
    fn from(err: NetworkError) -> Self {
        if err.is_malformed_response() {
            Self::MalformedResponse(err)
        } else {
            Self::NetworkFailure(err)
        }
    }
}
