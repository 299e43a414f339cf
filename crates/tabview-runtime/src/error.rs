use std::fmt;

/// Result type for tabview-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Criteria/model validation error from the types layer
    Types(tabview_types::Error),

    /// Data source request failed (retryable; the view keeps its last
    /// good data)
    Fetch(String),

    /// Configuration error
    Config(String),

    /// Invalid operation for the current view phase
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "Model error: {}", err),
            Error::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Fetch(_) | Error::Config(_) | Error::InvalidOperation(_) => None,
        }
    }
}

impl From<tabview_types::Error> for Error {
    fn from(err: tabview_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
