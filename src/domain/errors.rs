use std::fmt;

// Failures raised by a generative provider call.
#[derive(Debug, Clone)]
pub enum ProviderError {
    // The request never produced an upstream response.
    Transport(String),
    // Upstream answered with a non-success status; `message` is already resolved
    // from the upstream body or the per-call fallback.
    Upstream { status: u16, message: String },
    // Upstream answered with a success status but the body was not JSON.
    Decode(String),
    // The upstream URL could not be built from the configured base and model.
    InvalidEndpoint(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(message)
            | ProviderError::Decode(message)
            | ProviderError::InvalidEndpoint(message) => f.write_str(message),
            ProviderError::Upstream { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for ProviderError {}

// Domain-level errors for the dispatch workflow.
#[derive(Debug)]
pub enum RelayError {
    UnknownTask,
    MalformedBody(String),
    InvalidPayload(String),
    Provider(ProviderError),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::UnknownTask => f.write_str("Unknown task"),
            RelayError::MalformedBody(message) | RelayError::InvalidPayload(message) => {
                f.write_str(message)
            }
            RelayError::Provider(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        RelayError::Provider(err)
    }
}
