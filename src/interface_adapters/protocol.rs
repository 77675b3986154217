use serde::Serialize;

// The only body shape returned on failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
