pub mod errors;
pub mod ports;
pub mod task;

// Re-export the domain boundary types and ports.
pub use errors::{ProviderError, RelayError};
pub use ports::GenerativeProvider;
pub use task::{Delegate, ImageGenerationRequest, TaskEnvelope, TaskKind, TextGenerationRequest};
