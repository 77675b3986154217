use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::ProviderError;
use crate::domain::task::{ImageGenerationRequest, TextGenerationRequest};

// Port for the generative-AI provider. Both calls return the upstream JSON body
// untouched so the relay can pass it through verbatim.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate_text(&self, req: TextGenerationRequest) -> Result<Value, ProviderError>;
    async fn generate_image(&self, req: ImageGenerationRequest) -> Result<Value, ProviderError>;
}
