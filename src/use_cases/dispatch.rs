use serde_json::Value;
use std::sync::Arc;

use crate::domain::errors::RelayError;
use crate::domain::ports::GenerativeProvider;
use crate::domain::task::{
    Delegate, ImageGenerationRequest, TaskEnvelope, TaskKind, TextGenerationRequest,
};

// Successful dispatch: the task that ran and the upstream body to pass through.
pub struct DispatchTaskResponse {
    pub task: TaskKind,
    pub body: Value,
}

// Failed dispatch. `task` is set once the task name was recognized, so failures
// further down can still be attributed to it.
#[derive(Debug)]
pub struct DispatchTaskFailure {
    pub task: Option<TaskKind>,
    pub error: RelayError,
}

impl From<RelayError> for DispatchTaskFailure {
    fn from(error: RelayError) -> Self {
        DispatchTaskFailure { task: None, error }
    }
}

// Task dispatch use case with the provider injected.
pub struct DispatchTaskUseCase {
    pub provider: Arc<dyn GenerativeProvider>,
}

impl DispatchTaskUseCase {
    pub async fn execute(&self, body: &[u8]) -> Result<DispatchTaskResponse, DispatchTaskFailure> {
        let envelope = TaskEnvelope::from_slice(body)?;
        // Unknown tasks are rejected before the payload is looked at.
        let task = envelope.kind()?;
        // Recorded on the caller's span so provider and failure logs carry the task.
        tracing::Span::current().record("task", task.as_str());

        match self.delegate(task, envelope.payload).await {
            Ok(body) => Ok(DispatchTaskResponse { task, body }),
            Err(error) => Err(DispatchTaskFailure {
                task: Some(task),
                error,
            }),
        }
    }

    async fn delegate(&self, task: TaskKind, payload: Option<Value>) -> Result<Value, RelayError> {
        let body = match task.delegate() {
            Delegate::Text => {
                let req = TextGenerationRequest::from_payload(payload)?;
                self.provider.generate_text(req).await?
            }
            Delegate::Image => {
                let req = ImageGenerationRequest::from_payload(payload)?;
                self.provider.generate_image(req).await?
            }
        };

        Ok(body)
    }
}
