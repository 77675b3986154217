use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::field::{Field, Visit};
use tracing::span::{Id, Record};
use tracing_subscriber::layer::{Context, Layer};

use crate::domain::errors::ProviderError;
use crate::domain::ports::GenerativeProvider;
use crate::domain::task::{ImageGenerationRequest, TextGenerationRequest};

// One recorded provider invocation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ProviderCall {
    Text(TextGenerationRequest),
    Image(ImageGenerationRequest),
}

// Fake provider that records every request and replays canned responses.
#[derive(Clone)]
pub(crate) struct RecordingProvider {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    text_response: Value,
    image_response: Value,
    failure: Option<ProviderError>,
}

impl RecordingProvider {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            text_response: json!({ "candidates": [] }),
            image_response: json!({ "generatedImages": [] }),
            failure: None,
        }
    }

    pub(crate) fn with_text_response(mut self, response: Value) -> Self {
        self.text_response = response;
        self
    }

    pub(crate) fn with_image_response(mut self, response: Value) -> Self {
        self.image_response = response;
        self
    }

    pub(crate) fn with_failure(mut self, err: ProviderError) -> Self {
        self.failure = Some(err);
        self
    }

    pub(crate) fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl GenerativeProvider for RecordingProvider {
    async fn generate_text(&self, req: TextGenerationRequest) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Text(req));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.text_response.clone()),
        }
    }

    async fn generate_image(&self, req: ImageGenerationRequest) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Image(req));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.image_response.clone()),
        }
    }
}

// Layer that collects every value recorded into a span's `task` field.
#[derive(Clone, Default)]
pub(crate) struct TaskFieldRecorder {
    tasks: Arc<Mutex<Vec<String>>>,
}

impl TaskFieldRecorder {
    pub(crate) fn tasks(&self) -> Vec<String> {
        self.tasks.lock().expect("tasks mutex poisoned").clone()
    }
}

struct TaskVisitor<'a>(&'a mut Vec<String>);

impl Visit for TaskVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "task" {
            self.0.push(value.to_string());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl<S: tracing::Subscriber> Layer<S> for TaskFieldRecorder {
    fn on_record(&self, _id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut tasks = self.tasks.lock().expect("tasks mutex poisoned");
        values.record(&mut TaskVisitor(&mut tasks));
    }
}
