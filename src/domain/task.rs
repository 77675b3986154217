use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::errors::RelayError;

// Task names accepted by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    GenerateBlog,
    SeoAnalysis,
    ImageGenerate,
    ImageEdit,
}

// Upstream call a task is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegate {
    Text,
    Image,
}

impl TaskKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "generate_blog" => Some(TaskKind::GenerateBlog),
            "seo_analysis" => Some(TaskKind::SeoAnalysis),
            "image_generate" => Some(TaskKind::ImageGenerate),
            "image_edit" => Some(TaskKind::ImageEdit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::GenerateBlog => "generate_blog",
            TaskKind::SeoAnalysis => "seo_analysis",
            TaskKind::ImageGenerate => "image_generate",
            TaskKind::ImageEdit => "image_edit",
        }
    }

    pub fn delegate(self) -> Delegate {
        match self {
            TaskKind::GenerateBlog | TaskKind::SeoAnalysis => Delegate::Text,
            TaskKind::ImageGenerate | TaskKind::ImageEdit => Delegate::Image,
        }
    }
}

// Inbound `{ task, payload }` envelope, taken apart without per-field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEnvelope {
    // Present only when the body carried a string `task`.
    pub task: Option<String>,
    // JSON `null` is treated the same as a missing payload.
    pub payload: Option<Value>,
}

impl TaskEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|err| RelayError::MalformedBody(err.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RelayError> {
        match value {
            Value::Null => Err(RelayError::MalformedBody(
                "request body must be a JSON object".to_string(),
            )),
            Value::Object(mut fields) => {
                let task = match fields.remove("task") {
                    Some(Value::String(task)) => Some(task),
                    _ => None,
                };
                let payload = fields.remove("payload").filter(|value| !value.is_null());
                Ok(TaskEnvelope { task, payload })
            }
            // Scalars and arrays carry no task; they fall through to the unknown-task path.
            _ => Ok(TaskEnvelope {
                task: None,
                payload: None,
            }),
        }
    }

    pub fn kind(&self) -> Result<TaskKind, RelayError> {
        self.task
            .as_deref()
            .and_then(TaskKind::parse)
            .ok_or(RelayError::UnknownTask)
    }
}

// Input of the text generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    pub prompt: Option<Value>,
    // Only kept when truthy; falsy values are dropped before the upstream call.
    pub tools: Option<Value>,
}

impl TextGenerationRequest {
    pub fn from_payload(payload: Option<Value>) -> Result<Self, RelayError> {
        let payload = payload.ok_or_else(|| missing_payload("prompt"))?;
        let mut fields = into_fields(payload);

        Ok(TextGenerationRequest {
            prompt: fields.remove("prompt"),
            tools: fields.remove("tools").filter(is_truthy),
        })
    }
}

// Input of the image generation call. `prompt` and `config` are forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerationRequest {
    #[serde(skip)]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ImageGenerationRequest {
    pub fn from_payload(payload: Option<Value>) -> Result<Self, RelayError> {
        let payload = payload.ok_or_else(|| missing_payload("model"))?;
        let mut fields = into_fields(payload);

        let model = match fields.remove("model") {
            Some(Value::String(model)) if !model.trim().is_empty() => model,
            _ => {
                return Err(RelayError::InvalidPayload(
                    "payload.model must be a non-empty string".to_string(),
                ));
            }
        };

        Ok(ImageGenerationRequest {
            model,
            prompt: fields.remove("prompt"),
            config: fields.remove("config"),
        })
    }
}

fn missing_payload(field: &str) -> RelayError {
    RelayError::InvalidPayload(format!("Cannot read payload.{field}: payload is missing"))
}

fn into_fields(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(fields) => fields,
        _ => Map::new(),
    }
}

// Loose truthiness used to decide whether optional fields are forwarded.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
