use crate::domain::{GenerativeProvider, ImageGenerationRequest, ProviderError, TextGenerationRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

const TEXT_FALLBACK_MESSAGE: &str = "Gemini API failed";
const IMAGE_FALLBACK_MESSAGE: &str = "Image generation failed";

// Thin wrapper around reqwest for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: Url,
    api_key: String,
    text_model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorResponse {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: Url, api_key: impl Into<String>, text_model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
            text_model: text_model.into(),
        }
    }

    // Builds `{base}/v1beta/models/{model}:{action}?key=...`. Slashes in `model` become
    // path separators; `.` and `..` segments are dropped and `?`/`#` stay encoded.
    fn endpoint(&self, model: &str, action: &str) -> Result<Url, ProviderError> {
        let (prefix, name) = model.rsplit_once('/').unwrap_or(("", model));
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProviderError::InvalidEndpoint(format!(
                    "provider base url {} cannot carry a path",
                    self.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(["v1beta", "models"])
                .extend(prefix.split('/').filter(|segment| !segment.is_empty()))
                .push(&format!("{name}:{action}"));
        }
        tracing::debug!(endpoint = %url, "provider endpoint resolved.");

        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn post_json<B>(&self, url: Url, body: &B, fallback: &str) -> Result<Value, ProviderError>
    where
        B: Serialize + ?Sized,
    {
        // `without_url` keeps the credential in the query string out of error messages.
        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.without_url().to_string()))?;
        let status = res.status();

        // Buffer the whole body; nothing is streamed back to the caller.
        let bytes = res
            .bytes()
            .await
            .map_err(|err| ProviderError::Transport(err.without_url().to_string()))?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&bytes),
                "provider call failed."
            );
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&bytes).unwrap_or_else(|| fallback.to_string()),
            });
        }

        serde_json::from_slice::<Value>(&bytes).map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

// Pulls `error.message` out of an upstream error body; empty messages count as absent.
fn upstream_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<UpstreamErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
        .and_then(|detail| detail.message)
        .filter(|message| !message.is_empty())
}

fn text_request_body(req: &TextGenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: [Content {
            role: "user",
            parts: [Part {
                text: req.prompt.as_ref(),
            }],
        }],
        tools: req.tools.as_ref(),
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate_text(&self, req: TextGenerationRequest) -> Result<Value, ProviderError> {
        let url = self.endpoint(&self.text_model, "generateContent")?;
        self.post_json(url, &text_request_body(&req), TEXT_FALLBACK_MESSAGE)
            .await
    }

    async fn generate_image(&self, req: ImageGenerationRequest) -> Result<Value, ProviderError> {
        let url = self.endpoint(&req.model, "generateImage")?;
        self.post_json(url, &req, IMAGE_FALLBACK_MESSAGE).await
    }
}
