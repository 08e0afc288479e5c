//! DeepSeek API client struct and builder.

use relay_types::{ChatMessage, RelayError, Role};
use tokio_util::sync::CancellationToken;

use crate::error::{map_http_status, map_reqwest_error};
use crate::lines::{LineStream, split_lines};
use crate::types::{ChatCompletion, ChatRequest, WireMessage};

/// Default model used when none is configured.
const DEFAULT_MODEL: &str = "deepseek-reasoner";

/// Default DeepSeek API base URL.
const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Environment variable holding the API key (required by [`DeepSeek::from_env`]).
pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";
/// Environment variable overriding the base URL (optional).
pub const BASE_URL_VAR: &str = "DEEPSEEK_BASE_URL";
/// Environment variable overriding the model (optional).
pub const MODEL_VAR: &str = "DEEPSEEK_MODEL";

/// Client for the DeepSeek Chat Completions API.
///
/// Holds one shared `reqwest::Client`; a single instance serves any number
/// of concurrent relay sessions.
///
/// # Example
///
/// ```no_run
/// use relay_provider_deepseek::DeepSeek;
///
/// let client = DeepSeek::new("sk-...")
///     .model("deepseek-reasoner")
///     .base_url("https://api.deepseek.com");
/// ```
pub struct DeepSeek {
    /// DeepSeek API key.
    pub(crate) api_key: String,
    /// Model identifier sent with every request.
    pub(crate) model: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Sampling temperature sent with every request.
    pub(crate) temperature: f64,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl DeepSeek {
    /// Create a new client with the given API key and sensible defaults.
    ///
    /// Default model: `deepseek-reasoner`.
    /// Default base URL: `https://api.deepseek.com`.
    /// Default temperature: `0.7`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            temperature: DEFAULT_TEMPERATURE,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from process environment variables.
    ///
    /// `DEEPSEEK_API_KEY` is required; its absence is a
    /// [`RelayError::Config`] so startup fails before any request is
    /// attempted. `DEEPSEEK_BASE_URL` and `DEEPSEEK_MODEL` optionally
    /// override the defaults.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a client from a configuration lookup function.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RelayError> {
        let api_key = lookup(API_KEY_VAR)
            .ok_or_else(|| RelayError::Config(format!("{API_KEY_VAR} is not set")))?;
        let mut client = Self::new(api_key);
        if let Some(url) = lookup(BASE_URL_VAR) {
            client = client.base_url(url);
        }
        if let Some(model) = lookup(MODEL_VAR) {
            client = client.model(model);
        }
        Ok(client)
    }

    /// Override the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or an API proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the chat completions endpoint URL.
    pub(crate) fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Build the request body for the given message.
    fn request_body(&self, message: &ChatMessage, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![WireMessage {
                role: wire_role(message.role).into(),
                content: message.content.clone(),
            }],
            temperature: self.temperature,
            stream,
        }
    }

    /// Send a single blocking completion request and return the reply.
    ///
    /// Maps a non-2xx status to [`RelayError::UpstreamHttp`] with the body
    /// text preserved for diagnostics, and extracts
    /// `choices[0].message.content` from the response.
    pub async fn complete(&self, message: &ChatMessage) -> Result<ChatMessage, RelayError> {
        let url = self.completions_url();
        let body = self.request_body(message, false);

        tracing::debug!(url = %url, model = %body.model, "sending completion request to DeepSeek");

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(map_http_status(status, &text));
        }

        let completion: ChatCompletion = serde_json::from_str(&text)
            .map_err(|e| RelayError::Decode(format!("invalid completion response: {e}")))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::Protocol("completion response has no choices".into()))?;

        Ok(ChatMessage::bot(choice.message.content))
    }

    /// Open a streaming completion and return its raw SSE lines.
    ///
    /// Lines are produced lazily as network data arrives; the whole response
    /// is never buffered. There is no client-side timeout — the stream runs
    /// until the provider closes it or `cancellation` fires, which is
    /// checked between line reads.
    pub async fn open(
        &self,
        message: &ChatMessage,
        cancellation: CancellationToken,
    ) -> Result<LineStream, RelayError> {
        let url = self.completions_url();
        let body = self.request_body(message, true);

        tracing::debug!(url = %url, model = %body.model, "opening streaming completion to DeepSeek");

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // Still read the body: it carries the provider's diagnostic text
            let text = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &text));
        }

        Ok(split_lines(response.bytes_stream(), cancellation))
    }
}

/// Map a relay [`Role`] to the provider's wire role name.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Bot => "assistant",
    }
}
