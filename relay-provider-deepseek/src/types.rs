//! DeepSeek Chat Completions API request/response types.
//!
//! The wire format is OpenAI-compatible. Streaming chunk fields are fully
//! optional: a chunk is decoded once per line into [`StreamChunk`] and then
//! inspected through structured field access, so role-only or
//! finish-reason-only chunks simply read out as "no content".

use serde::{Deserialize, Serialize};

/// Chat Completions API request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "deepseek-reasoner").
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<WireMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Whether to stream the response as SSE.
    pub stream: bool,
}

/// A message in the provider's wire format.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role: "user", "assistant", or "system".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Non-streaming Chat Completions response body.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    /// Response choices.
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// A single choice in a non-streaming response.
#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    /// The generated message.
    pub message: WireMessage,
}

/// One streaming chunk, i.e. the JSON payload of a single `data:` line.
///
/// Every field is optional so that any well-formed chunk decodes, whatever
/// subset of the schema it carries.
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    /// Streaming choices.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A single choice within a streaming chunk.
#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    /// The incremental update for this choice.
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
    /// Why generation stopped, on the closing chunk.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The incremental update inside a streaming choice.
#[derive(Debug, Deserialize)]
pub struct ChunkDelta {
    /// Role announcement, on the opening chunk.
    #[serde(default)]
    pub role: Option<String>,
    /// The content fragment. May be the empty string, which is still a
    /// valid increment.
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    /// The content fragment of the first choice, if this chunk carries one.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.as_ref()?.content.as_deref()
    }
}
