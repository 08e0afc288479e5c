//! DeepSeek chat-completions client for the token-relay workspace.
//!
//! Implements the upstream side of the relay: an authenticated POST to the
//! [DeepSeek Chat Completions API](https://api-docs.deepseek.com/), either as
//! a single blocking completion or as a lazy stream of raw SSE lines for the
//! relay core to parse.
//!
//! # Usage
//!
//! ```no_run
//! use relay_provider_deepseek::DeepSeek;
//!
//! let client = DeepSeek::new("sk-...")
//!     .model("deepseek-reasoner")
//!     .base_url("https://api.deepseek.com");
//! ```
//!
//! The client holds one shared `reqwest::Client` and is safe for concurrent
//! use from any number of relay sessions.

pub mod client;
pub(crate) mod error;
pub mod lines;
pub mod types;

pub use client::DeepSeek;
pub use lines::LineStream;
