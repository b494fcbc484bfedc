//! Generative-AI collaborator for food analysis, meditation guidance and
//! nutrition coaching.
//!
//! - [`client`] -- HTTP client for the `generateContent` API.
//! - [`parse`] -- JSON extraction from model replies with fallback.
//! - [`analysis`] -- result types, prompts and static fallbacks.
//! - [`service`] -- the [`service::AiAnalyzer`] seam used by the API.

pub mod analysis;
pub mod client;
pub mod parse;
pub mod service;

pub use client::{GenAiClient, GenAiConfig, GenAiError, InlineImage};
pub use service::{AiAnalyzer, AiOutcome, GenAiService};
