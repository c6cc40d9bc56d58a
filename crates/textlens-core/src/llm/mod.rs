//! LLM judge boundary
//!
//! The only place textlens talks to an external service: a chat
//! completion call for LLM-judged metrics and an embeddings call for
//! semantic similarity.

pub mod client;
pub mod messages;
pub mod provider;

#[cfg(test)]
mod client_http_tests;

pub use client::JudgeClient;
pub use messages::{FunctionSpec, JudgeMessage, JudgeResponse, JudgeRole};
pub use provider::{JudgeProvider, ModelParameters, ProviderConfig};
