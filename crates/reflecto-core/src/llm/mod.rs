//! LLM completion-client abstraction.

pub mod client;

pub use client::CompletionClient;
