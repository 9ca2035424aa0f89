//! Business logic for Reflecto.
//!
//! This crate defines the conversation store, the completion-client port,
//! and the orchestrator that turns user text into assistant replies. It
//! depends only on `reflecto-types` -- never on `reflecto-infra` or any
//! HTTP/IO crate.

pub mod chat;
pub mod conversation;
pub mod llm;
