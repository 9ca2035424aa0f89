//! Shared domain types for Reflecto.
//!
//! This crate contains the core domain types used across the Reflecto
//! conversational proxy: turns, completion requests, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod turn;
