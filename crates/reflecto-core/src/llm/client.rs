//! CompletionClient trait definition.
//!
//! The single remote capability the core consumes: send a bounded turn
//! sequence with fixed sampling parameters, get the reply text back. Any
//! provider speaking a compatible completion protocol can implement this.

use reflecto_types::llm::{CompletionRequest, LlmError};

/// Trait for remote completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The
/// orchestrator is generic over implementations, so no object-safe
/// wrapper is needed. Implementations live in reflecto-infra.
pub trait CompletionClient: Send + Sync {
    /// Human-readable backend name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the reply text.
    ///
    /// This is the one suspension point of a `respond` call: an I/O-bound
    /// network round trip that resumes with either a reply or an error.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
