//! Completion orchestrator.
//!
//! `ChatOrchestrator` is the sole boundary that absorbs remote failures:
//! `respond` always returns a plain string, so all downstream transport
//! code reduces to "render this string". It holds no conversation state of
//! its own -- the store is owned and passed in by the caller on every
//! operation.

use tracing::{error, info_span, Instrument};

use reflecto_types::llm::{CompletionRequest, LlmError, ModelParams};
use reflecto_types::turn::TurnRole;

use crate::conversation::ConversationStore;
use crate::llm::CompletionClient;

const RATE_LIMIT_FALLBACK: &str =
    "Rate limit exceeded. Please wait a moment before trying again.";
const AUTH_FALLBACK: &str = "Authentication failed. Please check your API key.";

/// Drives one conversation exchange against a completion backend.
///
/// Generic over the `CompletionClient` port so tests can substitute a
/// scripted backend.
pub struct ChatOrchestrator<C: CompletionClient> {
    client: C,
    params: ModelParams,
}

impl<C: CompletionClient> ChatOrchestrator<C> {
    /// Create an orchestrator with a backend and fixed sampling parameters.
    pub fn new(client: C, params: ModelParams) -> Self {
        Self { client, params }
    }

    /// Access the fixed sampling parameters.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Produce the assistant's next reply for `user_text`.
    ///
    /// Appends the user turn, sends the store's full current sequence to
    /// the backend, and on success appends the whitespace-trimmed reply as
    /// an assistant turn. On failure the error is classified into a
    /// user-facing fallback string which is returned but NOT appended --
    /// the failed exchange is not recorded as a successful assistant
    /// reply. Never returns an error.
    pub async fn respond(&self, store: &mut ConversationStore, user_text: &str) -> String {
        store.append(TurnRole::User, user_text);

        let request = CompletionRequest {
            params: self.params.clone(),
            turns: store.snapshot().to_vec(),
        };

        let span = info_span!(
            "chat.respond",
            backend = self.client.name(),
            model = %request.params.model,
            context_turns = request.turns.len(),
        );

        match self.client.complete(&request).instrument(span).await {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                store.append(TurnRole::Assistant, reply.clone());
                reply
            }
            Err(err) => fallback_for(&err),
        }
    }
}

/// Map a completion failure to a stable user-facing fallback string.
///
/// Structured variants are matched first; the free-text `Provider` channel
/// falls back to substring classification.
fn fallback_for(err: &LlmError) -> String {
    match err {
        LlmError::RateLimited => RATE_LIMIT_FALLBACK.to_string(),
        LlmError::AuthenticationFailed => AUTH_FALLBACK.to_string(),
        LlmError::InvalidRequest(msg) => format!("Invalid request: {msg}"),
        LlmError::Provider { message } => classify_message(message),
    }
}

/// Substring classification for free-text error messages.
///
/// Case-insensitive, first-match-wins over the ordered rules. Kept as a
/// compatibility path for providers that only expose prose errors.
fn classify_message(message: &str) -> String {
    let lower = message.to_lowercase();
    if lower.contains("rate_limit") {
        RATE_LIMIT_FALLBACK.to_string()
    } else if lower.contains("authentication") {
        AUTH_FALLBACK.to_string()
    } else if lower.contains("invalid") {
        format!("Invalid request: {message}")
    } else {
        error!(message, "Unclassified completion failure");
        format!("An error occurred: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted backend returning one queued outcome per call.
    struct ScriptedClient {
        outcomes: Mutex<Vec<Result<String, LlmError>>>,
    }

    impl ScriptedClient {
        fn replying(reply: &str) -> Self {
            Self {
                outcomes: Mutex::new(vec![Ok(reply.to_string())]),
            }
        }

        fn failing(err: LlmError) -> Self {
            Self {
                outcomes: Mutex::new(vec![Err(err)]),
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .expect("scripted client called more times than scripted")
        }
    }

    fn orchestrator(client: ScriptedClient) -> ChatOrchestrator<ScriptedClient> {
        ChatOrchestrator::new(client, ModelParams::default())
    }

    #[tokio::test]
    async fn test_respond_success_appends_user_and_assistant() {
        let orch = orchestrator(ScriptedClient::replying("OK"));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hello").await;

        assert_eq!(reply, "OK");
        assert_eq!(store.len(), 3);
        assert_eq!(store.snapshot()[1].role, TurnRole::User);
        assert_eq!(store.snapshot()[1].content, "hello");
        assert_eq!(store.snapshot()[2].role, TurnRole::Assistant);
        assert_eq!(store.snapshot()[2].content, "OK");
    }

    #[tokio::test]
    async fn test_respond_trims_reply_whitespace() {
        let orch = orchestrator(ScriptedClient::replying("  well then  \n"));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hi").await;

        assert_eq!(reply, "well then");
        assert_eq!(store.snapshot()[2].content, "well then");
    }

    #[tokio::test]
    async fn test_respond_rate_limit_freetext_mixed_case() {
        let orch = orchestrator(ScriptedClient::failing(LlmError::Provider {
            message: "Rate_Limit exceeded".to_string(),
        }));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hello").await;

        assert_eq!(
            reply,
            "Rate limit exceeded. Please wait a moment before trying again."
        );
        // Only the user turn was appended; no assistant turn for the failure.
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot()[1].role, TurnRole::User);
    }

    #[tokio::test]
    async fn test_respond_rate_limit_structured() {
        let orch = orchestrator(ScriptedClient::failing(LlmError::RateLimited));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hello").await;
        assert_eq!(
            reply,
            "Rate limit exceeded. Please wait a moment before trying again."
        );
    }

    #[tokio::test]
    async fn test_respond_authentication_failure() {
        let orch = orchestrator(ScriptedClient::failing(LlmError::AuthenticationFailed));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hello").await;
        assert_eq!(reply, "Authentication failed. Please check your API key.");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_respond_invalid_request_echoes_detail() {
        let orch = orchestrator(ScriptedClient::failing(LlmError::InvalidRequest(
            "model does not exist".to_string(),
        )));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hello").await;
        assert_eq!(reply, "Invalid request: model does not exist");
    }

    #[tokio::test]
    async fn test_respond_catchall() {
        let orch = orchestrator(ScriptedClient::failing(LlmError::Provider {
            message: "Something weird".to_string(),
        }));
        let mut store = ConversationStore::new("Be helpful.");

        let reply = orch.respond(&mut store, "hello").await;
        assert_eq!(reply, "An error occurred: Something weird");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_classify_message_first_match_wins() {
        // "rate_limit" outranks "invalid" even when both appear.
        let text = classify_message("rate_limit hit for invalid key");
        assert_eq!(
            text,
            "Rate limit exceeded. Please wait a moment before trying again."
        );

        // "authentication" outranks "invalid".
        let text = classify_message("authentication rejected: invalid key");
        assert_eq!(text, "Authentication failed. Please check your API key.");
    }

    #[test]
    fn test_classify_message_invalid_preserves_original_casing() {
        let text = classify_message("Invalid parameter: temperature");
        assert_eq!(text, "Invalid request: Invalid parameter: temperature");
    }
}
