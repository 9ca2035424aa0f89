//! OpenAI-compatible completion backend.
//!
//! A single [`OpenAiCompatibleClient`] serves any provider speaking the
//! OpenAI chat completions protocol (OpenAI, Gemini, Mistral) via
//! configurable base URLs.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};

use reflecto_core::llm::CompletionClient;
use reflecto_types::llm::{CompletionRequest, LlmError};
use reflecto_types::turn::TurnRole;

use self::config::OpenAiCompatConfig;

/// Completion backend for any OpenAI-compatible API.
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatibleClient {
    client: Client<OpenAIConfig>,
    name: String,
}

impl OpenAiCompatibleClient {
    /// Create a new client from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            name: config.name,
        }
    }

    /// Create an OpenAI client (`https://api.openai.com/v1`).
    pub fn openai(api_key: &str) -> Self {
        Self::new(config::openai_defaults(api_key))
    }

    /// Create a Google Gemini client (OpenAI-compatible beta endpoint).
    pub fn gemini(api_key: &str) -> Self {
        Self::new(config::gemini_defaults(api_key))
    }

    /// Create a Mistral AI client.
    pub fn mistral(api_key: &str) -> Self {
        Self::new(config::mistral_defaults(api_key))
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic request.
    ///
    /// The turn sequence already carries the system preamble at index 0,
    /// so every turn maps directly to a protocol message.
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages: Vec<ChatCompletionRequestMessage> = request
            .turns
            .iter()
            .map(|turn| match turn.role {
                TurnRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            turn.content.clone(),
                        ),
                        name: None,
                    })
                }
                TurnRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(
                            turn.content.clone(),
                        ),
                        name: None,
                    })
                }
                TurnRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessage {
                            content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                                turn.content.clone(),
                            )),
                            refusal: None,
                            name: None,
                            audio: None,
                            tool_calls: None,
                            function_call: None,
                        },
                    )
                }
            })
            .collect();

        let params = &request.params;
        CreateChatCompletionRequest {
            model: params.model.clone(),
            messages,
            max_completion_tokens: Some(params.max_tokens),
            temperature: Some(params.temperature as f32),
            top_p: Some(params.top_p as f32),
            frequency_penalty: Some(params.frequency_penalty as f32),
            presence_penalty: Some(params.presence_penalty as f32),
            ..Default::default()
        }
    }
}

impl CompletionClient for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
///
/// Known API error codes become structured variants; everything else goes
/// through the free-text `Provider` channel for substring classification
/// in the orchestrator.
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited
            } else if error_type == "invalid_request_error" {
                LlmError::InvalidRequest(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: api_err.message.clone(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => {
            if let Some(status) = reqwest_err.status() {
                match status.as_u16() {
                    401 => LlmError::AuthenticationFailed,
                    429 => LlmError::RateLimited,
                    _ => LlmError::Provider {
                        message: err.to_string(),
                    },
                }
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflecto_types::llm::ModelParams;
    use reflecto_types::turn::Turn;

    fn request() -> CompletionRequest {
        CompletionRequest {
            params: ModelParams::default(),
            turns: vec![
                Turn::new(TurnRole::System, "Be helpful."),
                Turn::new(TurnRole::User, "Hello"),
                Turn::new(TurnRole::Assistant, "Hi there!"),
                Turn::new(TurnRole::User, "How are you?"),
            ],
        }
    }

    #[test]
    fn test_openai_factory() {
        let client = OpenAiCompatibleClient::openai("sk-test");
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn test_gemini_factory() {
        let client = OpenAiCompatibleClient::gemini("gemini-key");
        assert_eq!(client.name(), "gemini");
    }

    #[test]
    fn test_build_request_maps_all_turns() {
        let client = OpenAiCompatibleClient::openai("sk-test");
        let oai_req = client.build_request(&request());

        assert_eq!(oai_req.model, "gpt-4o-mini");
        assert_eq!(oai_req.messages.len(), 4);
        assert!(matches!(
            oai_req.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            oai_req.messages[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
    }

    #[test]
    fn test_build_request_sampling_params() {
        let client = OpenAiCompatibleClient::openai("sk-test");
        let oai_req = client.build_request(&request());

        assert_eq!(oai_req.max_completion_tokens, Some(500));
        assert_eq!(oai_req.temperature, Some(0.7));
        assert_eq!(oai_req.top_p, Some(1.0));
        assert_eq!(oai_req.frequency_penalty, Some(0.0));
        assert_eq!(oai_req.presence_penalty, Some(0.0));
        assert!(oai_req.stream.is_none());
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: Some("authentication_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Rate limit exceeded".to_string(),
            r#type: Some("rate_limit_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::RateLimited));
    }

    #[test]
    fn test_map_openai_error_invalid_request() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "The model `gpt-5o` does not exist".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }

    #[test]
    fn test_map_openai_error_unknown_goes_to_provider_channel() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Something weird".to_string(),
            r#type: None,
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        match err {
            LlmError::Provider { message } => assert_eq!(message, "Something weird"),
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_map_openai_error_invalid_argument() {
        use async_openai::error::OpenAIError;
        let err = map_openai_error(OpenAIError::InvalidArgument("bad arg".to_string()));
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }
}
