//! HTTP client for the Anthropic and OpenAI completion APIs.

#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::SecretString;
use crate::error::ProviderError;
use crate::traits::CompletionBackend;

use super::config::{ClientConfig, MAX_COMPLETION_TOKENS};
use super::types::{
    AnthropicResponse, ChatMessage, ChatRequest, OpenAiResponse, ProviderResponse,
};
use super::Provider;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default wait hint when a 429 response carries no `retry-after` header.
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Client for one LLM provider's completion endpoint.
///
/// The client is bound to a single [`Provider`] at construction time and
/// sends each request with that provider's authentication scheme. It makes
/// exactly one attempt per call; retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    api_key: SecretString,
    provider: Provider,
    config: ClientConfig,
}

impl ProviderClient {
    /// Create a new client for the given provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        provider: Provider,
        api_key: SecretString,
        config: ClientConfig,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ProviderError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            provider,
            config,
        })
    }

    /// The provider this client talks to.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        self.provider
    }

    /// The client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a single completion request and return the response text.
    ///
    /// Both providers return tagged-union response bodies; this method
    /// normalizes them to plain text via [`ProviderResponse::into_text`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] for authentication failures, rate limits,
    /// rejected requests, server errors, timeouts, network failures, and
    /// unparseable response bodies.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest::new(
            &self.config.model,
            MAX_COMPLETION_TOKENS,
            vec![ChatMessage::user(prompt)],
        );
        let url = format!("{}{}", self.config.base_url, self.provider.endpoint_path());
        let start = std::time::Instant::now();

        tracing::debug!(
            url = %url,
            provider = %self.provider,
            model = %self.config.model,
            timeout_ms = self.config.timeout_ms,
            "Starting completion request"
        );

        let builder = match self.provider {
            Provider::Anthropic => self
                .client
                .post(&url)
                .header("x-api-key", self.api_key.expose())
                .header("anthropic-version", ANTHROPIC_VERSION),
            Provider::OpenAi => self.client.post(&url).bearer_auth(self.api_key.expose()),
        };

        let response = builder.json(&request).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::error!(
                    timeout_ms = self.config.timeout_ms,
                    "Completion request timed out"
                );
                ProviderError::Timeout {
                    timeout_ms: self.config.timeout_ms,
                }
            } else {
                tracing::error!(error = %e, "Network error during completion request");
                ProviderError::Network {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = start.elapsed().as_millis(),
            "Received provider response"
        );

        if status == StatusCode::UNAUTHORIZED {
            tracing::error!(provider = %self.provider, "Authentication failed");
            return Err(ProviderError::AuthenticationFailed);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
            tracing::warn!(retry_after_seconds, "Provider rate limit hit");
            return Err(ProviderError::RateLimited {
                retry_after_seconds,
            });
        }

        if status == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(body = %body, "Provider rejected the request");
            return Err(ProviderError::InvalidRequest { message: body });
        }

        if status.is_server_error() {
            tracing::error!(status = %status, "Provider server error");
            return Err(ProviderError::ServerError {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Unexpected provider response");
            return Err(ProviderError::UnexpectedResponse {
                message: format!("Status {status}: {body}"),
            });
        }

        let parsed = match self.provider {
            Provider::Anthropic => {
                let body: AnthropicResponse =
                    response
                        .json()
                        .await
                        .map_err(|e| ProviderError::UnexpectedResponse {
                            message: format!("Failed to parse response: {e}"),
                        })?;
                ProviderResponse::Anthropic(body)
            }
            Provider::OpenAi => {
                let body: OpenAiResponse =
                    response
                        .json()
                        .await
                        .map_err(|e| ProviderError::UnexpectedResponse {
                            message: format!("Failed to parse response: {e}"),
                        })?;
                ProviderResponse::OpenAi(body)
            }
        };

        parsed.into_text()
    }
}

#[async_trait]
impl CompletionBackend for ProviderClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.complete(prompt).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_mock_client(server: &MockServer, provider: Provider) -> ProviderClient {
        let config = ClientConfig::for_provider(provider)
            .with_base_url(server.uri())
            .with_timeout_ms(5_000);
        ProviderClient::new(provider, SecretString::new("test-api-key"), config).unwrap()
    }

    fn anthropic_response_body(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": "claude-sonnet-4-20250514",
            "usage": {"input_tokens": 10, "output_tokens": 20}
        })
    }

    fn openai_response_body(text: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-01",
            "object": "chat.completion",
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn test_anthropic_version_constant() {
        assert_eq!(ANTHROPIC_VERSION, "2023-06-01");
    }

    #[test]
    fn test_new_stores_provider_and_config() {
        let config = ClientConfig::for_provider(Provider::OpenAi).with_timeout_ms(1_000);
        let client =
            ProviderClient::new(Provider::OpenAi, SecretString::new("sk-test"), config.clone())
                .unwrap();
        assert_eq!(client.provider(), Provider::OpenAi);
        assert_eq!(client.config(), &config);
    }

    #[tokio::test]
    async fn test_anthropic_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_response_body(
                "{\"script\": \"import pandas as pd\"}",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("Filter sales over $1000").await;

        assert_eq!(result.unwrap(), "{\"script\": \"import pandas as pd\"}");
    }

    #[tokio::test]
    async fn test_openai_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(openai_response_body("generated text")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::OpenAi);
        let result = client.complete("Group by region").await;

        assert_eq!(result.unwrap(), "generated text");
    }

    #[tokio::test]
    async fn test_request_carries_model_and_token_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": MAX_COMPLETION_TOKENS,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_response_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::for_provider(Provider::Anthropic)
            .with_base_url(server.uri())
            .with_model("test-model")
            .with_timeout_ms(5_000);
        let client =
            ProviderClient::new(Provider::Anthropic, SecretString::new("test-api-key"), config)
                .unwrap();

        let result = client.complete("hello").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("test").await;

        assert!(matches!(result, Err(ProviderError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_rate_limited_with_retry_after_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).append_header("retry-after", "30"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("test").await;

        assert!(matches!(
            result,
            Err(ProviderError::RateLimited {
                retry_after_seconds: 30
            })
        ));
    }

    #[tokio::test]
    async fn test_rate_limited_without_header_defaults_to_sixty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::OpenAi);
        let result = client.complete("test").await;

        assert!(matches!(
            result,
            Err(ProviderError::RateLimited {
                retry_after_seconds: 60
            })
        ));
    }

    #[tokio::test]
    async fn test_invalid_request_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("max_tokens exceeds model limit"),
            )
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("test").await;

        match result {
            Err(ProviderError::InvalidRequest { message }) => {
                assert!(message.contains("max_tokens"));
            }
            other => panic!("Expected InvalidRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("test").await;

        assert!(matches!(
            result,
            Err(ProviderError::ServerError { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_service_unavailable_maps_to_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::OpenAi);
        let result = client.complete("test").await;

        assert!(matches!(
            result,
            Err(ProviderError::ServerError { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("test").await;

        match result {
            Err(ProviderError::UnexpectedResponse { message }) => {
                assert!(message.contains("418"));
                assert!(message.contains("teapot"));
            }
            other => panic!("Expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let result = client.complete("test").await;

        match result {
            Err(ProviderError::UnexpectedResponse { message }) => {
                assert!(message.contains("Failed to parse response"));
            }
            other => panic!("Expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::OpenAi);
        let result = client.complete("test").await;

        assert!(matches!(
            result,
            Err(ProviderError::UnexpectedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(anthropic_response_body("slow"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::for_provider(Provider::Anthropic)
            .with_base_url(server.uri())
            .with_timeout_ms(100);
        let client =
            ProviderClient::new(Provider::Anthropic, SecretString::new("test-api-key"), config)
                .unwrap();

        let result = client.complete("test").await;

        assert!(matches!(
            result,
            Err(ProviderError::Timeout { timeout_ms: 100 })
        ));
    }

    #[tokio::test]
    async fn test_trait_impl_delegates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_response_body("ok")))
            .mount(&server)
            .await;

        let client = create_mock_client(&server, Provider::Anthropic);
        let backend: &dyn CompletionBackend = &client;
        let result = backend.complete("test").await;

        assert_eq!(result.unwrap(), "ok");
    }
}
