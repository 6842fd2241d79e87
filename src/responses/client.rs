//! Client logic for providers that speak the OpenAI-style responses API.
//!
//! Builds the wire request from a [`TextRequest`], performs the single POST and
//! turns the answer into a [`TextResponse`].

use crate::{
    core::{
        HttpClient, HttpClientConfig, InspectorConfig, LanguageModelUsage, LlmError,
        ResponseMetadata, TextRequest, TextResponse,
    },
    provider::Provider,
    responses::{
        request::Request,
        response::{Response, ResponseStatus},
    },
};

/// Configuration trait for providers that use the OpenAI-style responses API
pub trait ResponsesProviderConfig {
    /// Model Provider
    fn provider(&self) -> Provider;

    /// Base URL for the API (e.g., `https://api.openai.com/v1`)
    fn base_url(&self) -> &str;

    /// API endpoint for responses (e.g., `/responses`)
    fn endpoint(&self) -> &str;

    /// Authentication header as (header_name, header_value) tuple
    fn auth_header(&self) -> (String, String);

    fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::default()
    }

    fn user_agent(&self) -> String {
        format!("sqlprompt/{}", env!("CARGO_PKG_VERSION"))
    }
}

pub struct ResponsesClient<P: ResponsesProviderConfig> {
    pub config: P,
    http: HttpClient,
}

impl<P: ResponsesProviderConfig> ResponsesClient<P> {
    pub fn new(config: P) -> Result<Self, LlmError> {
        Self::with_inspector(config, None)
    }

    pub fn with_inspector(
        config: P,
        inspector_config: Option<InspectorConfig>,
    ) -> Result<Self, LlmError> {
        let http_config = config.http_config();
        let user_agent = config.user_agent();

        let http = HttpClient::new(&http_config, Some(&user_agent), inspector_config)?;

        Ok(Self { config, http })
    }

    /// Make an API request to the responses endpoint
    #[tracing::instrument(
        name = "http_request",
        skip(self, request),
        fields(
            base_url = %self.config.base_url(),
            endpoint = %self.config.endpoint(),
            model = %request.model
        ),
        err(level = "debug")
    )]
    pub async fn make_api_request(&self, request: Request) -> Result<Response, LlmError> {
        let url = format!("{}{}", self.config.base_url(), self.config.endpoint());

        let headers = [self.config.auth_header()];

        self.http.post_json(&url, &headers, &request).await
    }

    pub async fn complete(&self, request: TextRequest) -> Result<TextResponse, LlmError> {
        let response = self.make_api_request(Request::from(request)).await?;
        convert_to_text_response(response, self.config.provider())
    }
}

pub fn convert_to_text_response(
    res: Response,
    provider: Provider,
) -> Result<TextResponse, LlmError> {
    if let Some(error) = &res.error {
        return Err(LlmError::Api {
            message: match &error.code {
                Some(code) => format!("Response failed ({code}): {}", error.message),
                None => format!("Response failed: {}", error.message),
            },
            status_code: None,
        });
    }

    if res.status == Some(ResponseStatus::Failed) {
        return Err(LlmError::Api {
            message: "Response failed without an error message".to_string(),
            status_code: None,
        });
    }

    let text = res.output_text();
    if text.is_empty() {
        if let Some(refusal) = res.refusal() {
            return Err(LlmError::Api {
                message: format!("Model refused: {refusal}"),
                status_code: None,
            });
        }
        return Err(LlmError::Provider {
            message: "No output text in response".to_string(),
        });
    }

    Ok(TextResponse {
        text,
        usage: res.usage.map(|usage| LanguageModelUsage {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
        }),
        metadata: ResponseMetadata {
            provider,
            model: res.model,
            id: res.id,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    // --- Mock Provider Configuration ---

    struct TestProviderConfig {
        base_url: String,
    }

    impl ResponsesProviderConfig for TestProviderConfig {
        fn provider(&self) -> Provider {
            Provider::OpenAI
        }

        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn endpoint(&self) -> &str {
            "/responses"
        }

        fn auth_header(&self) -> (String, String) {
            ("Authorization".to_string(), "Bearer test-token".to_string())
        }

        fn http_config(&self) -> HttpClientConfig {
            HttpClientConfig {
                timeout: Duration::from_secs(5),
            }
        }
    }

    // --- Helpers ---

    fn create_client(server: &MockServer) -> ResponsesClient<TestProviderConfig> {
        let config = TestProviderConfig {
            base_url: server.uri(),
        };
        ResponsesClient::new(config).expect("Failed to create client")
    }

    fn create_basic_request() -> TextRequest {
        TextRequest {
            model: "test-model".to_string(),
            prompt: "How many blocks?".to_string(),
            generation_config: None,
        }
    }

    fn message_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "resp_123",
            "model": "test-model",
            "status": "completed",
            "output": [{
                "id": "msg_123",
                "type": "message",
                "status": "completed",
                "role": "assistant",
                "content": [{ "type": "output_text", "text": text, "annotations": [] }]
            }],
            "usage": { "input_tokens": 10, "output_tokens": 5, "total_tokens": 15 }
        })
    }

    // --- Tests: HTTP ---

    #[tokio::test]
    async fn test_sends_model_input_and_bearer_token() {
        let server = MockServer::start().await;
        let client = create_client(&server);

        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "model": "test-model",
                "input": "How many blocks?"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(message_response("SELECT COUNT(*) FROM bitcoin_blocks;")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = client.complete(create_basic_request()).await.unwrap();

        assert_eq!(response.text, "SELECT COUNT(*) FROM bitcoin_blocks;");
        assert_eq!(response.metadata.id, "resp_123");
        assert_eq!(response.metadata.provider, Provider::OpenAI);
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        let client = create_client(&server);

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client.complete(create_basic_request()).await;

        match result {
            Err(LlmError::Api {
                status_code: Some(500),
                ..
            }) => (),
            _ => panic!("Expected 500 Api Error, got {:?}", result),
        }
    }

    #[tokio::test]
    async fn test_rejected_key_is_authentication_error() {
        let server = MockServer::start().await;
        let client = create_client(&server);

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {
                    "message": "Incorrect API key provided.",
                    "type": "invalid_request_error",
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let result = client.complete(create_basic_request()).await;

        match result {
            Err(LlmError::Authentication {
                status_code: 401,
                message,
            }) => assert_eq!(message, "Incorrect API key provided."),
            _ => panic!("Expected Authentication Error, got {:?}", result),
        }
    }

    #[tokio::test]
    async fn test_forbidden_is_authentication_error() {
        let server = MockServer::start().await;
        let client = create_client(&server);

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let result = client.complete(create_basic_request()).await;
        assert!(matches!(
            result,
            Err(LlmError::Authentication {
                status_code: 403,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        let client = create_client(&server);

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json"))
            .mount(&server)
            .await;

        let result = client.complete(create_basic_request()).await;

        match result {
            Err(LlmError::Parse { .. }) => (),
            _ => panic!("Expected Parse Error, got {:?}", result),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = ResponsesClient::new(TestProviderConfig {
            base_url: "http://127.0.0.1:1".to_string(),
        })
        .unwrap();

        let result = client.complete(create_basic_request()).await;
        assert!(matches!(result, Err(LlmError::Network { .. })));
    }

    // --- Tests: Response Conversion ---

    fn parse(value: serde_json::Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_refusal_becomes_api_error() {
        let response = parse(serde_json::json!({
            "id": "resp_refusal",
            "model": "test-model",
            "output": [{
                "type": "message",
                "content": [{ "type": "refusal", "refusal": "I cannot do that." }]
            }]
        }));

        match convert_to_text_response(response, Provider::OpenAI) {
            Err(LlmError::Api { message, .. }) if message.contains("Model refused") => (),
            other => panic!("Expected Refusal Error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_output_is_provider_error() {
        let response = parse(serde_json::json!({
            "id": "resp_empty",
            "model": "test-model",
            "output": []
        }));

        match convert_to_text_response(response, Provider::OpenAI) {
            Err(LlmError::Provider { message }) if message.contains("No output") => (),
            other => panic!("Expected No Output Error, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_response_reports_error_message() {
        let response = parse(serde_json::json!({
            "id": "resp_failed",
            "status": "failed",
            "error": { "code": "server_error", "message": "The model crashed." },
            "output": []
        }));

        match convert_to_text_response(response, Provider::OpenAI) {
            Err(LlmError::Api { message, .. }) => {
                assert_eq!(message, "Response failed (server_error): The model crashed.")
            }
            other => panic!("Expected Api Error, got {:?}", other),
        }
    }
}
