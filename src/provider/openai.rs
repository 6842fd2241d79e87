use crate::core::{HttpClientConfig, InspectorConfig, LlmError, TextRequest, TextResponse};
use crate::provider::Provider;
use crate::responses::{ResponsesClient, ResponsesProviderConfig};

use super::constants::openai::RESPONSES_ENDPOINT;

pub struct OpenAiConfig {
    api_key: String,
    base_url: String,
    http_config: HttpClientConfig,
}

impl OpenAiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: Provider::OpenAI.default_base_url().to_string(),
            http_config: HttpClientConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_config(mut self, http_config: HttpClientConfig) -> Self {
        self.http_config = http_config;
        self
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("http_config", &self.http_config)
            .finish()
    }
}

impl ResponsesProviderConfig for OpenAiConfig {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> &str {
        RESPONSES_ENDPOINT
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )
    }

    fn http_config(&self) -> HttpClientConfig {
        self.http_config.clone()
    }
}

pub struct OpenAiClient {
    inner: ResponsesClient<OpenAiConfig>,
}

impl OpenAiClient {
    pub(crate) fn with_inspector(
        config: OpenAiConfig,
        inspector_config: Option<InspectorConfig>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            inner: ResponsesClient::with_inspector(config, inspector_config)?,
        })
    }

    pub async fn complete(&self, request: TextRequest) -> Result<TextResponse, LlmError> {
        self.inner.complete(request).await
    }
}
