use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::provider::{OpenAiClient, OpenAiConfig, Provider};

use super::{
    error::LlmError,
    http::HttpClientConfig,
    types::{GenerationConfig, TextRequest, TextResponse},
};

pub struct ProviderSet;
pub struct ApiKeySet;
pub struct Configuring;
pub struct PromptSet;

/// Where the credential comes from.
#[derive(Clone)]
pub enum ApiKey {
    /// The provider's default environment variable (e.g. `OPENAI_API_KEY`).
    Default,
    /// A named environment variable.
    Env(String),
    Custom(String),
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKey::Default => write!(f, "ApiKey::Default"),
            ApiKey::Env(name) => write!(f, "ApiKey::Env({name:?})"),
            ApiKey::Custom(_) => write!(f, "ApiKey::Custom([REDACTED])"),
        }
    }
}

impl ApiKey {
    /// Resolve to the secret value. Missing or blank keys are configuration errors.
    pub fn resolve(&self, provider: Provider) -> Result<String, LlmError> {
        let (key, source) = match self {
            ApiKey::Custom(key) => (key.clone(), "custom API key".to_string()),
            ApiKey::Default => read_env(provider.default_api_key_env_var())?,
            ApiKey::Env(name) => read_env(name)?,
        };

        if key.trim().is_empty() {
            return Err(LlmError::Configuration(format!("{source} is empty")));
        }

        Ok(key)
    }
}

fn read_env(name: &str) -> Result<(String, String), LlmError> {
    std::env::var(name)
        .map(|key| (key, name.to_string()))
        .map_err(|_| LlmError::Configuration(format!("{name} not set")))
}

type Inspector = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// Hooks receiving the raw JSON sent to and received from the service.
#[derive(Clone, Default)]
pub struct InspectorConfig {
    pub request_inspector: Option<Inspector>,
    pub response_inspector: Option<Inspector>,
}

pub struct LlmBuilder<State> {
    provider: Provider,
    api_key: Option<String>,
    model: Option<String>,
    prompt: Option<String>,
    base_url: Option<String>,
    http_config: HttpClientConfig,
    generation_config: Option<GenerationConfig>,
    inspector_config: Option<InspectorConfig>,
    _state: PhantomData<State>,
}

impl<State> LlmBuilder<State> {
    fn into_state<Next>(self) -> LlmBuilder<Next> {
        LlmBuilder {
            provider: self.provider,
            api_key: self.api_key,
            model: self.model,
            prompt: self.prompt,
            base_url: self.base_url,
            http_config: self.http_config,
            generation_config: self.generation_config,
            inspector_config: self.inspector_config,
            _state: PhantomData,
        }
    }

    /// Override the provider's API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = timeout;
        self
    }

    pub fn http_client_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn inspect_request<F>(mut self, inspector: F) -> Self
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        self.inspector_config
            .get_or_insert_with(InspectorConfig::default)
            .request_inspector = Some(Arc::new(inspector));
        self
    }

    pub fn inspect_response<F>(mut self, inspector: F) -> Self
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        self.inspector_config
            .get_or_insert_with(InspectorConfig::default)
            .response_inspector = Some(Arc::new(inspector));
        self
    }
}

impl LlmBuilder<ProviderSet> {
    pub fn api_key(mut self, api_key: ApiKey) -> Result<LlmBuilder<ApiKeySet>, LlmError> {
        self.api_key = Some(api_key.resolve(self.provider)?);
        Ok(self.into_state())
    }
}

impl LlmBuilder<ApiKeySet> {
    pub fn model(mut self, model_id: &str) -> LlmBuilder<Configuring> {
        self.model = Some(model_id.to_string());
        self.into_state()
    }
}

impl LlmBuilder<Configuring> {
    pub fn prompt(mut self, prompt: impl Into<String>) -> LlmBuilder<PromptSet> {
        self.prompt = Some(prompt.into());
        self.into_state()
    }
}

fn validate_builder(builder: &LlmBuilder<PromptSet>) -> Result<(&str, &str, &str), LlmError> {
    let api_key = builder
        .api_key
        .as_deref()
        .ok_or_else(|| LlmError::Configuration("Missing API key.".to_string()))?;

    let model = builder
        .model
        .as_deref()
        .filter(|model| !model.trim().is_empty())
        .ok_or_else(|| LlmError::Configuration("Missing model. Specify a model id.".to_string()))?;

    let prompt = builder
        .prompt
        .as_deref()
        .filter(|prompt| !prompt.trim().is_empty())
        .ok_or_else(|| LlmError::Configuration("Prompt must not be empty.".to_string()))?;

    Ok((api_key, model, prompt))
}

impl LlmBuilder<PromptSet> {
    /// Send the prompt and wait for the single response.
    pub async fn complete(self) -> Result<TextResponse, LlmError> {
        let (api_key, model, prompt) = validate_builder(&self)?;

        let request = TextRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            generation_config: self.generation_config.clone(),
        };

        match self.provider {
            Provider::OpenAI => {
                let mut config = OpenAiConfig::new(api_key.to_string())
                    .with_http_config(self.http_config.clone());
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                let client = OpenAiClient::with_inspector(config, self.inspector_config.clone())?;
                client.complete(request).await
            }
        }
    }
}

pub mod llm {
    use super::*;

    pub fn with(provider: Provider) -> LlmBuilder<ProviderSet> {
        LlmBuilder {
            provider,
            api_key: None,
            model: None,
            prompt: None,
            base_url: None,
            http_config: HttpClientConfig::default(),
            generation_config: None,
            inspector_config: None,
            _state: PhantomData,
        }
    }
}
