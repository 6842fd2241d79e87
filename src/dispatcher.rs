//! The prompt dispatcher: configure, authenticate, send, receive, print.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info};

use crate::core::{ApiKey, GenerationConfig, HttpClientConfig, LlmError, TextResponse, llm};
use crate::prompt::PromptTemplate;
use crate::provider::Provider;

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub provider: Provider,
    pub api_key: ApiKey,
    pub model: String,
    /// Overrides the provider's default base URL.
    pub base_url: Option<String>,
    pub http: HttpClientConfig,
    pub prompt: PromptTemplate,
    pub generation: Option<GenerationConfig>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let provider = Provider::OpenAI;
        Self {
            provider,
            api_key: ApiKey::Default,
            model: provider.default_model().to_string(),
            base_url: None,
            http: HttpClientConfig::default(),
            prompt: PromptTemplate::default(),
            generation: None,
        }
    }
}

impl DispatchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }
}

pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Send the configured prompt once and return the model's answer.
    ///
    /// The credential and the prompt are checked before anything goes on the wire.
    #[tracing::instrument(
        name = "dispatch",
        skip(self),
        fields(provider = %self.config.provider, model = %self.config.model),
        err(level = "debug")
    )]
    pub async fn dispatch(&self) -> Result<TextResponse, LlmError> {
        let builder = llm::with(self.config.provider).api_key(self.config.api_key.clone())?;
        let prompt = self.config.prompt.render()?;
        debug!(prompt_len = prompt.len(), "Prompt rendered");

        let mut builder = builder
            .model(&self.config.model)
            .prompt(prompt)
            .http_client_config(self.config.http.clone());
        if let Some(base_url) = &self.config.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(generation) = &self.config.generation {
            builder = builder.generation_config(generation.clone());
        }

        let response = builder.complete().await?;
        info!(
            response_id = %response.metadata.id,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "Received completion"
        );
        Ok(response)
    }

    /// Dispatch and write the answer to `out`. Nothing is written on failure.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<TextResponse, LlmError> {
        let response = self.dispatch().await?;
        writeln!(out, "{}", response.text)?;
        out.flush()?;
        Ok(response)
    }
}
