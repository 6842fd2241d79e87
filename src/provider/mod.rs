mod constants;
pub(crate) mod openai;

pub use openai::{OpenAiClient, OpenAiConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
        }
    }
}

impl Provider {
    /// Get the default environment variable name for this provider's API key
    pub fn default_api_key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => constants::openai::API_KEY_ENV_VAR,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => constants::openai::API_BASE,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => constants::openai::DEFAULT_MODEL,
        }
    }
}
