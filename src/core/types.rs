use crate::provider::Provider;

/// Configuration for text generation parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f64>,

    /// System-level instructions sent alongside the prompt
    pub instructions: Option<String>,
}

/// A single prompt to send to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub model: String,
    pub prompt: String,
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextResponse {
    pub text: String,
    pub usage: Option<LanguageModelUsage>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageModelUsage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub total_tokens: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMetadata {
    pub provider: Provider,
    pub model: String,
    pub id: String,
}
