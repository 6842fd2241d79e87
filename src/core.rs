pub mod builder;
pub mod error;
pub mod http;
pub mod types;

pub use builder::{ApiKey, InspectorConfig, LlmBuilder, llm};
pub use error::LlmError;
pub use http::{HttpClient, HttpClientConfig};
pub use types::{GenerationConfig, LanguageModelUsage, ResponseMetadata, TextRequest, TextResponse};
