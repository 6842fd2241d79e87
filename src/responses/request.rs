use serde::Serialize;

use crate::core::TextRequest;

/// Body of `POST /responses`. Serialized directly onto the wire, so fields go
/// out in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub model: String,

    pub input: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl From<TextRequest> for Request {
    fn from(req: TextRequest) -> Self {
        let generation = req.generation_config.unwrap_or_default();
        Self {
            model: req.model,
            input: req.prompt,
            instructions: generation.instructions,
            max_output_tokens: generation.max_tokens,
            temperature: generation.temperature,
        }
    }
}
