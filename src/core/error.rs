use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing or invalid local configuration. Raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The service rejected the credential (401/403).
    #[error("Authentication error ({status_code}): {message}")]
    Authentication { message: String, status_code: u16 },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The service returned an error status, a failed response or a refusal.
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Provider error: {message}")]
    Provider { message: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl LlmError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::Configuration(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, LlmError::Authentication { .. })
    }
}
