//! # sqlprompt
//!
//! Describe a database schema and a task, ask a hosted model for the SQL, print the answer.
//!
//! The generated SQL is returned as text. It is never validated or executed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqlprompt::{ApiKey, Provider, llm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = llm::with(Provider::OpenAI)
//!         .api_key(ApiKey::Default)?
//!         .model("gpt-4.1")
//!         .prompt("I have a sqlite database with a table t(id INTEGER). Count its rows.")
//!         .complete()
//!         .await?;
//!
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod dispatcher;
pub mod prompt;
pub mod provider;
pub mod responses;

pub use crate::core::{
    ApiKey, GenerationConfig, HttpClientConfig, LlmError, TextResponse, builder::llm,
};
pub use dispatcher::{DispatchConfig, Dispatcher};
pub use prompt::PromptTemplate;
pub use provider::Provider;
