//! sqlprompt CLI
//!
//! Usage:
//!     sqlprompt [OPTIONS]
//!
//! Environment Variables:
//!     OPENAI_API_KEY: API key for the completion service (name overridable with --api-key-env)
//!     OPENAI_BASE_URL: API base URL (default: https://api.openai.com/v1)
//!     SQLPROMPT_MODEL: Model name (default: gpt-4.1)
//!     RUST_LOG: Log filter for diagnostics on stderr (default: warn)

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use sqlprompt::{
    ApiKey, DispatchConfig, Dispatcher, GenerationConfig, LlmError, PromptTemplate, Provider,
};
use tracing_subscriber::EnvFilter;

/// Ask a hosted language model to write SQL for a schema and a task
#[derive(Parser, Debug)]
#[command(name = "sqlprompt", version)]
#[command(after_help = r#"Examples:
    # Run the built-in bitcoin_blocks demo
    sqlprompt

    # Use your own schema and task
    sqlprompt --schema-file schema.sql --task "List the ten largest blocks."

    # Point at a compatible endpoint
    sqlprompt --base-url http://localhost:8000/v1 --model my-model
"#)]
struct Cli {
    /// Model name
    #[arg(long, env = "SQLPROMPT_MODEL", default_value = "gpt-4.1")]
    model: String,

    /// API base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Environment variable holding the API key
    #[arg(long, env = "SQLPROMPT_API_KEY_ENV", default_value = "OPENAI_API_KEY")]
    api_key_env: String,

    /// Database dialect named in the prompt
    #[arg(long, env = "SQLPROMPT_DIALECT", default_value = sqlprompt::prompt::DEFAULT_DIALECT)]
    dialect: String,

    /// File containing the schema DDL (default: built-in bitcoin_blocks table)
    #[arg(long, env = "SQLPROMPT_SCHEMA_FILE", value_name = "PATH")]
    schema_file: Option<PathBuf>,

    /// What the SQL should do
    #[arg(long, env = "SQLPROMPT_TASK", default_value = sqlprompt::prompt::DEFAULT_TASK)]
    task: String,

    /// Request timeout in seconds
    #[arg(long, env = "SQLPROMPT_TIMEOUT_SECS", default_value = "60")]
    timeout_secs: u64,

    /// Maximum output tokens
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f64>,
}

impl Cli {
    fn into_config(self) -> Result<DispatchConfig, LlmError> {
        let mut prompt = PromptTemplate {
            dialect: self.dialect,
            task: self.task,
            ..PromptTemplate::default()
        };
        if let Some(path) = &self.schema_file {
            prompt = prompt.with_schema_file(path)?;
        }

        let generation = (self.max_tokens.is_some() || self.temperature.is_some()).then(|| {
            GenerationConfig {
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                instructions: None,
            }
        });

        Ok(DispatchConfig {
            provider: Provider::OpenAI,
            api_key: ApiKey::Env(self.api_key_env),
            model: self.model,
            base_url: self.base_url,
            prompt,
            generation,
            ..DispatchConfig::default()
        }
        .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Before logging and argument parsing so RUST_LOG and the clap env fallbacks see it.
    let env_file = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match env_file {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) => tracing::debug!(error = %e, "No environment file loaded"),
    }

    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => return report_failure(&e, &mut std::io::stderr()),
    };

    let dispatcher = Dispatcher::new(config);
    let mut stdout = std::io::stdout().lock();
    match dispatcher.run(&mut stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, &mut std::io::stderr()),
    }
}

/// The single user-facing report of a failed run.
fn report_failure<W: Write>(err: &LlmError, stderr: &mut W) -> ExitCode {
    let _ = writeln!(stderr, "error: {err}");
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_the_demo_prompt() {
        let cli = Cli::try_parse_from(["sqlprompt"]).unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.prompt, PromptTemplate::default());
        assert!(config.generation.is_none());
        assert_eq!(config.http.timeout, Duration::from_secs(60));
    }

    #[test]
    fn generation_flags_build_a_generation_config() {
        let cli = Cli::try_parse_from([
            "sqlprompt",
            "--task",
            "Average transactions per block.",
            "--temperature",
            "0",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.prompt.task, "Average transactions per block.");
        assert_eq!(
            config.generation.and_then(|g| g.temperature),
            Some(0.0)
        );
        assert_eq!(config.http.timeout, Duration::from_secs(5));
    }

    #[test]
    fn failure_is_reported_once() {
        let mut stderr = Vec::new();
        let code = report_failure(
            &LlmError::Configuration("OPENAI_API_KEY not set".to_string()),
            &mut stderr,
        );

        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "error: Configuration error: OPENAI_API_KEY not set\n"
        );
    }
}
