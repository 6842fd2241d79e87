//! Prompt text describing a database schema and the SQL task to perform.

use std::path::Path;

use crate::core::LlmError;

pub const DEFAULT_DIALECT: &str = "sqlite";

pub const DEFAULT_SCHEMA: &str = "\
CREATE TABLE bitcoin_blocks (
    block_number INTEGER PRIMARY KEY,
    block_hash TEXT NOT NULL UNIQUE,
    num_transactions INTEGER NOT NULL
);";

pub const DEFAULT_TASK: &str = "Write a sql statement that gives the total number of blocks.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Database flavour named in the prompt, e.g. `sqlite` or `postgres`.
    pub dialect: String,
    /// DDL for the tables the model may query.
    pub schema: String,
    pub task: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            dialect: DEFAULT_DIALECT.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            task: DEFAULT_TASK.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(
        dialect: impl Into<String>,
        schema: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            dialect: dialect.into(),
            schema: schema.into(),
            task: task.into(),
        }
    }

    /// Replace the schema with the contents of a DDL file.
    pub fn with_schema_file(mut self, path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        self.schema = std::fs::read_to_string(path).map_err(|e| {
            LlmError::Configuration(format!(
                "Failed to read schema file {}: {e}",
                path.display()
            ))
        })?;
        Ok(self)
    }

    /// Render the prompt. The same template always yields the same text.
    pub fn render(&self) -> Result<String, LlmError> {
        let dialect = non_empty("dialect", &self.dialect)?;
        let schema = non_empty("schema", &self.schema)?;
        let task = non_empty("task", &self.task)?;

        Ok(format!(
            "I have a {dialect} database with this schema:\n\n{schema}\n\n{task}"
        ))
    }
}

fn non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, LlmError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LlmError::Configuration(format!("Prompt {field} must not be empty")));
    }
    Ok(trimmed)
}
