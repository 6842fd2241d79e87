use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Response {
    pub id: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub status: Option<ResponseStatus>,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub usage: Option<Usage>,

    #[serde(default)]
    pub error: Option<ResponseError>,
}

impl Response {
    /// All `output_text` parts of all message items, concatenated in order.
    pub fn output_text(&self) -> String {
        self.message_contents()
            .filter_map(|content| match content {
                MessageContent::OutputText { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The first refusal the model produced, if any.
    pub fn refusal(&self) -> Option<&str> {
        self.message_contents().find_map(|content| match content {
            MessageContent::Refusal { refusal } => Some(refusal.as_str()),
            _ => None,
        })
    }

    fn message_contents(&self) -> impl Iterator<Item = &MessageContent> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message(message) => Some(message.content.iter()),
                OutputItem::Other => None,
            })
            .flatten()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Completed,
    Failed,
    InProgress,
    Cancelled,
    Queued,
    Incomplete,
    #[serde(other)]
    Unknown,
}

/// Items of the `output` array. Reasoning, tool calls and other item kinds are
/// not consumed and collapse into [`OutputItem::Other`].
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message(OutputMessage),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct OutputMessage {
    #[serde(default)]
    pub id: Option<String>,

    /// This is always `assistant`
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    OutputText {
        text: String,
    },
    Refusal {
        /// The refusal explanation from the model.
        refusal: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub total_tokens: i32,
}

#[derive(Debug, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}
