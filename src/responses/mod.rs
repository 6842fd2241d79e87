pub(crate) mod client;
pub(crate) mod request;
pub(crate) mod response;

pub use client::{ResponsesClient, ResponsesProviderConfig};
pub use request::Request;
pub use response::{MessageContent, OutputItem, Response, ResponseStatus};
