use crate::Result;
use crate::llm::Message;
use async_trait::async_trait;

mod logger;
pub use logger::MessageLogger;

/// Hook run on the history after every completion step.
#[async_trait]
pub trait Callback {
    async fn call(&mut self, messages: Vec<Message>) -> Result<Vec<Message>>;
}
