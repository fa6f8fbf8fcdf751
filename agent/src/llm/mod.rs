use crate::Result;
pub use crate::tools::{ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::hash::{DefaultHasher, Hash, Hasher};

mod openai;
pub use openai::OpenAI;

#[derive(Clone, Debug, Hash)]
pub enum Message {
    User(String),
    Assistant(String, Vec<ToolCall>),
    System(String),
    Tool {
        id: String,
        name: String,
        result: String,
    },
}

impl Message {
    pub fn get_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Role label and text of the message, cut to at most `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        let (role, text) = match self {
            Message::User(text) => ("user", text),
            Message::System(text) => ("system", text),
            Message::Assistant(text, _) => ("assistant", text),
            Message::Tool { name, result, .. } => (name.as_str(), result),
        };

        let mut chars = text.chars();
        let mut preview: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            preview.push_str("...");
        }
        format!("[{}]: {}", role, preview)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::User(text) => write!(f, "**User**\n{}\n", text),
            Message::System(text) => write!(f, "**System**\n{}\n", text),
            Message::Assistant(text, tool_calls) => {
                write!(f, "**Assistant**\n{}\n", text)?;
                tool_calls.iter().try_for_each(|call| write!(f, "{}", call))
            }
            Message::Tool { id, name, result } => {
                write!(f, "**Tool** {} ({})\n{}\n", name, id, result)
            }
        }
    }
}

pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
    pub web_search_tool: bool,
}

pub struct CompletionResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

#[async_trait]
pub trait LLM {
    async fn completion<'a>(&self, request: CompletionRequest<'a>) -> Result<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use super::Message;

    #[test]
    fn test_preview() {
        let msg = Message::Tool {
            id: "call1".to_string(),
            name: "save_script_to_file".to_string(),
            result: "héllo wörld".to_string(),
        };
        assert_eq!(msg.preview(5), "[save_script_to_file]: héllo...");
        assert_eq!(msg.preview(11), "[save_script_to_file]: héllo wörld");

        let msg = Message::User("do stuff".to_string());
        assert_eq!(msg.preview(300), "[user]: do stuff");
    }

    #[test]
    fn test_hash_tracks_content() {
        let a = Message::User("a".to_string());
        let b = Message::User("b".to_string());
        assert_eq!(a.get_hash(), a.clone().get_hash());
        assert_ne!(a.get_hash(), b.get_hash());
    }
}
