use crate::Result;
use crate::callbacks::Callback;
use crate::llm::Message;
use async_trait::async_trait;

const PREVIEW_CHARS: usize = 300;

/// Logs each message that appeared in the history since the previous step.
pub struct MessageLogger {
    name: String,
    last_hashes: Vec<u64>,
    step: u32,
}

impl MessageLogger {
    pub fn new(name: &str) -> Box<Self> {
        Box::new(Self {
            name: name.to_string(),
            last_hashes: Vec::new(),
            step: 0,
        })
    }

    fn display_messages(&self, messages: &[Message]) {
        for message in messages {
            tracing::info!(agent = %self.name, step = self.step, "{}", message.preview(PREVIEW_CHARS));
            tracing::trace!(agent = %self.name, "{}", message);
        }
    }

    fn prefix_match_len(&self, new_hashes: &[u64]) -> usize {
        new_hashes
            .iter()
            .zip(self.last_hashes.iter())
            .take_while(|&(a, b)| *a == *b)
            .count()
    }

    /// Messages not logged yet, and whether the history was rewritten since
    /// the previous step.
    fn unseen<'a>(&self, messages: &'a [Message], new_hashes: &[u64]) -> (&'a [Message], bool) {
        if new_hashes.len() < self.last_hashes.len()
            || self.prefix_match_len(new_hashes) != self.last_hashes.len()
        {
            (messages, true)
        } else {
            (&messages[self.last_hashes.len()..], false)
        }
    }
}

#[async_trait]
impl Callback for MessageLogger {
    async fn call(&mut self, messages: Vec<Message>) -> Result<Vec<Message>> {
        let new_hashes = messages.iter().map(Message::get_hash).collect::<Vec<_>>();

        let (unseen, cleared) = self.unseen(&messages, &new_hashes);
        if cleared {
            tracing::info!(agent = %self.name, step = self.step, "history rewritten");
        }
        self.display_messages(unseen);

        self.step += 1;
        self.last_hashes = new_hashes;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::MessageLogger;
    use crate::Result;
    use crate::callbacks::Callback;
    use crate::llm::Message;

    fn hashes(messages: &[Message]) -> Vec<u64> {
        messages.iter().map(Message::get_hash).collect()
    }

    #[tokio::test]
    async fn test_logs_only_new_messages() -> Result<()> {
        let mut logger = MessageLogger::new("test");

        let mut history = vec![
            Message::User("a".to_string()),
            Message::Assistant("b".to_string(), vec![]),
        ];
        history = logger.call(history).await?;
        assert_eq!(history.len(), 2);
        assert_eq!(logger.step, 1);

        history.push(Message::User("c".to_string()));
        let (unseen, cleared) = logger.unseen(&history, &hashes(&history));
        assert!(!cleared);
        assert!(matches!(unseen, [Message::User(text)] if text == "c"));

        history = logger.call(history).await?;
        assert_eq!(logger.step, 2);

        let rewritten = vec![
            Message::User("a".to_string()),
            Message::Assistant("summary".to_string(), vec![]),
        ];
        let (unseen, cleared) = logger.unseen(&rewritten, &hashes(&rewritten));
        assert!(cleared);
        assert_eq!(unseen.len(), 2);

        let (_, cleared) = logger.unseen(&history[..1], &hashes(&history[..1]));
        assert!(cleared);

        Ok(())
    }
}
