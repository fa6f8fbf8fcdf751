use std::collections::BTreeMap;

/// Key-value session state shared by every tool call of one agent run.
///
/// A fresh `State` is created by the caller for each run and handed to
/// [`Agent::run`](crate::Agent::run) by mutable reference, so tools of the
/// same run observe each other's writes and never run concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    values: BTreeMap<String, String>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::State;

    #[test]
    fn test_state() {
        let mut state = State::new();
        assert!(state.is_empty());
        assert_eq!(state.get("abc"), None);

        state.set("abc", "123");
        state.set("xyz".to_string(), "456".to_string());
        assert!(state.contains("abc"));
        assert_eq!(state.get("abc"), Some("123"));
        assert!(state.contains("xyz"));

        state.set("abc", "345");
        assert_eq!(state.get("abc"), Some("345"));
        assert!(!state.is_empty());
    }
}
