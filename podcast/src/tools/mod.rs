//! Tools that persist the artifacts of a production.
//!
//! Both tools resolve their target directory through
//! [`ensure_run`](crate::run_dir::ensure_run), so the script and the audio of
//! one production share a run directory. Failures never escape a tool: they
//! are reported to the model as an error [`ToolOutcome`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod generate_audio;
mod save_script;

pub use generate_audio::GenerateAudio;
pub use save_script::SaveScript;

pub const SAVE_SCRIPT_TOOL: &str = "save_script_to_file";
pub const GENERATE_AUDIO_TOOL: &str = "generate_tts_audio";

const DEFAULT_TOPIC: &str = "podcast";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success {
        message: String,
        file_path: String,
        run_directory: String,
    },
    Error {
        message: String,
    },
}

impl ToolOutcome {
    fn saved(message: String, file_path: &Path, run_directory: &Path) -> Self {
        ToolOutcome::Success {
            message,
            file_path: file_path.display().to_string(),
            run_directory: run_directory.display().to_string(),
        }
    }

    fn error(message: String) -> Self {
        tracing::error!("{}", message);
        ToolOutcome::Error { message }
    }

    pub fn message(&self) -> &str {
        match self {
            ToolOutcome::Success { message, .. } | ToolOutcome::Error { message } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

#[derive(Deserialize, JsonSchema)]
struct ScriptArgs {
    /// The full two-speaker podcast script
    script_text: String,
    /// The podcast topic, used to name the run directory
    #[serde(default = "default_topic")]
    topic: String,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
