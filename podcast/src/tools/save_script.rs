use crate::error::Result;
use crate::run_dir::ensure_run;
use crate::tools::{SAVE_SCRIPT_TOOL, ScriptArgs, ToolOutcome};
use agent::State;
use agent::llm::Message;
use agent::tools::{FunctionalTool, ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::path::{PathBuf, absolute};

/// Writes the dialogue script to `{run_dir}/{run_id}.txt`.
pub struct SaveScript {
    output_dir: PathBuf,
}

impl SaveScript {
    pub fn new(output_dir: PathBuf) -> Box<Self> {
        Box::new(Self { output_dir })
    }

    pub fn save(&self, script_text: &str, state: &mut State, topic: &str) -> ToolOutcome {
        match self.write(script_text, state, topic) {
            Ok(outcome) => outcome,
            Err(e) => ToolOutcome::error(format!("Failed to save script: {}", e)),
        }
    }

    fn write(&self, script_text: &str, state: &mut State, topic: &str) -> Result<ToolOutcome> {
        let run = ensure_run(state, topic, &self.output_dir)?;
        let path = run.artifact("txt");
        std::fs::write(&path, script_text)?;

        let path = absolute(&path)?;
        tracing::info!(path = %path.display(), "script saved");

        Ok(ToolOutcome::saved(
            format!("Script saved to {}", path.display()),
            &path,
            &absolute(&run.dir)?,
        ))
    }
}

#[async_trait]
impl FunctionalTool for SaveScript {
    fn definition(&self) -> agent::Result<ToolDefinition> {
        ToolDefinition::new::<ScriptArgs>(
            SAVE_SCRIPT_TOOL,
            "save the finished podcast script to a text file in this production's run directory",
        )
    }

    async fn invoke_fn(&mut self, call: &ToolCall, state: &mut State) -> agent::Result<Message> {
        let args: ScriptArgs = call.args()?;
        let outcome = self.save(&args.script_text, state, &args.topic);

        Ok(Message::Tool {
            id: call.id.clone(),
            name: SAVE_SCRIPT_TOOL.to_string(),
            result: serde_json::to_string(&outcome)?,
        })
    }
}
