use crate::config::PodcastConfig;
use crate::error::Result;
use crate::run_dir::{RUN_DIR_KEY, RUN_ID_KEY};
use crate::tools::{GENERATE_AUDIO_TOOL, GenerateAudio, SAVE_SCRIPT_TOOL, SaveScript, ToolOutcome};
use crate::tts::SpeechSynthesisProvider;
use agent::callbacks::MessageLogger;
use agent::llm::{self, Message};
use agent::tools::{self, FunctionalTool};
use agent::{Agent, AgentBuilder, FinalResponse, State, final_response};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

pub const RESEARCH_SUMMARY_KEY: &str = "research_summary";
pub const PODCAST_SCRIPT_KEY: &str = "podcast_script";

const COORDINATOR_PROMPT: &str = include_str!("prompts/coordinator.md");
const RESEARCHER_PROMPT: &str = include_str!("prompts/researcher.md");
const SCRIPTWRITER_PROMPT: &str = include_str!("prompts/scriptwriter.md");

pub type Llm = Arc<dyn llm::LLM + Send + Sync>;

pub struct Models {
    pub coordinator: Llm,
    pub researcher: Llm,
    pub scriptwriter: Llm,
}

/// Outcome of one production: the session state holding the run directory
/// and agent outputs, plus the coordinator's closing message.
pub struct Production {
    pub state: State,
    pub history: Vec<Message>,
}

impl Production {
    pub fn summary(&self) -> Option<&str> {
        final_response(&self.history)
    }

    pub fn run_dir(&self) -> Option<&str> {
        self.state.get(RUN_DIR_KEY)
    }

    pub fn run_id(&self) -> Option<&str> {
        self.state.get(RUN_ID_KEY)
    }

    /// Results reported by the artifact tools, in call order.
    pub fn artifacts(&self) -> Vec<ToolOutcome> {
        self.history
            .iter()
            .filter_map(|m| match m {
                Message::Tool { name, result, .. }
                    if name == SAVE_SCRIPT_TOOL || name == GENERATE_AUDIO_TOOL =>
                {
                    serde_json::from_str(result).ok()
                }
                _ => None,
            })
            .collect()
    }
}

/// Drives one coordinating agent that delegates to the research and
/// scriptwriting agents and persists their output through the artifact tools.
pub struct Producer {
    agent: Agent,
}

impl Producer {
    pub fn new(
        config: Arc<PodcastConfig>,
        models: Models,
        speech: Arc<dyn SpeechSynthesisProvider + Send + Sync>,
    ) -> Result<Self> {
        let researcher = AgentTool {
            name: "researcher_agent",
            description: "Researches a topic with web search and returns a summary of key points for podcast content.",
            prompt: RESEARCHER_PROMPT,
            llm: models.researcher,
            websearch: true,
            output_key: RESEARCH_SUMMARY_KEY,
            context_keys: &[],
        };

        let scriptwriter = AgentTool {
            name: "scriptwriter_agent",
            description: "Turns the research summary into an engaging two-speaker podcast dialogue and returns the script.",
            prompt: SCRIPTWRITER_PROMPT,
            llm: models.scriptwriter,
            websearch: false,
            output_key: PODCAST_SCRIPT_KEY,
            context_keys: &[RESEARCH_SUMMARY_KEY],
        };

        let agent = AgentBuilder::new()
            .system_prompt(COORDINATOR_PROMPT.to_string())
            .llm(models.coordinator)
            .tool(Box::new(researcher))
            .tool(Box::new(scriptwriter))
            .tool(SaveScript::new(config.output_dir.clone()))
            .tool(GenerateAudio::new(speech, config))
            .callback(MessageLogger::new("podcast_producer"))
            .stop_condition(Box::new(FinalResponse))
            .build()?;

        Ok(Self { agent })
    }

    /// Produces one episode about `topic` with a fresh session state.
    pub async fn produce(&mut self, topic: &str) -> Result<Production> {
        tracing::info!(topic, "starting production");

        let mut state = State::new();
        let history = self
            .agent
            .run(&mut state, format!("Create a podcast about: {}", topic))
            .await?;

        Ok(Production { state, history })
    }
}

#[derive(Deserialize, JsonSchema)]
struct AgentRequest {
    /// What the agent should do, in plain language
    request: String,
}

/// Exposes a sub-agent as a tool. Each call runs a fresh agent on the shared
/// session state and stores its final answer under `output_key`.
struct AgentTool {
    name: &'static str,
    description: &'static str,
    prompt: &'static str,
    llm: Llm,
    websearch: bool,
    output_key: &'static str,
    context_keys: &'static [&'static str],
}

impl AgentTool {
    fn build(&self) -> agent::Result<Agent> {
        let mut builder = AgentBuilder::new()
            .system_prompt(self.prompt.to_string())
            .llm(self.llm.clone())
            .callback(MessageLogger::new(self.name))
            .stop_condition(Box::new(FinalResponse));

        if self.websearch {
            builder = builder.llm_websearch();
        }

        builder.build()
    }

    /// The request followed by the values of the context keys present in `state`.
    fn compose_prompt(&self, request: &str, state: &State) -> String {
        let mut prompt = request.to_string();
        for key in self.context_keys {
            if let Some(value) = state.get(key) {
                prompt.push_str(&format!("\n\n## {}\n{}", key, value));
            }
        }
        prompt
    }
}

#[async_trait]
impl FunctionalTool for AgentTool {
    fn definition(&self) -> agent::Result<tools::ToolDefinition> {
        tools::ToolDefinition::new::<AgentRequest>(self.name, self.description)
    }

    async fn invoke_fn(&mut self, call: &tools::ToolCall, state: &mut State) -> agent::Result<Message> {
        let args: AgentRequest = call.args()?;

        let prompt = self.compose_prompt(&args.request, state);
        let mut agent = self.build()?;
        let history = agent.run(state, prompt).await?;

        let result = match final_response(&history) {
            Some(text) if !text.trim().is_empty() => {
                state.set(self.output_key, text);
                text.to_string()
            }
            _ => format!("{} finished without producing a response", self.name),
        };

        Ok(Message::Tool {
            id: call.id.clone(),
            name: self.name.to_string(),
            result,
        })
    }
}
