use crate::State;
use crate::callbacks;
use crate::llm;
use crate::llm::Message;
use crate::tools;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub trait StopCondition {
    fn done(&self, history: &[llm::Message]) -> bool;
}

/// Stops once the model answers without requesting any tool.
pub struct FinalResponse;

impl StopCondition for FinalResponse {
    fn done(&self, history: &[llm::Message]) -> bool {
        matches!(history.last(), Some(Message::Assistant(_, tool_calls)) if tool_calls.is_empty())
    }
}

/// Text of the last assistant message in `history`.
pub fn final_response(history: &[Message]) -> Option<&str> {
    history.iter().rev().find_map(|m| match m {
        Message::Assistant(content, _) => Some(content.as_str()),
        _ => None,
    })
}

type Tool = Box<dyn tools::Tool + Send>;
type Callback = Box<dyn callbacks::Callback + Send>;

pub struct Agent {
    llm: Arc<dyn llm::LLM + Send + Sync>,
    system_prompt: Option<String>,
    tools: HashMap<String, Tool>,
    callbacks: Vec<Callback>,
    tool_defs: Vec<tools::ToolDefinition>,
    stop_condition: Box<dyn StopCondition + Send>,
    llm_websearch: bool,
}

impl Agent {
    async fn execute_tool_call(
        &mut self,
        tool_call: &tools::ToolCall,
        state: &mut State,
        messages: Vec<llm::Message>,
    ) -> Result<Vec<llm::Message>> {
        let tool = self
            .tools
            .get_mut(&tool_call.name)
            .ok_or(Error::ToolDoesNotExist(tool_call.name.clone()))?;

        tracing::debug!(tool = %tool_call.name, id = %tool_call.id, "invoking tool");

        let messages = tool.invoke(tool_call, state, messages).await?;

        Ok(messages)
    }

    /// Runs the completion loop on a fresh history seeded with the system
    /// prompt and `prompt`, until the stop condition holds.
    pub async fn run(&mut self, state: &mut State, prompt: String) -> Result<Vec<Message>> {
        let mut messages = Vec::new();
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(Message::System(system_prompt.clone()));
        }
        messages.push(Message::User(prompt));

        while !self.stop_condition.done(&messages) {
            let next = self
                .llm
                .completion(llm::CompletionRequest {
                    messages: &messages,
                    tools: &self.tool_defs,
                    web_search_tool: self.llm_websearch,
                })
                .await?;

            messages.push(llm::Message::Assistant(
                next.content,
                next.tool_calls.clone(),
            ));

            for tool_call in &next.tool_calls {
                messages = self.execute_tool_call(tool_call, state, messages).await?;
            }

            for callback in &mut self.callbacks {
                messages = callback.call(messages).await?;
            }
        }

        Ok(messages)
    }
}

pub struct AgentBuilder {
    llm: Option<Arc<dyn llm::LLM + Send + Sync>>,
    system_prompt: Option<String>,
    tools: Vec<Tool>,
    callbacks: Vec<Callback>,
    stop_condition: Option<Box<dyn StopCondition + Send>>,
    llm_websearch: bool,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            system_prompt: None,
            tools: Vec::new(),
            callbacks: Vec::new(),
            stop_condition: None,
            llm_websearch: false,
        }
    }

    pub fn llm(mut self, llm: Arc<dyn llm::LLM + Send + Sync>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn callback(mut self, callback: Callback) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn stop_condition(mut self, cond: Box<dyn StopCondition + Send>) -> Self {
        self.stop_condition = Some(cond);
        self
    }

    pub fn llm_websearch(mut self) -> Self {
        self.llm_websearch = true;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let mut tool_defs = Vec::new();
        let mut tools = HashMap::new();

        for tool in self.tools {
            let def = tool.definition()?;
            tools.insert(def.name.clone(), tool);
            tool_defs.push(def);
        }

        Ok(Agent {
            llm: self
                .llm
                .ok_or(Error::MissingArg("llm is required for agent".to_string()))?,
            system_prompt: self.system_prompt,
            tools,
            tool_defs,
            callbacks: self.callbacks,
            stop_condition: self.stop_condition.ok_or(Error::MissingArg(
                "stop_condition is required for agent".to_string(),
            ))?,
            llm_websearch: self.llm_websearch,
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
