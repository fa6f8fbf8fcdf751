use crate::llm;
use crate::{Error, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
        ChatCompletionRequestToolMessage, ChatCompletionRequestToolMessageContent,
        ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
        CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs, Role, WebSearchOptions,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

pub struct OpenAI {
    model: String,
    client: Client<OpenAIConfig>,
}

impl OpenAI {
    /// Client for any OpenAI-compatible chat completions endpoint.
    pub fn compatible(model: String, api_base: &str, api_key: &str) -> Arc<Self> {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);

        Arc::new(Self {
            model,
            client: Client::with_config(config),
        })
    }
}

impl TryFrom<&llm::Message> for ChatCompletionRequestMessage {
    type Error = Error;

    fn try_from(msg: &llm::Message) -> Result<Self> {
        match msg {
            llm::Message::User(msg) => Ok(ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.clone()),
                    name: None,
                },
            )),
            llm::Message::System(msg) => Ok(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.clone()),
                    name: None,
                },
            )),
            llm::Message::Tool { id, result, .. } => Ok(ChatCompletionRequestMessage::Tool(
                ChatCompletionRequestToolMessage {
                    content: ChatCompletionRequestToolMessageContent::Text(result.clone()),
                    tool_call_id: id.clone(),
                },
            )),
            llm::Message::Assistant(msg, tool_calls) => {
                let mut assistant = ChatCompletionRequestAssistantMessageArgs::default();
                assistant.content(ChatCompletionRequestAssistantMessageContent::Text(
                    msg.clone(),
                ));

                // an empty tool_calls array is rejected by the api
                if !tool_calls.is_empty() {
                    assistant.tool_calls(
                        tool_calls
                            .iter()
                            .map(|call| ChatCompletionMessageToolCall {
                                id: call.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: call.name.clone(),
                                    arguments: call.args.clone(),
                                },
                            })
                            .collect::<Vec<_>>(),
                    );
                }

                Ok(ChatCompletionRequestMessage::Assistant(assistant.build()?))
            }
        }
    }
}

impl TryFrom<&llm::ToolDefinition> for ChatCompletionTool {
    type Error = Error;

    fn try_from(tool: &llm::ToolDefinition) -> Result<Self> {
        let res = ChatCompletionToolArgs::default()
            .function(
                FunctionObjectArgs::default()
                    .name(tool.name.clone())
                    .description(tool.desc.clone())
                    .parameters(tool.params.clone())
                    .build()?,
            )
            .build()?;

        Ok(res)
    }
}

#[async_trait]
impl llm::LLM for OpenAI {
    async fn completion<'a>(
        &self,
        request: llm::CompletionRequest<'a>,
    ) -> Result<llm::CompletionResponse> {
        let mut completion = CreateChatCompletionRequestArgs::default();
        completion
            .model(&self.model)
            .messages(
                request
                    .messages
                    .iter()
                    .map(ChatCompletionRequestMessage::try_from)
                    .collect::<Result<Vec<_>>>()?,
            );

        if !request.tools.is_empty() {
            completion.tools(
                request
                    .tools
                    .iter()
                    .map(ChatCompletionTool::try_from)
                    .collect::<Result<Vec<_>>>()?,
            );
        }

        if request.web_search_tool {
            completion.web_search_options(WebSearchOptions::default());
        }

        let completion = completion.build()?;

        let res = self.client.chat().create(completion).await?;

        if res.choices.is_empty() {
            return Err(Error::LLMResponseError("choices is empty".to_string()));
        }

        if res.choices[0].message.role != Role::Assistant {
            return Err(Error::LLMResponseError(
                "expected role to be assistant".to_string(),
            ));
        }

        // content is absent when the model only calls tools
        let content = res.choices[0].message.content.clone().unwrap_or_default();

        let tool_calls: Vec<llm::ToolCall> = res.choices[0]
            .message
            .tool_calls
            .iter()
            .flat_map(|calls| {
                calls.iter().map(|call| llm::ToolCall {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    args: call.function.arguments.clone(),
                })
            })
            .collect();

        tracing::debug!(
            model = %self.model,
            tool_calls = tool_calls.len(),
            "completion received"
        );

        Ok(llm::CompletionResponse {
            content,
            tool_calls,
        })
    }
}
