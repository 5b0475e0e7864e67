use crate::config::Settings;
use crate::core::chat::{ChatContext, ChatItem};
use crate::core::llm::{ModelClient, ModelTurn, ToolChoice, ToolInvocation, TurnRequest};
use crate::tools::ToolMetadata;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    arguments: String,
}

/// Chat-completions client speaking the function-calling protocol
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    settings: Settings,
}

impl OpenAiClient {
    pub fn new(api_key: String, settings: Settings) -> Self {
        Self {
            client: Client::new(),
            api_key,
            settings,
        }
    }

    fn build_request(&self, request: &TurnRequest<'_>) -> ChatRequest {
        let tools: Vec<Value> = request.tools.iter().map(function_spec).collect();
        let has_tools = !tools.is_empty();

        ChatRequest {
            model: request
                .options
                .model
                .clone()
                .unwrap_or_else(|| self.settings.llm.model.clone()),
            messages: to_messages(request.context),
            max_tokens: self.settings.llm.max_tokens,
            temperature: request
                .options
                .temperature
                .unwrap_or(self.settings.llm.temperature),
            tools,
            tool_choice: has_tools.then(|| request.tool_choice.as_str()),
            parallel_tool_calls: has_tools.then_some(false),
        }
    }

    async fn send(&self, body: &ChatRequest) -> Result<ChatResponse> {
        const MAX_RETRIES: u32 = 3;
        const BASE_DELAY_MS: u64 = 1000;

        let url = format!(
            "{}/chat/completions",
            self.settings.llm.api_base.trim_end_matches('/')
        );
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2_u64.pow(attempt - 1);
                tracing::warn!(
                    "[OpenAiClient] Retrying API call (attempt {}/{}) after {}ms delay",
                    attempt + 1,
                    MAX_RETRIES,
                    delay
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!("[OpenAiClient] HTTP request failed: {}", e);
                    last_error = Some(anyhow::anyhow!("HTTP request failed: {}", e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                tracing::warn!(
                    "[OpenAiClient] API returned error status {}: {}",
                    status,
                    error_text
                );
                last_error = Some(anyhow::anyhow!("API error {}: {}", status, error_text));
                // Client errors will not improve on retry
                if status.is_client_error() && status.as_u16() != 429 {
                    break;
                }
                continue;
            }

            match response.json::<ChatResponse>().await {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    tracing::warn!("[OpenAiClient] Failed to decode response body: {}", e);
                    last_error = Some(anyhow::anyhow!("Response decode error: {}", e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("All retry attempts failed")))
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn run_turn(&self, request: TurnRequest<'_>) -> Result<ModelTurn> {
        let body = self.build_request(&request);
        let response = self.send(&body).await?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| anyhow::anyhow!("Response contained no choices"))?;

        // parallel_tool_calls is off, so at most one call is expected
        if let Some(call) = message.tool_calls.into_iter().next() {
            if request.tool_choice == ToolChoice::None {
                tracing::warn!(
                    "[OpenAiClient] '{}' returned a tool call with tool_choice=none",
                    request.agent
                );
            }
            // Unparseable arguments are passed through; the dispatcher reports them
            let arguments = match serde_json::from_str::<Value>(&call.function.arguments) {
                Ok(value) => value,
                Err(_) => Value::String(call.function.arguments.clone()),
            };
            return Ok(ModelTurn::ToolCall(ToolInvocation {
                call_id: call.id,
                name: call.function.name,
                arguments,
            }));
        }

        Ok(ModelTurn::Reply(message.content.unwrap_or_default()))
    }
}

fn function_spec(tool: &ToolMetadata) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters_schema(),
        }
    })
}

fn to_messages(context: &ChatContext) -> Vec<Value> {
    context
        .items()
        .iter()
        .map(|item| match item {
            ChatItem::Message { role, content, .. } => json!({
                "role": role.as_str(),
                "content": content,
            }),
            ChatItem::FunctionCall {
                call_id,
                name,
                arguments,
                ..
            } => json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": call_id,
                    "type": "function",
                    "function": {
                        "name": name,
                        "arguments": arguments.to_string(),
                    }
                }]
            }),
            ChatItem::FunctionCallOutput {
                call_id, output, ..
            } => json!({
                "role": "tool",
                "tool_call_id": call_id,
                "content": output,
            }),
        })
        .collect()
}
