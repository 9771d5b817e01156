//! Wire types for the OpenAI-compatible chat-completion endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// System + user instruction pair sent as the two-message conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system,
            },
            ChatMessage {
                role: Role::User,
                content: self.user,
            },
        ]
    }
}

/// A function the model is forced to call; `parameters` is its JSON schema.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolSpec {
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            kind: ToolKind::Function,
            function: FunctionDefinition {
                name: self.name.to_string(),
                description: self.description.to_string(),
                parameters: self.parameters.clone(),
            },
        }
    }

    pub fn choice(&self) -> ToolChoice {
        ToolChoice {
            kind: ToolKind::Function,
            function: NamedFunction {
                name: self.name.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Function,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedFunction {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolChoice {
    #[serde(rename = "type")]
    pub kind: ToolKind,
    pub function: NamedFunction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
}

impl ChatCompletionRequest {
    pub fn forced_tool_call(model: &str, prompts: PromptPair, tool: &ToolSpec) -> Self {
        Self {
            model: model.to_string(),
            messages: prompts.into_messages(),
            tools: vec![tool.definition()],
            tool_choice: tool.choice(),
        }
    }
}

/// Only the path to the first tool call is typed, and every step of it may
/// be missing or null. A 2xx envelope without that path is a generation
/// failure, not a transport one.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

impl ChatCompletionResponse {
    /// The payload is the first choice's first tool invocation.
    pub fn first_function_call(&self) -> Option<&FunctionCall> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .tool_calls
            .as_ref()?
            .first()?
            .function
            .as_ref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub function: Option<FunctionCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl FunctionCall {
    /// OpenAI-style APIs encode arguments as a JSON string; some gateways
    /// send the object directly.
    pub fn arguments_json(&self) -> Result<Value, serde_json::Error> {
        match &self.arguments {
            Value::String(raw) => serde_json::from_str(raw),
            other => Ok(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_forced_tool_choice() {
        let tool = ToolSpec {
            name: "create_quiz",
            description: "Create a quiz",
            parameters: json!({ "type": "object" }),
        };
        let prompts = PromptPair {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        let body =
            serde_json::to_value(ChatCompletionRequest::forced_tool_call("m", prompts, &tool))
                .unwrap();

        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "create_quiz");
        assert_eq!(body["tool_choice"]["function"]["name"], "create_quiz");
    }

    #[test]
    fn first_function_call_handles_missing_pieces() {
        let empty: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.first_function_call().is_none());

        let no_tools: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Sure!" } }]
        }))
        .unwrap();
        assert!(no_tools.first_function_call().is_none());

        let null_tools: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": null, "tool_calls": null } }]
        }))
        .unwrap();
        assert!(null_tools.first_function_call().is_none());
    }

    #[test]
    fn partial_envelopes_decode_without_a_call() {
        let envelopes = [
            json!({ "choices": null }),
            json!({ "choices": [{ "index": 0, "finish_reason": "stop" }] }),
            json!({ "choices": [{ "message": null }] }),
            json!({ "choices": [{ "message": { "tool_calls": [{ "type": "function" }] } }] }),
            json!({ "choices": [{ "message": { "tool_calls": [{ "function": null }] } }] }),
        ];
        for envelope in envelopes {
            let response: ChatCompletionResponse =
                serde_json::from_value(envelope.clone()).unwrap();
            assert!(
                response.first_function_call().is_none(),
                "expected no call in {}",
                envelope
            );
        }
    }

    #[test]
    fn first_function_call_reads_name_and_arguments() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "tool_calls": [{
                "function": { "name": "create_quiz", "arguments": "{\"questions\":[]}" }
            }] } }]
        }))
        .unwrap();
        let call = response.first_function_call().unwrap();
        assert_eq!(call.name, "create_quiz");
        assert_eq!(call.arguments_json().unwrap(), json!({ "questions": [] }));
    }

    #[test]
    fn arguments_accept_string_or_object() {
        let stringly = FunctionCall {
            name: "f".to_string(),
            arguments: json!("{\"a\":1}"),
        };
        assert_eq!(stringly.arguments_json().unwrap(), json!({ "a": 1 }));

        let object = FunctionCall {
            name: "f".to_string(),
            arguments: json!({ "a": 1 }),
        };
        assert_eq!(object.arguments_json().unwrap(), json!({ "a": 1 }));

        let broken = FunctionCall {
            name: "f".to_string(),
            arguments: json!("{not json"),
        };
        assert!(broken.arguments_json().is_err());
    }
}
