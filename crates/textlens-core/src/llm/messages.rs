//! Judge message and response types

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Role of a message sent to the judge model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeRole {
    /// System message (instructions)
    System,
    /// User message (the assessment prompt)
    User,
    /// Assistant message
    Assistant,
}

/// A message in the judge conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeMessage {
    /// Role of the message sender
    pub role: JudgeRole,
    /// Content of the message
    pub content: String,
}

impl JudgeMessage {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: JudgeRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: JudgeRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: JudgeRole::Assistant,
            content: content.into(),
        }
    }
}

/// A forced function call used to extract a structured judgment.
///
/// The judge is asked to call a function with a single string
/// parameter restricted to an enumerated set of choices, so the
/// assessment comes back as machine-parseable JSON instead of prose.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// Function name, e.g. `save_sentiment_assessment`
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// Name of the single parameter carrying the judgment
    pub parameter: String,
    /// Allowed values for the parameter
    pub choices: Vec<String>,
}

impl FunctionSpec {
    /// Create a new function spec
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameter: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter: parameter.into(),
            choices,
        }
    }

    /// JSON schema for the function, in the chat-completions tools format
    pub fn to_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.parameter.clone(),
            json!({
                "type": "string",
                "enum": self.choices,
            }),
        );

        json!({
            "type": "function",
            "function": {
                "name": &self.name,
                "description": &self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": [&self.parameter],
                }
            }
        })
    }
}

/// Parsed reply from the judge model
#[derive(Debug, Clone, Default)]
pub struct JudgeResponse {
    /// Plain text content, if any
    pub content: String,
    /// Arguments of the requested function call, if one was returned
    pub function_args: Option<Value>,
    /// Model that produced the reply
    pub model: Option<String>,
    /// Finish reason reported by the API
    pub finish_reason: Option<String>,
}

impl JudgeResponse {
    /// Extract a string argument from the function call, if present
    pub fn function_argument(&self, key: &str) -> Option<&str> {
        self.function_args.as_ref()?.get(key)?.as_str()
    }
}
