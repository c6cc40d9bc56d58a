//! HTTP client for the judge and embeddings endpoints
//!
//! Thin wrapper over the OpenAI chat-completions and embeddings wire
//! formats, with an Azure OpenAI variant that swaps the URL scheme and
//! auth header. No retries, rate limiting or streaming: a failed call
//! surfaces to the metric caller as-is.

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::error::{EvalError, EvalResult};
use crate::llm::messages::{FunctionSpec, JudgeMessage, JudgeResponse};
use crate::llm::provider::{JudgeProvider, ModelParameters, ProviderConfig};

/// Client for LLM-judged and embedding-based metrics
pub struct JudgeClient {
    provider: JudgeProvider,
    config: ProviderConfig,
    model_params: ModelParameters,
    http_client: Client,
}

impl JudgeClient {
    /// Create a new judge client.
    ///
    /// Returns [`EvalError::Config`] when the configuration is missing
    /// an API key, or (for Azure) an endpoint.
    pub fn new(
        provider: JudgeProvider,
        config: ProviderConfig,
        model_params: ModelParameters,
    ) -> EvalResult<Self> {
        if config.api_key.is_none() {
            return Err(EvalError::config(format!(
                "no API key configured for provider '{provider}'"
            )));
        }
        if provider == JudgeProvider::AzureOpenAi && config.base_url.is_none() {
            return Err(EvalError::config("no endpoint configured for Azure OpenAI"));
        }

        let http_client = Client::builder()
            .build()
            .map_err(|e| EvalError::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            provider,
            config,
            model_params,
            http_client,
        })
    }

    /// Create a client configured from environment variables
    pub fn from_env(provider: JudgeProvider) -> EvalResult<Self> {
        let config = ProviderConfig::from_env(provider)?;
        Self::new(provider, config, ModelParameters::default())
    }

    /// The provider this client talks to
    pub fn provider(&self) -> JudgeProvider {
        self.provider
    }

    /// The configured chat model
    pub fn model(&self) -> &str {
        &self.model_params.model
    }

    fn chat_url(&self) -> String {
        match self.provider {
            JudgeProvider::OpenAi => {
                format!("{}/chat/completions", self.config.get_base_url())
            }
            JudgeProvider::AzureOpenAi => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.config.get_base_url(),
                self.model_params.model,
                self.config.api_version.as_deref().unwrap_or("2024-02-01"),
            ),
        }
    }

    fn embeddings_url(&self) -> String {
        match self.provider {
            JudgeProvider::OpenAi => format!("{}/embeddings", self.config.get_base_url()),
            JudgeProvider::AzureOpenAi => format!(
                "{}/openai/deployments/{}/embeddings?api-version={}",
                self.config.get_base_url(),
                self.model_params.embedding_model,
                self.config.api_version.as_deref().unwrap_or("2024-02-01"),
            ),
        }
    }

    async fn post(&self, url: &str, body: &Value) -> EvalResult<Value> {
        let mut request = self.http_client.post(url).json(body);

        // OpenAI authenticates with a bearer token, Azure with an api-key header
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| EvalError::config("API key missing"))?;
        match self.provider {
            JudgeProvider::OpenAi => {
                request = request.bearer_auth(api_key);
                if let Some(org) = &self.config.organization {
                    request = request.header("OpenAI-Organization", org);
                }
            }
            JudgeProvider::AzureOpenAi => {
                request = request.header("api-key", api_key);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| EvalError::http(format!("{} request failed: {e}", self.provider)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvalError::llm(format!(
                "{} API error (status {status}): {error_text}",
                self.provider
            )));
        }

        response
            .json()
            .await
            .map_err(|e| EvalError::json(format!("failed to parse {} response: {e}", self.provider)))
    }

    /// Send a chat request, optionally forcing a function call for a
    /// structured judgment.
    #[instrument(skip(self, messages, function), level = "debug")]
    pub async fn chat(
        &self,
        messages: &[JudgeMessage],
        function: Option<&FunctionSpec>,
    ) -> EvalResult<JudgeResponse> {
        let mut request_body = json!({
            "model": self.model_params.model,
            "messages": messages,
        });
        if let Some(temperature) = self.model_params.temperature {
            request_body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.model_params.max_tokens {
            request_body["max_tokens"] = json!(max_tokens);
        }
        if let Some(function) = function {
            request_body["tools"] = json!([function.to_schema()]);
            request_body["tool_choice"] = json!({
                "type": "function",
                "function": { "name": function.name }
            });
        }

        let response_json = self.post(&self.chat_url(), &request_body).await?;
        debug!(provider = %self.provider, "judge reply received");
        parse_chat_response(response_json)
    }

    /// Fetch embeddings for a batch of inputs, one vector per input
    #[instrument(skip(self, inputs), level = "debug")]
    pub async fn embed(&self, inputs: &[String]) -> EvalResult<Vec<Vec<f64>>> {
        let request_body = json!({
            "model": self.model_params.embedding_model,
            "input": inputs,
        });

        let response_json = self.post(&self.embeddings_url(), &request_body).await?;
        let data = response_json["data"]
            .as_array()
            .ok_or_else(|| EvalError::llm("embeddings response has no data array"))?;
        if data.len() != inputs.len() {
            return Err(EvalError::llm(format!(
                "embeddings response has {} vectors for {} inputs",
                data.len(),
                inputs.len()
            )));
        }

        data.iter()
            .map(|entry| {
                entry["embedding"]
                    .as_array()
                    .ok_or_else(|| EvalError::llm("embeddings entry has no embedding array"))?
                    .iter()
                    .map(|v| {
                        v.as_f64()
                            .ok_or_else(|| EvalError::llm("non-numeric embedding component"))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Parse a chat-completions reply into a [`JudgeResponse`].
///
/// Accepts both the current `tool_calls` shape and the legacy
/// `function_call` shape for the structured judgment arguments.
pub(crate) fn parse_chat_response(response: Value) -> EvalResult<JudgeResponse> {
    let choice = response["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| EvalError::llm("chat response has no choices"))?;
    let message = &choice["message"];

    let content = message["content"].as_str().unwrap_or("").to_string();

    let arguments = message["tool_calls"]
        .as_array()
        .and_then(|calls| calls.first())
        .and_then(|call| call["function"]["arguments"].as_str())
        .or_else(|| message["function_call"]["arguments"].as_str());
    let function_args = match arguments {
        Some(raw) => Some(
            serde_json::from_str(raw)
                .map_err(|e| EvalError::json(format!("malformed function arguments: {e}")))?,
        ),
        None => None,
    };

    Ok(JudgeResponse {
        content,
        function_args,
        model: response["model"].as_str().map(|s| s.to_string()),
        finish_reason: choice["finish_reason"].as_str().map(|s| s.to_string()),
    })
}
