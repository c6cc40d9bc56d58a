//! Judge provider selection and configuration

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

/// Supported chat-completion providers for LLM-judged metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeProvider {
    /// OpenAI chat completions API
    OpenAi,
    /// Azure OpenAI deployments
    AzureOpenAi,
}

impl JudgeProvider {
    /// Provider name as used in configuration
    pub fn name(&self) -> &'static str {
        match self {
            JudgeProvider::OpenAi => "openai",
            JudgeProvider::AzureOpenAi => "azure_openai",
        }
    }
}

impl std::fmt::Display for JudgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Connection configuration for a judge provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication
    pub api_key: Option<String>,
    /// Base URL (endpoint for Azure, API root for OpenAI)
    pub base_url: Option<String>,
    /// API version (required by Azure)
    pub api_version: Option<String>,
    /// Organization ID (OpenAI only)
    pub organization: Option<String>,
}

impl ProviderConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set organization ID
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Load configuration from the environment.
    ///
    /// OpenAI reads `OPENAI_API_KEY`; Azure reads `AZURE_OPENAI_KEY`,
    /// `AZURE_OPENAI_ENDPOINT` and `OPENAI_API_VERSION`.
    pub fn from_env(provider: JudgeProvider) -> EvalResult<Self> {
        match provider {
            JudgeProvider::OpenAi => {
                let api_key = std::env::var("OPENAI_API_KEY")
                    .map_err(|_| EvalError::config("OPENAI_API_KEY is not set"))?;
                Ok(Self::new().with_api_key(api_key))
            }
            JudgeProvider::AzureOpenAi => {
                let api_key = std::env::var("AZURE_OPENAI_KEY")
                    .map_err(|_| EvalError::config("AZURE_OPENAI_KEY is not set"))?;
                let endpoint = std::env::var("AZURE_OPENAI_ENDPOINT")
                    .map_err(|_| EvalError::config("AZURE_OPENAI_ENDPOINT is not set"))?;
                let mut config = Self::new().with_api_key(api_key).with_base_url(endpoint);
                if let Ok(version) = std::env::var("OPENAI_API_VERSION") {
                    config = config.with_api_version(version);
                }
                Ok(config)
            }
        }
    }

    /// Base URL, falling back to the public OpenAI endpoint
    pub fn get_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or("https://api.openai.com/v1")
    }
}

/// Model parameters for judge requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Chat model (or Azure deployment name)
    pub model: String,
    /// Embedding model (or Azure deployment name)
    pub embedding_model: String,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Maximum tokens in the judge reply
    pub max_tokens: Option<u32>,
}

impl ModelParameters {
    /// Create parameters for a chat model with default settings
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: Some(0.0),
            max_tokens: None,
        }
    }
}
