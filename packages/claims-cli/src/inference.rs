// Inference backend used by the pipeline.
//
// This is an INFRASTRUCTURE trait only: it forwards text to a hosted model and
// returns whatever comes back. Prompt assembly lives in the pipeline.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use inference_client::{ChatRequest, InferenceClient, Message, QuestionAnswer};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{Config, InferenceConfig, ModelsConfig};

/// Answer/reasoning pair returned by abstractive question answering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AbstractiveAnswer {
    pub answer: String,
    pub reasoning: String,
}

#[async_trait]
pub trait BaseInference: Send + Sync {
    /// Extract an answer span for `question` from `context`.
    async fn answer_extractive(&self, question: &str, context: &str) -> Result<QuestionAnswer>;

    /// Answer a prepared user query under a system instruction.
    async fn answer_abstractive(
        &self,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<AbstractiveAnswer>;

    /// Summarize `text`.
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Hosted models behind the inference router.
pub struct HostedInference {
    client: InferenceClient,
    models: ModelsConfig,
    settings: InferenceConfig,
}

impl HostedInference {
    pub fn new(client: InferenceClient, config: &Config) -> Self {
        Self {
            client,
            models: config.models.clone(),
            settings: config.inference.clone(),
        }
    }

    /// Build from `HF_TOKEN` and the `[inference]` settings.
    pub fn from_env(config: &Config) -> Result<Self> {
        let client = InferenceClient::from_env()?
            .with_base_url(config.inference.base_url.as_str())
            .with_timeout(Duration::from_secs(config.inference.timeout_secs))?;
        Ok(Self::new(client, config))
    }
}

#[async_trait]
impl BaseInference for HostedInference {
    async fn answer_extractive(&self, question: &str, context: &str) -> Result<QuestionAnswer> {
        self.client
            .question_answering(&self.models.extractive_qa, question, context)
            .await
            .with_context(|| format!("question answering with {}", self.models.extractive_qa))
    }

    async fn answer_abstractive(
        &self,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<AbstractiveAnswer> {
        let request = ChatRequest::new(self.models.llm.as_str())
            .message(Message::system(system_prompt))
            .message(Message::user(user_query))
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature);

        self.client
            .extract::<AbstractiveAnswer>(request)
            .await
            .with_context(|| format!("abstractive answer with {}", self.models.llm))
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        self.client
            .summarization(&self.models.summarization, text)
            .await
            .with_context(|| format!("summarization with {}", self.models.summarization))
    }
}
