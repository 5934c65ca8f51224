//! Pure REST client for hosted model inference.
//!
//! A minimal client for the Hugging Face inference router with no
//! domain-specific logic. Supports chat completions (plain and schema
//! constrained), extractive question answering and summarization.
//!
//! # Example
//!
//! ```rust,ignore
//! use inference_client::{ChatRequest, InferenceClient, Message};
//!
//! let client = InferenceClient::from_env()?;
//!
//! // Chat completion
//! let response = client.chat_completion(
//!     ChatRequest::new("mistralai/Mixtral-8x7B-Instruct-v0.1")
//!         .message(Message::user("Hello!")),
//! ).await?;
//!
//! // Extractive QA
//! let span = client
//!     .question_answering("deepset/roberta-base-squad2", "Who is the doctor?", context)
//!     .await?;
//!
//! // Summarization
//! let summary = client.summarization("facebook/bart-large-cnn", context).await?;
//! ```
//!
//! # Type-Safe Structured Output
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Answer {
//!     answer: String,
//!     reasoning: String,
//! }
//!
//! let answer: Answer = client
//!     .extract(ChatRequest::new(model).message(Message::user(prompt)))
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{InferenceError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Default router endpoint.
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co";

/// Environment variable holding the access token.
pub const TOKEN_ENV: &str = "HF_TOKEN";

/// Pure inference API client.
#[derive(Clone)]
pub struct InferenceClient {
    http_client: Client,
    token: String,
    base_url: String,
}

impl InferenceClient {
    /// Create a new client with the given access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `HF_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| InferenceError::Config(format!("{TOKEN_ENV} not set")))?;
        Ok(Self::new(token))
    }

    /// Set a custom base URL (for proxies, dedicated endpoints, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    /// Get the access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let raw: ChatResponseRaw = self.post_json(&url, &request).await?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InferenceError::Parse("No choices in chat completion".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
        })
    }

    /// Type-safe structured output.
    ///
    /// Constrains the reply to the schema of `T`, then deserializes it.
    /// Markdown code fences around the reply are tolerated.
    pub async fn extract<T: StructuredOutput>(&self, request: ChatRequest) -> Result<T> {
        let request = request.json_schema(T::type_name(), T::response_schema());
        let response = self.chat_completion(request).await?;

        serde_json::from_str(strip_code_blocks(&response.content))
            .map_err(|e| InferenceError::Parse(format!("Failed to deserialize reply: {e}")))
    }

    /// Extractive question answering over `context`.
    pub async fn question_answering(
        &self,
        model: &str,
        question: &str,
        context: &str,
    ) -> Result<QuestionAnswer> {
        let request = QuestionAnsweringRequest {
            inputs: QuestionAnsweringInputs { question, context },
        };

        let response: QuestionAnsweringResponse =
            self.post_json(&self.task_url(model), &request).await?;

        response
            .into_best()
            .ok_or_else(|| InferenceError::Parse("No answer from question answering model".into()))
    }

    /// Summarize `text`.
    pub async fn summarization(&self, model: &str, text: &str) -> Result<String> {
        let request = SummarizationRequest { inputs: text };

        let response: SummarizationResponse =
            self.post_json(&self.task_url(model), &request).await?;

        response
            .into_text()
            .ok_or_else(|| InferenceError::Parse("No summary from summarization model".into()))
    }

    fn task_url(&self, model: &str) -> String {
        format!("{}/hf-inference/models/{}", self.base_url, model)
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url, "Inference request failed");
                InferenceError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, url, "Inference API error");
            return Err(InferenceError::api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = InferenceClient::new("hf_test").with_base_url("https://custom.api.com/");

        assert_eq!(client.token(), "hf_test");
        assert_eq!(client.base_url(), "https://custom.api.com");
    }

    #[test]
    fn test_task_url_keeps_model_namespace() {
        let client = InferenceClient::new("hf_test");

        assert_eq!(
            client.task_url("deepset/roberta-base-squad2"),
            "https://router.huggingface.co/hf-inference/models/deepset/roberta-base-squad2"
        );
    }

    #[test]
    fn test_with_timeout() {
        let client = InferenceClient::new("hf_test")
            .with_timeout(Duration::from_secs(5))
            .unwrap();

        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
