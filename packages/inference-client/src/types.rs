//! Inference API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chat Completion
// =============================================================================

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Set by [`ChatRequest::json_schema`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Empty conversation for `model`, router defaults for sampling.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Constrain the reply to `schema` (strict mode).
    pub fn json_schema(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.response_format = Some(ResponseFormat::JsonSchema {
            json_schema: SchemaSpec {
                name: name.into(),
                strict: true,
                schema,
            },
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// `response_format` object; serialized as `{"type": "json_schema", "json_schema": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: SchemaSpec },
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaSpec {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// First choice of a chat completion.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseRaw {
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageResponse {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// =============================================================================
// Task models (hf-inference provider)
// =============================================================================

/// Extractive question answering request.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionAnsweringRequest<'a> {
    pub inputs: QuestionAnsweringInputs<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionAnsweringInputs<'a> {
    pub question: &'a str,
    pub context: &'a str,
}

/// Span extracted from the context by a question answering model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Answer text, a substring of the context
    pub answer: String,

    /// Model confidence in [0, 1]
    pub score: f64,

    /// Character offset of the answer start in the context
    pub start: usize,

    /// Character offset of the answer end in the context
    pub end: usize,
}

/// The QA task answers with a bare object or a one-element list,
/// depending on the provider.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum QuestionAnsweringResponse {
    One(QuestionAnswer),
    Many(Vec<QuestionAnswer>),
}

impl QuestionAnsweringResponse {
    pub fn into_best(self) -> Option<QuestionAnswer> {
        match self {
            Self::One(answer) => Some(answer),
            Self::Many(answers) => answers
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }
}

/// Summarization request.
#[derive(Debug, Serialize)]
pub(crate) struct SummarizationRequest<'a> {
    pub inputs: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummarizationOutput {
    pub summary_text: String,
}

/// The summarization task answers with a list; some providers unwrap it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SummarizationResponse {
    Many(Vec<SummarizationOutput>),
    One(SummarizationOutput),
}

impl SummarizationResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Many(outputs) => outputs.into_iter().next().map(|o| o.summary_text),
            Self::One(output) => Some(output.summary_text),
        }
    }
}

// =============================================================================
// Utilities
// =============================================================================

/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
