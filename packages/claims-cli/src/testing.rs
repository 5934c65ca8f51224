// Mock inference backend for tests.
//
// Returns canned replies and records every call so tests can assert on the
// exact context and prompts the pipeline produced.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use inference_client::QuestionAnswer;

use crate::inference::{AbstractiveAnswer, BaseInference};

/// Record of a call made to the mock backend.
#[derive(Debug, Clone)]
pub enum MockInferenceCall {
    Extractive { question: String, context: String },
    Abstractive { system_prompt: String, user_query: String },
    Summarize { text: String },
}

#[derive(Clone, Default)]
pub struct MockInference {
    extractive: Option<String>,
    abstractive: Option<AbstractiveAnswer>,
    summary: Option<String>,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<MockInferenceCall>>>,
}

impl MockInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractive(mut self, answer: &str) -> Self {
        self.extractive = Some(answer.to_string());
        self
    }

    pub fn with_abstractive(mut self, answer: &str, reasoning: &str) -> Self {
        self.abstractive = Some(AbstractiveAnswer {
            answer: answer.to_string(),
            reasoning: reasoning.to_string(),
        });
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    /// Fail every call with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<MockInferenceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockInferenceCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BaseInference for MockInference {
    async fn answer_extractive(&self, question: &str, context: &str) -> Result<QuestionAnswer> {
        self.record(MockInferenceCall::Extractive {
            question: question.to_string(),
            context: context.to_string(),
        })?;

        let answer = self.extractive.clone().unwrap_or_default();
        let start = context.find(&answer).unwrap_or(0);
        Ok(QuestionAnswer {
            end: start + answer.len(),
            answer,
            score: 0.9,
            start,
        })
    }

    async fn answer_abstractive(
        &self,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<AbstractiveAnswer> {
        self.record(MockInferenceCall::Abstractive {
            system_prompt: system_prompt.to_string(),
            user_query: user_query.to_string(),
        })?;

        Ok(self.abstractive.clone().unwrap_or(AbstractiveAnswer {
            answer: "Mock answer".to_string(),
            reasoning: "Mock reasoning".to_string(),
        }))
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        self.record(MockInferenceCall::Summarize {
            text: text.to_string(),
        })?;

        Ok(self
            .summary
            .clone()
            .unwrap_or_else(|| "Mock summary".to_string()))
    }
}
