//! Operation dispatcher.
//!
//! Routes a named operation to the claim store, the context formatter or the
//! aggregator, and the inference backend:
//!
//! - `qa` - extractive answer from the flattened claim
//! - `advanced_qa` - answer + reasoning from the chat model
//! - `summary` - summary of the flattened claim
//! - `analysis` - aggregate report over every claim of the patient
//!
//! Store and inference failures are returned to the caller as is; nothing is
//! retried.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use claims::{aggregate, flatten, AggregateReport, ClaimRecord, ClaimStore, PatientProfile};
use inference_client::QuestionAnswer;
use serde::Serialize;
use tracing::info;

use crate::inference::{AbstractiveAnswer, BaseInference};

/// Reply for QA operations invoked without a question.
pub const NO_QUESTION: &str = "No question received.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Qa,
    AdvancedQa,
    Summary,
    Analysis,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Qa => "qa",
            Operation::AdvancedQa => "advanced_qa",
            Operation::Summary => "summary",
            Operation::Analysis => "analysis",
        }
    }

    pub fn needs_question(&self) -> bool {
        matches!(self, Operation::Qa | Operation::AdvancedQa)
    }

    pub fn needs_inference(&self) -> bool {
        !matches!(self, Operation::Analysis)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().replace('-', "_").as_str() {
            "qa" => Ok(Operation::Qa),
            "advanced_qa" => Ok(Operation::AdvancedQa),
            "summary" => Ok(Operation::Summary),
            "analysis" => Ok(Operation::Analysis),
            _ => Err(anyhow!(
                "Option {s} not available (expected one of: qa, advanced_qa, summary, analysis)"
            )),
        }
    }
}

/// One dispatch request.
#[derive(Debug, Clone)]
pub struct Request {
    pub operation: Operation,
    pub patient_id: String,
    pub claim_id: Option<String>,
    pub question: String,
}

impl Request {
    pub fn new(operation: Operation, patient_id: impl Into<String>) -> Self {
        Self {
            operation,
            patient_id: patient_id.into(),
            claim_id: None,
            question: String::new(),
        }
    }

    pub fn claim(mut self, claim_id: impl Into<String>) -> Self {
        self.claim_id = Some(claim_id.into());
        self
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }
}

/// Result of a dispatched operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Extractive(QuestionAnswer),
    Abstractive(AbstractiveAnswer),
    Summary { summary: String },
    Analysis {
        patient_id: String,
        patient: Option<PatientProfile>,
        report: AggregateReport,
    },
    NoQuestion { message: String },
}

/// Build the user turn for abstractive question answering.
pub fn abstractive_query(context: &str, question: &str) -> String {
    format!(
        "Based on the following clinical note, please answer my question.\n\n\
         --- CLAIM DETAILS ---\n\
         {context}\n\n\
         --- QUESTION ---\n\
         {question}"
    )
}

pub struct Pipeline {
    store: ClaimStore,
    system_prompt: String,
    inference: Option<Box<dyn BaseInference>>,
}

impl Pipeline {
    pub fn new(store: ClaimStore, system_prompt: impl Into<String>) -> Self {
        Self {
            store,
            system_prompt: system_prompt.into(),
            inference: None,
        }
    }

    pub fn with_inference(mut self, inference: impl BaseInference + 'static) -> Self {
        self.inference = Some(Box::new(inference));
        self
    }

    pub async fn run(&self, request: &Request) -> Result<Outcome> {
        let operation = request.operation;
        info!(%operation, patient_id = %request.patient_id, "Dispatching");

        if operation.needs_question() && request.question.trim().is_empty() {
            return Ok(Outcome::NoQuestion {
                message: NO_QUESTION.to_string(),
            });
        }

        match operation {
            Operation::Qa => {
                let context = flatten(&self.load_claim(request)?);
                let answer = self
                    .inference()?
                    .answer_extractive(request.question.trim(), &context)
                    .await?;
                Ok(Outcome::Extractive(answer))
            }
            Operation::AdvancedQa => {
                let context = flatten(&self.load_claim(request)?);
                let query = abstractive_query(&context, request.question.trim());
                let answer = self
                    .inference()?
                    .answer_abstractive(&self.system_prompt, &query)
                    .await?;
                Ok(Outcome::Abstractive(answer))
            }
            Operation::Summary => {
                let context = flatten(&self.load_claim(request)?);
                let summary = self.inference()?.summarize(&context).await?;
                Ok(Outcome::Summary { summary })
            }
            Operation::Analysis => {
                let records = self.store.load_patient(&request.patient_id)?;
                Ok(analysis(&request.patient_id, &records))
            }
        }
    }

    fn load_claim(&self, request: &Request) -> Result<ClaimRecord> {
        let claim_id = request
            .claim_id
            .as_deref()
            .with_context(|| format!("{} needs a claim id (--claim)", request.operation))?;
        Ok(self.store.load_claim(&request.patient_id, claim_id)?)
    }

    fn inference(&self) -> Result<&dyn BaseInference> {
        self.inference
            .as_deref()
            .context("inference backend not configured (set HF_TOKEN)")
    }
}

fn analysis(patient_id: &str, records: &[ClaimRecord]) -> Outcome {
    Outcome::Analysis {
        patient_id: patient_id.to_string(),
        patient: records.first().map(|r| r.patient().clone()),
        report: aggregate(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockInference, MockInferenceCall};
    use claims::testing::{sample_claim, SAMPLE_PATIENT_ID};
    use claims::{ClaimError, CLINICAL_NOTE_LABEL};
    use tempfile::TempDir;

    /// Helper to set up a store with claims of the sample patient.
    fn setup_store(claims: &[(&str, &str)]) -> (TempDir, ClaimStore) {
        let dir = TempDir::new().unwrap();
        let store = ClaimStore::new(dir.path());
        for (claim_id, diagnosis) in claims {
            store.write_claim(&sample_claim(claim_id, diagnosis)).unwrap();
        }
        (dir, store)
    }

    fn pipeline(store: ClaimStore, mock: &MockInference) -> Pipeline {
        Pipeline::new(store, "You are a helpful medical assistant.").with_inference(mock.clone())
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("qa".parse::<Operation>().unwrap(), Operation::Qa);
        assert_eq!("advanced_qa".parse::<Operation>().unwrap(), Operation::AdvancedQa);
        assert_eq!("advanced-qa".parse::<Operation>().unwrap(), Operation::AdvancedQa);
        assert_eq!("summary".parse::<Operation>().unwrap(), Operation::Summary);
        assert_eq!("analysis".parse::<Operation>().unwrap(), Operation::Analysis);

        let err = "translate".parse::<Operation>().unwrap_err();
        assert!(err.to_string().contains("Option translate not available"));
    }

    #[tokio::test]
    async fn test_qa_sends_flattened_claim() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Asthma")]);
        let mock = MockInference::new().with_extractive("Dr. Ava Sharma");
        let pipeline = pipeline(store, &mock);

        let request = Request::new(Operation::Qa, SAMPLE_PATIENT_ID)
            .claim("CLM000000001")
            .question("Who is the doctor?");
        let outcome = pipeline.run(&request).await.unwrap();

        match outcome {
            Outcome::Extractive(answer) => assert_eq!(answer.answer, "Dr. Ava Sharma"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            MockInferenceCall::Extractive { question, context } => {
                assert_eq!(question, "Who is the doctor?");
                assert!(context.starts_with("claim_id: CLM000000001\n"));
                assert!(context.contains(CLINICAL_NOTE_LABEL));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_question_skips_inference() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Asthma")]);
        let mock = MockInference::new();
        let pipeline = pipeline(store, &mock);

        for operation in [Operation::Qa, Operation::AdvancedQa] {
            let request = Request::new(operation, SAMPLE_PATIENT_ID)
                .claim("CLM000000001")
                .question("  ");
            let outcome = pipeline.run(&request).await.unwrap();

            assert_eq!(
                outcome,
                Outcome::NoQuestion {
                    message: NO_QUESTION.to_string()
                }
            );
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_advanced_qa_uses_system_prompt_and_query() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Migraine")]);
        let mock = MockInference::new().with_abstractive("Dr. Smith", "Found in text");
        let pipeline = pipeline(store, &mock);

        let request = Request::new(Operation::AdvancedQa, SAMPLE_PATIENT_ID)
            .claim("CLM000000001")
            .question("Who treated the patient?");
        let outcome = pipeline.run(&request).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Abstractive(AbstractiveAnswer {
                answer: "Dr. Smith".into(),
                reasoning: "Found in text".into(),
            })
        );
        match &mock.calls()[0] {
            MockInferenceCall::Abstractive {
                system_prompt,
                user_query,
            } => {
                assert_eq!(system_prompt, "You are a helpful medical assistant.");
                assert!(user_query.starts_with(
                    "Based on the following clinical note, please answer my question."
                ));
                assert!(user_query.contains("--- CLAIM DETAILS ---\nclaim_id: CLM000000001"));
                assert!(user_query.ends_with("--- QUESTION ---\nWho treated the patient?"));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summary() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Hypertension")]);
        let mock = MockInference::new().with_summary("Follow-up for hypertension.");
        let pipeline = pipeline(store, &mock);

        let request = Request::new(Operation::Summary, SAMPLE_PATIENT_ID).claim("CLM000000001");
        let outcome = pipeline.run(&request).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Summary {
                summary: "Follow-up for hypertension.".into()
            }
        );
        match &mock.calls()[0] {
            MockInferenceCall::Summarize { text } => {
                assert!(text.starts_with("claim_id: CLM000000001\n"));
                assert!(text.contains("recurrent Hypertension symptoms"));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_analysis_aggregates_without_inference() {
        let (_dir, store) = setup_store(&[
            ("CLM000000001", "Asthma"),
            ("CLM000000002", "Asthma"),
            ("CLM000000003", "Migraine"),
        ]);
        let pipeline = Pipeline::new(store, "unused");

        let outcome = pipeline
            .run(&Request::new(Operation::Analysis, SAMPLE_PATIENT_ID))
            .await
            .unwrap();

        match outcome {
            Outcome::Analysis {
                patient, report, ..
            } => {
                assert_eq!(patient.unwrap().patient_id, SAMPLE_PATIENT_ID);
                assert_eq!(report.count, 3);
                assert_eq!(report.diagnosis_counts["Asthma"], 2);
                assert_eq!(report.diagnosis_counts["Migraine"], 1);
                assert_eq!(report.total_insurance_paid, 2250.0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_claim_surfaces_store_error() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Asthma")]);
        let mock = MockInference::new();
        let pipeline = pipeline(store, &mock);

        let request = Request::new(Operation::Summary, SAMPLE_PATIENT_ID).claim("CLM999999999");
        let err = pipeline.run(&request).await.unwrap_err();

        let claim_err = err.downcast_ref::<ClaimError>().unwrap();
        assert!(claim_err.is_not_found());
        assert!(err.to_string().contains("CLM999999999"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_claim_operations_need_claim_id() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Asthma")]);
        let mock = MockInference::new();
        let pipeline = pipeline(store, &mock);

        for operation in [Operation::Qa, Operation::AdvancedQa, Operation::Summary] {
            let request = Request::new(operation, SAMPLE_PATIENT_ID).question("Who treated it?");

            let err = pipeline.run(&request).await.unwrap_err();

            assert!(err.to_string().contains("--claim"), "{operation}: {err}");
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_inference_failure_is_returned() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Asthma")]);
        let mock = MockInference::new().failing("Connection failed");
        let pipeline = pipeline(store, &mock);

        let request = Request::new(Operation::Qa, SAMPLE_PATIENT_ID)
            .claim("CLM000000001")
            .question("What happened?");
        let err = pipeline.run(&request).await.unwrap_err();

        assert!(err.to_string().contains("Connection failed"));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_backend_is_an_error() {
        let (_dir, store) = setup_store(&[("CLM000000001", "Asthma")]);
        let pipeline = Pipeline::new(store, "prompt");

        let request = Request::new(Operation::Summary, SAMPLE_PATIENT_ID).claim("CLM000000001");
        let err = pipeline.run(&request).await.unwrap_err();

        assert!(err.to_string().contains("HF_TOKEN"));
    }
}
