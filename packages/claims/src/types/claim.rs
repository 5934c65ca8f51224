use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::patient::PatientProfile;

/// Money fields of a claim.
///
/// Generated data satisfies `insurance_paid == allowed_amount - copay` and
/// `allowed_amount <= billed_amount`; neither is re-checked on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    pub billed_amount: f64,
    pub allowed_amount: f64,
    pub copay: f64,
    pub insurance_paid: f64,
}

/// Structured part of a claim, as stored in the claim's JSON file.
///
/// Unknown keys in the file are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDetails {
    pub claim_id: String,
    pub claim_date: NaiveDate,
    pub patient_info: PatientProfile,
    pub provider_name: String,
    pub primary_diagnosis: String,
    pub icd_code: String,
    pub procedure_description: String,
    pub cpt_code: String,
    pub financials: Financials,
    /// One-line plan written by the generator. Not part of the prompt context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_summary: Option<String>,
}

/// A fully loaded claim: structured details plus the clinical note.
///
/// Only the loader (or a test fixture) builds these; there is no way to hold
/// a claim without its note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimRecord {
    #[serde(flatten)]
    pub details: ClaimDetails,
    pub clinical_note: String,
}

impl ClaimRecord {
    pub fn new(details: ClaimDetails, clinical_note: impl Into<String>) -> Self {
        Self {
            details,
            clinical_note: clinical_note.into(),
        }
    }

    pub fn claim_id(&self) -> &str {
        &self.details.claim_id
    }

    pub fn patient(&self) -> &PatientProfile {
        &self.details.patient_info
    }
}
