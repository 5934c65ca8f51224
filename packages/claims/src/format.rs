//! Prompt context rendering.
//!
//! A claim is rendered as `key: value` lines in field declaration order, with
//! the embedded patient profile and financials indented under their field
//! name. The clinical note comes last, verbatim, under [`CLINICAL_NOTE_LABEL`].
//!
//! ```text
//! claim_id: CLM153910000
//! claim_date: 2025-05-14
//! patient_info:
//!   patient_id: PA-12345
//!   ...
//! financials:
//!   billed_amount: 1000.00
//!   ...
//! Clinical Note:
//! CLINICAL NOTE: Patient ...
//! ```

use std::fmt::Display;

use crate::types::claim::ClaimRecord;

/// Label that introduces the clinical note section.
pub const CLINICAL_NOTE_LABEL: &str = "Clinical Note:";

/// Render a claim as a single prompt context.
pub fn flatten(record: &ClaimRecord) -> String {
    let details = &record.details;
    let patient = &details.patient_info;
    let money = &details.financials;

    let mut out = String::with_capacity(512 + record.clinical_note.len());

    field(&mut out, 0, "claim_id", &details.claim_id);
    field(&mut out, 0, "claim_date", details.claim_date);
    section(&mut out, "patient_info");
    field(&mut out, 1, "patient_id", &patient.patient_id);
    field(&mut out, 1, "first_name", &patient.first_name);
    field(&mut out, 1, "last_name", &patient.last_name);
    field(&mut out, 1, "date_of_birth", patient.date_of_birth);
    field(&mut out, 1, "policy_number", &patient.policy_number);
    field(&mut out, 0, "provider_name", &details.provider_name);
    field(&mut out, 0, "primary_diagnosis", &details.primary_diagnosis);
    field(&mut out, 0, "icd_code", &details.icd_code);
    field(&mut out, 0, "procedure_description", &details.procedure_description);
    field(&mut out, 0, "cpt_code", &details.cpt_code);
    section(&mut out, "financials");
    field(&mut out, 1, "billed_amount", format_args!("{:.2}", money.billed_amount));
    field(&mut out, 1, "allowed_amount", format_args!("{:.2}", money.allowed_amount));
    field(&mut out, 1, "copay", format_args!("{:.2}", money.copay));
    field(&mut out, 1, "insurance_paid", format_args!("{:.2}", money.insurance_paid));

    out.push_str(CLINICAL_NOTE_LABEL);
    out.push('\n');
    out.push_str(&record.clinical_note);
    out
}

/// Context for callers that already hold plain text. Passed through as is.
pub fn flatten_text(text: &str) -> String {
    text.to_string()
}

fn section(out: &mut String, name: &str) {
    out.push_str(name);
    out.push_str(":\n");
}

fn field(out: &mut String, depth: usize, key: &str, value: impl Display) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{key}: {value}\n"));
}
