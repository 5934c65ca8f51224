//! Fixture builders for tests.
//!
//! Useful for testing code that consumes claims without a generated store.
//! Combine with [`ClaimStore::write_claim`](crate::ClaimStore::write_claim) to
//! lay fixtures out on disk.

use chrono::NaiveDate;

use crate::types::claim::{ClaimDetails, ClaimRecord, Financials};
use crate::types::patient::PatientProfile;

/// Patient id used by the sample builders.
pub const SAMPLE_PATIENT_ID: &str = "PA-12345";

/// A fixed patient profile.
pub fn sample_patient(patient_id: &str) -> PatientProfile {
    PatientProfile {
        patient_id: patient_id.to_string(),
        first_name: "Dana".to_string(),
        last_name: "Whitfield".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1971, 3, 2).expect("valid fixture date"),
        policy_number: "P48213-07".to_string(),
    }
}

/// Structured details for a claim of [`SAMPLE_PATIENT_ID`].
///
/// Financials are `1000.00 / 800.00 / 50.00 / 750.00`.
pub fn sample_details(claim_id: &str, diagnosis: &str) -> ClaimDetails {
    ClaimDetails {
        claim_id: claim_id.to_string(),
        claim_date: NaiveDate::from_ymd_opt(2025, 5, 14).expect("valid fixture date"),
        patient_info: sample_patient(SAMPLE_PATIENT_ID),
        provider_name: "Dr. Ava Sharma (Cardiology)".to_string(),
        primary_diagnosis: diagnosis.to_string(),
        icd_code: "I10".to_string(),
        procedure_description: "Echocardiogram".to_string(),
        cpt_code: "93306".to_string(),
        financials: Financials {
            billed_amount: 1000.00,
            allowed_amount: 800.00,
            copay: 50.00,
            insurance_paid: 750.00,
        },
        extracted_summary: None,
    }
}

/// A loaded claim with a short clinical note.
pub fn sample_claim(claim_id: &str, diagnosis: &str) -> ClaimRecord {
    let note = format!(
        "CLINICAL NOTE: Patient Dana Whitfield was seen for recurrent {diagnosis} symptoms."
    );
    ClaimRecord::new(sample_details(claim_id, diagnosis), note)
}

pub fn with_financials(mut record: ClaimRecord, financials: Financials) -> ClaimRecord {
    record.details.financials = financials;
    record
}

pub fn with_provider(mut record: ClaimRecord, provider: &str) -> ClaimRecord {
    record.details.provider_name = provider.to_string();
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_dates() {
        let details = sample_details("CLM000000001", "Asthma");

        assert_eq!(details.claim_date.to_string(), "2025-05-14");
        assert_eq!(details.patient_info.date_of_birth.to_string(), "1971-03-02");
    }
}
