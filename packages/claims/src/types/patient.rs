use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient profile embedded in every claim.
///
/// The store keeps a full copy in each claim file rather than a separate
/// patient record, so a single claim can be loaded on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub policy_number: String,
}

impl PatientProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
