//! Claim ingestion and aggregation.
//!
//! Loads synthetic insurance claims from a flat on-disk store, flattens a
//! claim into a prompt context, and aggregates a patient's claims into a
//! financial/diagnosis report.
//!
//! # Store layout
//!
//! ```text
//! <base_dir>/<patient_id>/<claim_id>/
//!     claim_details.json     structured record (any *.json name)
//!     claim_text_data.txt    clinical note (any *.txt name)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use claims::{aggregate, flatten, ClaimStore};
//!
//! let store = ClaimStore::new("data/claims");
//!
//! let claim = store.load_claim("PA-12345", "CLM153910000")?;
//! let context = flatten(&claim);
//!
//! let history = store.load_patient("PA-12345")?;
//! let report = aggregate(&history);
//! println!("{} claims, copay {:.2}", report.count, report.total_copay);
//! ```
//!
//! # Modules
//!
//! - [`types`] - Patient, claim and report records
//! - [`store`] - Claim store layout and loader
//! - [`format`] - Prompt context rendering
//! - [`aggregate`] - Patient-level statistics
//! - [`testing`] - Fixture builders for tests

pub mod aggregate;
pub mod error;
pub mod format;
pub mod store;
pub mod testing;
pub mod types;

pub use aggregate::aggregate;
pub use error::{ClaimError, ClaimRef, Result};
pub use format::{flatten, flatten_text, CLINICAL_NOTE_LABEL};
pub use store::{ClaimStore, DETAILS_FILE_NAME, NOTE_FILE_NAME};
pub use types::{
    claim::{ClaimDetails, ClaimRecord, Financials},
    patient::PatientProfile,
    report::AggregateReport,
};
