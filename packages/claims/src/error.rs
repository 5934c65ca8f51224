//! Typed errors for claim loading.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! missing claim apart from a broken one.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Identifies the patient (and claim, when known) an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRef {
    pub patient_id: String,
    pub claim_id: Option<String>,
}

impl ClaimRef {
    pub fn patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            claim_id: None,
        }
    }

    pub fn claim(patient_id: impl Into<String>, claim_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            claim_id: Some(claim_id.into()),
        }
    }
}

impl fmt::Display for ClaimRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.claim_id {
            Some(claim_id) => write!(f, "patient {} claim {}", self.patient_id, claim_id),
            None => write!(f, "patient {}", self.patient_id),
        }
    }
}

/// Errors that can occur while reading the claim store.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Patient directory, claim directory or store root is missing
    #[error("not found: {target} ({})", .path.display())]
    NotFound { target: ClaimRef, path: PathBuf },

    /// Wrong number of candidate files, undecodable names or text, or the
    /// structured file does not parse
    #[error("malformed claim: {target}: {reason}")]
    Malformed { target: ClaimRef, reason: String },

    /// Underlying filesystem failure
    #[error("I/O error: {target} ({}): {source}", .path.display())]
    Io {
        target: ClaimRef,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClaimError {
    /// The patient/claim the error refers to.
    pub fn target(&self) -> &ClaimRef {
        match self {
            ClaimError::NotFound { target, .. }
            | ClaimError::Malformed { target, .. }
            | ClaimError::Io { target, .. } => target,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClaimError::NotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ClaimError::Malformed { .. })
    }
}

/// Result type alias for claim store operations.
pub type Result<T> = std::result::Result<T, ClaimError>;
