//! Claim store records.

pub mod claim;
pub mod patient;
pub mod report;
