//! Patient-level statistics over a claim collection.

use crate::types::claim::ClaimRecord;
use crate::types::report::AggregateReport;

/// Sum copay, allowed amount and insurance paid, collect distinct providers
/// and count diagnoses.
///
/// An empty slice yields an all-zero report.
pub fn aggregate(records: &[ClaimRecord]) -> AggregateReport {
    records
        .iter()
        .fold(AggregateReport::default(), |mut report, record| {
            let details = &record.details;
            report.total_copay += details.financials.copay;
            report.total_allowed_amount += details.financials.allowed_amount;
            report.total_insurance_paid += details.financials.insurance_paid;
            report.providers.insert(details.provider_name.clone());
            *report
                .diagnosis_counts
                .entry(details.primary_diagnosis.clone())
                .or_insert(0) += 1;
            report.count += 1;
            report
        })
}
