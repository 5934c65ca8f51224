//! Human-readable rendering of pipeline outcomes.

use claims::AggregateReport;

use crate::pipeline::Outcome;

/// Render an outcome as plain text.
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Extractive(answer) => format!(
            "Answer: {}\nScore: {:.3} (context {}..{})",
            answer.answer, answer.score, answer.start, answer.end
        ),
        Outcome::Abstractive(answer) => {
            format!("Answer: {}\nReasoning: {}", answer.answer, answer.reasoning)
        }
        Outcome::Summary { summary } => summary.clone(),
        Outcome::Analysis {
            patient_id,
            patient,
            report,
        } => {
            let header = match patient {
                Some(profile) => format!(
                    "Holistic report for patient {} with patient id {}",
                    profile.full_name(),
                    profile.patient_id
                ),
                None => format!("Holistic report for patient id {patient_id} (no claims)"),
            };
            format!("{header}\n{}", render_report(report))
        }
        Outcome::NoQuestion { message } => message.clone(),
    }
}

/// Render the aggregate report body, one statistic per line.
pub fn render_report(report: &AggregateReport) -> String {
    let providers = if report.providers.is_empty() {
        "-".to_string()
    } else {
        report
            .providers
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let diagnoses = if report.diagnosis_counts.is_empty() {
        "-".to_string()
    } else {
        report
            .diagnosis_counts
            .iter()
            .map(|(diagnosis, count)| format!("{diagnosis}: {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Total copay: {:.2}\n\
         Total allowed amount: {:.2}\n\
         Total insurance paid: {:.2}\n\
         Providers: {providers}\n\
         Diagnosis counts: {diagnoses}\n\
         Claims: {}",
        report.total_copay, report.total_allowed_amount, report.total_insurance_paid, report.count
    )
}
