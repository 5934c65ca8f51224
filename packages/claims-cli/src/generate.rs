//! Synthetic claim generator.
//!
//! Writes the five-patient demo corpus into the claim store layout. Patients
//! follow fixed care plans (chronic conditions repeat, acute ones do not);
//! names, dates and amounts are random. Pass a seed for reproducible output.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{Days, Months, NaiveDate};
use claims::{ClaimDetails, ClaimRecord, ClaimStore, Financials, PatientProfile};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Hypertension,
    Type2Diabetes,
    Migraine,
    Asthma,
    AcuteSinusitis,
}

impl Diagnosis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Hypertension => "Hypertension",
            Diagnosis::Type2Diabetes => "Type 2 Diabetes",
            Diagnosis::Migraine => "Migraine",
            Diagnosis::Asthma => "Asthma",
            Diagnosis::AcuteSinusitis => "Acute Sinusitis",
        }
    }

    /// ICD-10 code.
    pub fn icd_code(&self) -> &'static str {
        match self {
            Diagnosis::Hypertension => "I10",
            Diagnosis::Type2Diabetes => "E11.9",
            Diagnosis::Migraine => "G43.909",
            Diagnosis::Asthma => "J45.909",
            Diagnosis::AcuteSinusitis => "J01.90",
        }
    }

    /// Procedure description and CPT code.
    pub fn procedure(&self) -> (&'static str, &'static str) {
        match self {
            Diagnosis::Hypertension => ("Echocardiogram", "93306"),
            Diagnosis::Type2Diabetes => ("Blood Glucose Test", "82947"),
            Diagnosis::Migraine => ("MRI Brain w/o Contrast", "70551"),
            Diagnosis::Asthma => ("Spirometry (Lung Function Test)", "94010"),
            Diagnosis::AcuteSinusitis => ("Office Visit (Established Patient)", "99214"),
        }
    }

    /// Specialist for the condition; `None` means any provider.
    pub fn provider(&self) -> Option<&'static str> {
        match self {
            Diagnosis::Hypertension => Some(PROVIDERS[2]),
            Diagnosis::Type2Diabetes => Some(PROVIDERS[0]),
            Diagnosis::Migraine => Some(PROVIDERS[1]),
            Diagnosis::Asthma => Some(PROVIDERS[4]),
            Diagnosis::AcuteSinusitis => None,
        }
    }
}

const PROVIDERS: &[&str] = &[
    "Dr. Eleanor Vance (Internal Medicine)",
    "Dr. Marcus Bell (Neurology)",
    "Dr. Ava Sharma (Cardiology)",
    "Central City Hospital",
    "Dr. David Chen (Pulmonology)",
];

const DRUGS: &[&str] = &[
    "Lisinopril (20mg)",
    "Metformin (500mg)",
    "Atorvastatin (10mg)",
    "Sumatriptan (100mg)",
    "Albuterol HFA",
    "Amoxicillin (500mg)",
    "Fluticasone Propionate",
];

const FIRST_NAMES: &[&str] = &[
    "Dana", "Marcus", "Priya", "Owen", "Lucia", "Tomas", "Hana", "Grace", "Samuel", "Irene",
];

const LAST_NAMES: &[&str] = &[
    "Whitfield", "Okafor", "Lindqvist", "Moreno", "Castillo", "Nakamura", "Brennan", "Adeyemi",
];

const OBSERVATIONS: &[&str] = &[
    "Vital signs were stable and the patient reported adherence to the current regimen.",
    "Symptoms have been more frequent over the past two weeks, mostly in the evenings.",
    "The patient denied fever or chest pain and reported adequate sleep.",
    "Recent home measurements were brought to the visit and reviewed with the patient.",
];

const COPAYS: &[f64] = &[25.0, 50.0, 75.0];

/// Patient ids and their visits as (diagnosis, months before today).
const CARE_PLANS: &[(&str, &[(Diagnosis, u32)])] = &[
    (
        "PA-12345",
        &[
            (Diagnosis::Hypertension, 5),
            (Diagnosis::Hypertension, 4),
            (Diagnosis::Hypertension, 3),
            (Diagnosis::Hypertension, 2),
            (Diagnosis::Hypertension, 1),
        ],
    ),
    (
        "PB-24680",
        &[
            (Diagnosis::Migraine, 3),
            (Diagnosis::AcuteSinusitis, 2),
            (Diagnosis::Type2Diabetes, 1),
        ],
    ),
    (
        "PC-13579",
        &[
            (Diagnosis::Asthma, 3),
            (Diagnosis::Asthma, 2),
            (Diagnosis::Asthma, 1),
        ],
    ),
    (
        "PD-09876",
        &[(Diagnosis::AcuteSinusitis, 4), (Diagnosis::Migraine, 1)],
    ),
    (
        "PE-54321",
        &[(Diagnosis::Type2Diabetes, 2), (Diagnosis::Type2Diabetes, 1)],
    ),
];

/// Generate the demo corpus relative to `today`.
pub fn generate_corpus(seed: Option<u64>, today: NaiveDate) -> Vec<ClaimRecord> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut records = Vec::new();
    for (patient_id, visits) in CARE_PLANS {
        let patient = patient_profile(&mut rng, patient_id, today);
        let mut claim_ids = HashSet::new();
        for (diagnosis, months_ago) in visits.iter() {
            let claim_id = unique_claim_id(&mut rng, &mut claim_ids);
            let visit_date = today
                .checked_sub_months(Months::new(*months_ago))
                .unwrap_or(today);
            records.push(claim(&mut rng, &patient, *diagnosis, claim_id, visit_date));
        }
    }
    records
}

/// Generate the corpus and write it into `store`.
pub fn write_corpus(store: &ClaimStore, seed: Option<u64>, today: NaiveDate) -> Result<Vec<ClaimRecord>> {
    let records = generate_corpus(seed, today);
    for record in &records {
        store.write_claim(record)?;
    }
    info!(
        claims = records.len(),
        base_dir = %store.base_dir().display(),
        "Wrote synthetic claims"
    );
    Ok(records)
}

fn patient_profile(rng: &mut StdRng, patient_id: &str, today: NaiveDate) -> PatientProfile {
    let age_days = rng.gen_range(20 * 365..=70 * 365);
    PatientProfile {
        patient_id: patient_id.to_string(),
        first_name: pick(rng, FIRST_NAMES).to_string(),
        last_name: pick(rng, LAST_NAMES).to_string(),
        date_of_birth: today.checked_sub_days(Days::new(age_days)).unwrap_or(today),
        policy_number: format!(
            "P{:05}-{:02}",
            rng.gen_range(0..100_000),
            rng.gen_range(0..100)
        ),
    }
}

fn unique_claim_id(rng: &mut StdRng, seen: &mut HashSet<String>) -> String {
    loop {
        let claim_id = format!("CLM{:09}", rng.gen_range(0..1_000_000_000u32));
        if seen.insert(claim_id.clone()) {
            return claim_id;
        }
    }
}

fn claim(
    rng: &mut StdRng,
    patient: &PatientProfile,
    diagnosis: Diagnosis,
    claim_id: String,
    visit_date: NaiveDate,
) -> ClaimRecord {
    let (procedure, cpt_code) = diagnosis.procedure();
    let provider = diagnosis.provider().unwrap_or_else(|| *pick(rng, PROVIDERS));

    let billed_amount = round_cents(rng.gen_range(500.0..=3500.0_f64));
    let allowed_amount = round_cents(billed_amount * rng.gen_range(0.65..=0.85_f64));
    let copay = *pick(rng, COPAYS);
    let insurance_paid = round_cents(allowed_amount - copay);

    let summary = format!(
        "Claim for {diagnosis} ({icd}). Patient presented with symptoms requiring \
         {procedure} ({cpt_code}). Recommended medication: {drug}.",
        diagnosis = diagnosis.as_str(),
        icd = diagnosis.icd_code(),
        drug = pick(rng, DRUGS),
    );

    let note = format!(
        "CLINICAL NOTE: Patient {name} (Policy: {policy}) was seen today, {visit_date}, by {provider}. \
         The main subjective complaint was a recurrent flare-up of their **{diagnosis}** symptoms, \
         which are generally well-managed. {observation} Assessment determined the necessity of a \
         diagnostic procedure to confirm the severity: **{procedure}** (CPT: {cpt_code}). The \
         diagnosis code assigned is **{icd}**. The patient was advised on the necessity of \
         lifestyle modifications and will be starting the new medication, {drug}, immediately. \
         Total billed charges for this visit are ${billed_amount:.2}. All staff were informed \
         regarding the high priority of the patient's next appointment.",
        name = patient.full_name(),
        policy = patient.policy_number,
        diagnosis = diagnosis.as_str(),
        observation = pick(rng, OBSERVATIONS),
        icd = diagnosis.icd_code(),
        drug = pick(rng, DRUGS),
    );

    let details = ClaimDetails {
        claim_id,
        claim_date: visit_date,
        patient_info: patient.clone(),
        provider_name: provider.to_string(),
        primary_diagnosis: diagnosis.as_str().to_string(),
        icd_code: diagnosis.icd_code().to_string(),
        procedure_description: procedure.to_string(),
        cpt_code: cpt_code.to_string(),
        financials: Financials {
            billed_amount,
            allowed_amount,
            copay,
            insurance_paid,
        },
        extracted_summary: Some(summary),
    };
    ClaimRecord::new(details, note)
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    // Every table above is non-empty.
    items.choose(rng).unwrap_or(&items[0])
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::aggregate;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_corpus_follows_care_plans() {
        let records = generate_corpus(Some(7), today());

        assert_eq!(records.len(), 15);
        let pa: Vec<_> = records
            .iter()
            .filter(|r| r.patient().patient_id == "PA-12345")
            .collect();
        assert_eq!(pa.len(), 5);
        assert!(pa.iter().all(|r| r.details.primary_diagnosis == "Hypertension"));
        assert!(pa
            .iter()
            .all(|r| r.details.provider_name == "Dr. Ava Sharma (Cardiology)"));
        assert_eq!(pa[0].details.claim_date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    }

    #[test]
    fn test_claims_carry_plan_summary() {
        for record in generate_corpus(Some(3), today()) {
            let details = &record.details;
            let summary = details.extracted_summary.as_deref().unwrap();
            assert!(summary.starts_with(&format!(
                "Claim for {} ({}).",
                details.primary_diagnosis, details.icd_code
            )));
            assert!(summary.contains(&details.cpt_code));
            assert!(summary.contains("Recommended medication: "));
        }
    }

    #[test]
    fn test_financial_invariants() {
        for record in generate_corpus(Some(11), today()) {
            let money = record.details.financials;
            assert!((500.0..=3500.0).contains(&money.billed_amount));
            assert!(money.allowed_amount <= money.billed_amount);
            assert!(COPAYS.contains(&money.copay));
            assert!((money.insurance_paid - (money.allowed_amount - money.copay)).abs() < 0.005);
        }
    }

    #[test]
    fn test_denormalized_profile_is_identical_across_claims() {
        let records = generate_corpus(Some(3), today());
        let profiles: HashSet<_> = records
            .iter()
            .filter(|r| r.patient().patient_id == "PC-13579")
            .map(|r| r.patient().policy_number.clone())
            .collect();

        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn test_seed_is_reproducible() {
        assert_eq!(generate_corpus(Some(42), today()), generate_corpus(Some(42), today()));
    }

    #[test]
    fn test_ids_have_expected_shape() {
        for record in generate_corpus(Some(5), today()) {
            let claim_id = record.claim_id();
            assert_eq!(claim_id.len(), 12);
            assert!(claim_id.starts_with("CLM"));
            assert!(claim_id[3..].chars().all(|c| c.is_ascii_digit()));

            let policy = &record.patient().policy_number;
            assert_eq!(policy.len(), 9);
            assert_eq!(&policy[6..7], "-");
        }
    }

    #[test]
    fn test_written_corpus_loads_back() {
        let dir = TempDir::new().unwrap();
        let store = ClaimStore::new(dir.path());

        let written = write_corpus(&store, Some(9), today()).unwrap();

        assert_eq!(
            store.list_patients().unwrap(),
            vec!["PA-12345", "PB-24680", "PC-13579", "PD-09876", "PE-54321"]
        );
        let pb = store.load_patient("PB-24680").unwrap();
        let report = aggregate(&pb);
        assert_eq!(report.count, 3);
        assert_eq!(report.diagnosis_counts.len(), 3);

        let first = &written[0];
        let loaded = store
            .load_claim(&first.patient().patient_id, first.claim_id())
            .unwrap();
        assert_eq!(&loaded, first);
    }
}
