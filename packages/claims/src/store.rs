//! On-disk claim store.
//!
//! Each claim lives in `<base_dir>/<patient_id>/<claim_id>/` and holds exactly
//! one structured file (`*.json`) and one clinical note (`*.txt`). Files are
//! picked by extension, so generators may name them freely.
//!
//! Loading is all-or-nothing: a claim is returned with its note attached or
//! not at all. Nothing is cached; every call re-reads the disk.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ClaimError, ClaimRef, Result};
use crate::types::claim::{ClaimDetails, ClaimRecord};

/// File name used when writing the structured part of a claim.
pub const DETAILS_FILE_NAME: &str = "claim_details.json";

/// File name used when writing the clinical note of a claim.
pub const NOTE_FILE_NAME: &str = "claim_text_data.txt";

const DETAILS_EXTENSION: &str = "json";
const NOTE_EXTENSION: &str = "txt";

/// Claim store rooted at a base directory.
#[derive(Debug, Clone)]
pub struct ClaimStore {
    base_dir: PathBuf,
}

impl ClaimStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load one claim with its clinical note attached.
    pub fn load_claim(&self, patient_id: &str, claim_id: &str) -> Result<ClaimRecord> {
        let patient_dir = self.existing_patient_dir(patient_id)?;
        let target = ClaimRef::claim(patient_id, claim_id);
        let claim_dir = join_component(&patient_dir, claim_id, &target)?;
        ensure_dir(&claim_dir, &target)?;

        read_claim_dir(&claim_dir, &target)
    }

    /// Load every claim of a patient, in directory-listing order.
    ///
    /// The first claim that fails to load fails the whole call; no partial
    /// list is returned.
    pub fn load_patient(&self, patient_id: &str) -> Result<Vec<ClaimRecord>> {
        let claim_ids = self.list_claims(patient_id)?;
        let patient_dir = self.base_dir.join(patient_id);

        let mut records = Vec::with_capacity(claim_ids.len());
        for claim_id in claim_ids {
            let target = ClaimRef::claim(patient_id, claim_id.as_str());
            records.push(read_claim_dir(&patient_dir.join(&claim_id), &target)?);
        }

        debug!(patient_id, claims = records.len(), "Loaded patient claims");
        Ok(records)
    }

    /// Claim identifiers of a patient, in directory-listing order.
    pub fn list_claims(&self, patient_id: &str) -> Result<Vec<String>> {
        let patient_dir = self.existing_patient_dir(patient_id)?;
        list_subdirs(&patient_dir, &ClaimRef::patient(patient_id))
    }

    /// Patient identifiers in the store, sorted.
    pub fn list_patients(&self) -> Result<Vec<String>> {
        let target = ClaimRef::patient("*");
        ensure_dir(&self.base_dir, &target)?;

        let mut patients = list_subdirs(&self.base_dir, &target)?;
        patients.sort();
        Ok(patients)
    }

    /// Write a claim in the store layout, creating directories as needed.
    ///
    /// Used by the synthetic data generator and test fixtures; the loading
    /// operations never write.
    pub fn write_claim(&self, record: &ClaimRecord) -> Result<PathBuf> {
        let patient_id = record.patient().patient_id.as_str();
        let target = ClaimRef::claim(patient_id, record.claim_id());
        let patient_dir = join_component(&self.base_dir, patient_id, &target)?;
        let claim_dir = join_component(&patient_dir, record.claim_id(), &target)?;

        fs::create_dir_all(&claim_dir).map_err(|e| io_error(&target, &claim_dir, e))?;

        let details = serde_json::to_string_pretty(&record.details).map_err(|e| {
            ClaimError::Malformed {
                target: target.clone(),
                reason: format!("failed to serialize details: {e}"),
            }
        })?;

        let details_path = claim_dir.join(DETAILS_FILE_NAME);
        fs::write(&details_path, details).map_err(|e| io_error(&target, &details_path, e))?;

        let note_path = claim_dir.join(NOTE_FILE_NAME);
        fs::write(&note_path, &record.clinical_note)
            .map_err(|e| io_error(&target, &note_path, e))?;

        Ok(claim_dir)
    }

    fn existing_patient_dir(&self, patient_id: &str) -> Result<PathBuf> {
        let target = ClaimRef::patient(patient_id);
        let patient_dir = join_component(&self.base_dir, patient_id, &target)?;
        ensure_dir(&patient_dir, &target)?;
        Ok(patient_dir)
    }
}

fn read_claim_dir(claim_dir: &Path, target: &ClaimRef) -> Result<ClaimRecord> {
    let mut details_files = Vec::new();
    let mut note_files = Vec::new();

    let entries = fs::read_dir(claim_dir).map_err(|e| io_error(target, claim_dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| io_error(target, claim_dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        if has_extension(&path, DETAILS_EXTENSION) {
            details_files.push(path);
        } else if has_extension(&path, NOTE_EXTENSION) {
            note_files.push(path);
        }
    }

    let details_path = single_file(details_files, DETAILS_EXTENSION, target)?;
    let note_path = single_file(note_files, NOTE_EXTENSION, target)?;

    let raw = fs::read(&details_path).map_err(|e| io_error(target, &details_path, e))?;
    let details: ClaimDetails = serde_json::from_slice(&raw).map_err(|e| ClaimError::Malformed {
        target: target.clone(),
        reason: format!("{}: {e}", details_path.display()),
    })?;

    let raw = fs::read(&note_path).map_err(|e| io_error(target, &note_path, e))?;
    let clinical_note = String::from_utf8(raw).map_err(|e| ClaimError::Malformed {
        target: target.clone(),
        reason: format!("{}: {e}", note_path.display()),
    })?;

    if let Some(claim_id) = &target.claim_id {
        if &details.claim_id != claim_id {
            warn!(
                directory = %claim_id,
                recorded = %details.claim_id,
                "Claim directory name differs from recorded claim_id"
            );
        }
    }

    debug!(%target, "Loaded claim");
    Ok(ClaimRecord::new(details, clinical_note))
}

fn single_file(mut candidates: Vec<PathBuf>, extension: &str, target: &ClaimRef) -> Result<PathBuf> {
    if candidates.len() != 1 {
        return Err(ClaimError::Malformed {
            target: target.clone(),
            reason: format!(
                "expected exactly one .{extension} file, found {}",
                candidates.len()
            ),
        });
    }
    Ok(candidates.remove(0))
}

fn list_subdirs(dir: &Path, target: &ClaimRef) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| io_error(target, dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_error(target, dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| ClaimError::Malformed {
                target: target.clone(),
                reason: format!("directory name is not UTF-8: {}", name.to_string_lossy()),
            })?;
        names.push(name);
    }
    Ok(names)
}

/// Join a single identifier onto `parent`.
///
/// Identifiers that are empty or carry path structure cannot name a store
/// directory and are reported as not found.
fn join_component(parent: &Path, id: &str, target: &ClaimRef) -> Result<PathBuf> {
    let path = parent.join(id);
    let single = Path::new(id).components().count() == 1
        && Path::new(id).file_name() == Some(OsStr::new(id));
    if id.is_empty() || !single {
        return Err(ClaimError::NotFound {
            target: target.clone(),
            path,
        });
    }
    Ok(path)
}

fn ensure_dir(path: &Path, target: &ClaimRef) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ClaimError::NotFound {
            target: target.clone(),
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ClaimError::NotFound {
            target: target.clone(),
            path: path.to_path_buf(),
        }),
        Err(e) => Err(io_error(target, path, e)),
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn io_error(target: &ClaimRef, path: &Path, source: io::Error) -> ClaimError {
    ClaimError::Io {
        target: target.clone(),
        path: path.to_path_buf(),
        source,
    }
}
