//! Clinic store (JSON) implementation
//!
//! The registry is saved as one JSON document:
//! - `patients`   { name, dob, phn, notes }
//! - `conditions` { name, seq, chrNum }
//!
//! Genomes are not part of the document; they are re-imported from the genome
//! directory after loading.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::registry::Clinic;
use crate::types::{Condition, Patient};

/// Indentation of the saved document
const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed clinic data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Serialize)]
struct ClinicDocumentRef<'a> {
    patients: &'a [Patient],
    conditions: &'a [Condition],
}

#[derive(Deserialize)]
struct ClinicDocument {
    #[serde(default)]
    patients: Vec<Patient>,
    #[serde(default)]
    conditions: Vec<Condition>,
}

/// JSON file holding a clinic's patients and conditions
#[derive(Debug, Clone)]
pub struct ClinicStore {
    path: PathBuf,
}

impl ClinicStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the clinic back. Duplicate PHNs or condition names keep the
    /// first occurrence, as if the entries were registered one by one.
    /// Conditions with an empty sequence are skipped.
    pub fn load(&self) -> StoreResult<Clinic> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let document: ClinicDocument =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        let mut clinic = Clinic::new();
        clinic.record("Loaded the last saved clinic data.".to_string());
        for patient in document.patients {
            if !clinic.add_patient(patient) {
                log::warn!("Skipping duplicate patient entry in {}", self.path.display());
            }
        }
        for condition in document.conditions {
            let name = condition.name.clone();
            if condition.sequence.is_empty() {
                log::warn!("Skipping condition {} with an empty sequence in {}", name, self.path.display());
            } else if !clinic.add_condition(condition) {
                log::warn!("Skipping duplicate condition {} in {}", name, self.path.display());
            }
        }

        log::info!(
            "Loaded {} patients and {} conditions from {}",
            clinic.patients().len(),
            clinic.conditions().len(),
            self.path.display()
        );
        Ok(clinic)
    }

    /// Write the clinic, replacing any previous save
    pub fn save(&self, clinic: &Clinic) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let document = ClinicDocumentRef {
            patients: clinic.patients().as_slice(),
            conditions: clinic.conditions().as_slice(),
        };

        let file = File::create(&self.path).map_err(|source| self.io_error(source))?;
        let mut writer = BufWriter::new(file);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        document.serialize(&mut serializer).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(|source| self.io_error(source))?;

        clinic.record("Saved the clinic data.".to_string());
        log::info!("Saved clinic data to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = ClinicStore::new(dir.path().join("missing.json"));
        assert!(!store.exists());
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ClinicStore::new(path).load(), Err(StoreError::Json { .. })));
    }

    #[test]
    fn test_load_rejects_bad_dob() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        std::fs::write(
            &path,
            r#"{"patients": [{"name": "A", "dob": "yesterday", "phn": "1", "notes": ""}], "conditions": []}"#,
        )
        .unwrap();
        assert!(matches!(ClinicStore::new(path).load(), Err(StoreError::Json { .. })));
    }

    #[test]
    fn test_save_uses_four_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = ClinicStore::new(dir.path().join("nested").join("clinic.json"));
        let mut clinic = Clinic::new();
        clinic.add_condition(Condition::new("A", "ATGC", 1));

        store.save(&clinic).unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    \"patients\": []"));
        assert!(text.contains("\"chrNum\": 1"));
        assert_eq!(clinic.events().descriptions().last().map(String::as_str), Some("Saved the clinic data."));
    }

    #[test]
    fn test_load_keeps_first_duplicate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        std::fs::write(
            &path,
            r#"{
                "patients": [
                    {"name": "First", "dob": "01/02/2000", "phn": "1", "notes": ""},
                    {"name": "Second", "dob": "01/02/2000", "phn": "1", "notes": ""}
                ],
                "conditions": [{"name": "A", "seq": "ATGC", "chrNum": 2}]
            }"#,
        )
        .unwrap();

        let clinic = ClinicStore::new(path).load().unwrap();
        assert_eq!(clinic.patients().len(), 1);
        assert_eq!(clinic.find_patient("1").unwrap().full_name, "First");
        assert_eq!(clinic.events().descriptions()[0], "Loaded the last saved clinic data.");
    }

    #[test]
    fn test_load_skips_blank_condition_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        std::fs::write(
            &path,
            r#"{
                "patients": [{"name": "Patient Zero", "dob": "11/11/1999", "phn": "1091239501", "notes": ""}],
                "conditions": [
                    {"name": "A", "seq": "ATGCAATGC", "chrNum": 10},
                    {"name": "Blank", "seq": "", "chrNum": 1}
                ]
            }"#,
        )
        .unwrap();

        let mut clinic = ClinicStore::new(path).load().unwrap();
        assert_eq!(clinic.conditions().len(), 1);
        assert!(clinic.find_condition("Blank").is_none());

        clinic
            .find_patient_mut("1091239501")
            .unwrap()
            .update_genome("GTACATGCAATGCATGGG");
        let screenings = clinic.diagnose("1091239501").unwrap();
        assert_eq!(screenings.len(), 1);
        assert!(screenings[0].positive);
        assert!(clinic.full_report("1091239501").unwrap().is_some());
        assert_eq!(clinic.cohort_reports().unwrap().len(), 1);
    }
}
