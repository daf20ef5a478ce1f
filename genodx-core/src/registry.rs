//! Patient and condition registry
//!
//! A [`Clinic`] owns a [`PatientList`], a [`ConditionList`] and the
//! [`EventLog`] that every registry and diagnosis operation reports to.

use rayon::prelude::*;
use thiserror::Error;

use crate::align::AlignError;
use crate::diagnosis::{DiagnosisWorkflow, Screening};
use crate::events::{Event, EventLog, EventSink};
use crate::io::genome::{GenomeReader, GenomeResult};
use crate::types::{Condition, Patient};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No patient registered with PHN {0}")]
    PatientNotFound(String),

    #[error("No genetic condition named {0}")]
    ConditionNotFound(String),

    #[error("Alignment failed: {0}")]
    Align(#[from] AlignError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Conditions keyed by name, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionList {
    conditions: Vec<Condition>,
}

impl ConditionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the condition unless its sequence is empty or one with the same
    /// name exists
    pub fn add(&mut self, condition: Condition) -> bool {
        if condition.sequence.is_empty() || self.contains(&condition.name) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    /// Remove the condition with this name; false if there was none
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| c.name != name);
        self.conditions.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conditions.iter().any(|c| c.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.name == name)
    }

    pub fn as_slice(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Patients keyed by PHN, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientList {
    patients: Vec<Patient>,
}

impl PatientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the patient unless the PHN is already taken
    pub fn add(&mut self, patient: Patient) -> bool {
        if self.is_registered(&patient.phn) {
            return false;
        }
        self.patients.push(patient);
        true
    }

    pub fn remove(&mut self, phn: &str) -> bool {
        let before = self.patients.len();
        self.patients.retain(|p| p.phn != phn);
        self.patients.len() != before
    }

    pub fn is_registered(&self, phn: &str) -> bool {
        self.patients.iter().any(|p| p.phn == phn)
    }

    pub fn find(&self, phn: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.phn == phn)
    }

    pub fn find_mut(&mut self, phn: &str) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.phn == phn)
    }

    pub fn as_slice(&self) -> &[Patient] {
        &self.patients
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patient> {
        self.patients.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Patient> {
        self.patients.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

/// Full diagnosis report of one patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortReport {
    pub phn: String,
    pub full_name: String,
    pub report: String,
}

/// The clinic: registered patients, known conditions, and its event log
#[derive(Debug, Default)]
pub struct Clinic {
    patients: PatientList,
    conditions: ConditionList,
    events: EventLog,
}

impl Clinic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&mut self, patient: Patient) -> bool {
        let name = patient.full_name.clone();
        let added = self.patients.add(patient);
        if added {
            self.record(format!("Added a new patient, {name}, to the list of patients."));
        }
        added
    }

    pub fn remove_patient(&mut self, phn: &str) -> bool {
        let removed = self.patients.remove(phn);
        if removed {
            self.record(format!("Removed a patient with PHN, {phn}, from the list of patients."));
        }
        removed
    }

    pub fn add_condition(&mut self, condition: Condition) -> bool {
        let name = condition.name.clone();
        let added = self.conditions.add(condition);
        if added {
            self.record(format!("Added a new condition, {name}, to the list of conditions."));
        }
        added
    }

    pub fn remove_condition(&mut self, name: &str) -> bool {
        let removed = self.conditions.remove(name);
        if removed {
            self.record(format!("Removed the condition, {name}, from the list of conditions."));
        }
        removed
    }

    pub fn find_patient(&self, phn: &str) -> Option<&Patient> {
        self.patients.find(phn)
    }

    pub fn find_patient_mut(&mut self, phn: &str) -> Option<&mut Patient> {
        self.patients.find_mut(phn)
    }

    pub fn find_condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.find(name)
    }

    /// Patient summary text; records that it was looked up
    pub fn patient_info(&self, phn: &str) -> RegistryResult<String> {
        let patient = self.require_patient(phn)?;
        self.record(format!("Retrieved information about patient with PHN: {phn}"));
        Ok(patient.all_info())
    }

    /// Condition summary text; records that it was looked up
    pub fn condition_info(&self, name: &str) -> RegistryResult<String> {
        let condition = self
            .conditions
            .find(name)
            .ok_or_else(|| RegistryError::ConditionNotFound(name.to_string()))?;
        self.record(format!("Retrieved information about the condition, {name}"));
        Ok(condition.full_info())
    }

    pub fn patients(&self) -> &PatientList {
        &self.patients
    }

    pub fn conditions(&self) -> &ConditionList {
        &self.conditions
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Screen one patient against every known condition
    pub fn diagnose(&self, phn: &str) -> RegistryResult<Vec<Screening>> {
        let patient = self.require_patient(phn)?;
        Ok(self.workflow().screen(patient, self.conditions.as_slice())?)
    }

    /// Full diagnosis report of one patient; `None` without a genome
    pub fn full_report(&self, phn: &str) -> RegistryResult<Option<String>> {
        let patient = self.require_patient(phn)?;
        Ok(self
            .workflow()
            .full_patient_report(patient, self.conditions.as_slice())?)
    }

    /// Full reports for every patient with a genome, built in parallel.
    ///
    /// Output follows registration order.
    pub fn cohort_reports(&self) -> RegistryResult<Vec<CohortReport>> {
        let workflow = self.workflow();
        let conditions = self.conditions.as_slice();

        let reports = self
            .patients
            .as_slice()
            .par_iter()
            .map(|patient| -> Result<Option<CohortReport>, AlignError> {
                let report = workflow.full_patient_report(patient, conditions)?;
                Ok(report.map(|report| CohortReport {
                    phn: patient.phn.clone(),
                    full_name: patient.full_name.clone(),
                    report,
                }))
            })
            .collect::<Result<Vec<_>, AlignError>>()?;

        let reports: Vec<CohortReport> = reports.into_iter().flatten().collect();
        log::info!(
            "Built {} cohort reports over {} conditions",
            reports.len(),
            conditions.len()
        );
        Ok(reports)
    }

    /// Reload every patient's genome from `reader`; returns how many were found
    pub fn refresh_genomes(&mut self, reader: &GenomeReader) -> GenomeResult<usize> {
        let mut fetched = Vec::new();
        for patient in self.patients.iter_mut() {
            if let Some(genome) = reader.read(&patient.phn)? {
                patient.update_genome(genome);
                fetched.push(patient.phn.clone());
            }
        }

        for phn in &fetched {
            self.record(format!(
                "Fetched the genome for the patient with PHN, {phn} from the data folder."
            ));
        }
        Ok(fetched.len())
    }

    pub(crate) fn record(&self, description: String) {
        self.events.record(Event::new(description));
    }

    fn workflow(&self) -> DiagnosisWorkflow<'_> {
        DiagnosisWorkflow::with_observer(&self.events)
    }

    fn require_patient(&self, phn: &str) -> RegistryResult<&Patient> {
        self.patients
            .find(phn)
            .ok_or_else(|| RegistryError::PatientNotFound(phn.to_string()))
    }
}
