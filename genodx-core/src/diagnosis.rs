//! Diagnosis workflow for GenoDx
//!
//! Two different matching rules live here:
//!
//! * [`DiagnosisWorkflow::diagnose`] is an exact substring test of the
//!   condition sequence inside the genome.
//! * [`DiagnosisWorkflow::diagnosis_report`] runs the windowed [`Aligner`] and
//!   reports the first best-scoring window.
//!
//! A positive diagnosis always has some window scoring 100%, but the report
//! shows the *first* maximal window, so the two can point at different places
//! in the genome. Callers that need both should not assume they agree.

use crate::align::{AlignResult, Aligner};
use crate::events::{Event, EventSink};
use crate::types::{Condition, Patient};
use std::fmt;

/// Alignment summary of one condition against one genome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisReport {
    pub condition: String,
    /// Condition sequence with mismatches against the best window redacted
    pub redacted: String,
    pub condition_sequence: String,
    pub similarity: u32,
    pub best_score: usize,
    pub best_offset: usize,
}

impl fmt::Display for DiagnosisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Diagnosis for {}\nPatient Genome: {}\nCondition Seq:  {}\n(Similarity: {}%)\n\n",
            self.condition, self.redacted, self.condition_sequence, self.similarity
        )
    }
}

/// Outcome of screening one patient against one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screening {
    pub condition: String,
    pub positive: bool,
    pub report: Option<DiagnosisReport>,
}

impl Screening {
    pub fn verdict(&self) -> &'static str {
        if self.positive {
            "positive"
        } else {
            "negative"
        }
    }
}

/// Stateless diagnosis entry points with an optional event observer.
///
/// Each call builds its own [`Aligner`], so one workflow can be shared across
/// threads.
#[derive(Clone, Copy, Default)]
pub struct DiagnosisWorkflow<'a> {
    observer: Option<&'a dyn EventSink>,
}

impl<'a> DiagnosisWorkflow<'a> {
    pub fn new() -> Self {
        Self { observer: None }
    }

    /// Workflow that reports patient-level calls to `observer`.
    ///
    /// [`diagnose_patient`](Self::diagnose_patient) records one event per
    /// call, and [`full_patient_report`](Self::full_patient_report) records
    /// one when a report was produced. The genome-level calls
    /// ([`diagnose`](Self::diagnose), [`diagnosis_report`](Self::diagnosis_report),
    /// [`full_diagnosis_report`](Self::full_diagnosis_report)) and
    /// [`patient_report`](Self::patient_report) record nothing.
    pub fn with_observer(observer: &'a dyn EventSink) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    /// True iff the condition sequence occurs verbatim in the genome
    pub fn diagnose(&self, genome: &str, condition: &Condition) -> bool {
        genome.contains(condition.sequence.as_str())
    }

    /// Align the condition against the genome; `None` for an empty genome
    pub fn diagnosis_report(
        &self,
        genome: &str,
        condition: &Condition,
    ) -> AlignResult<Option<DiagnosisReport>> {
        if genome.is_empty() {
            return Ok(None);
        }

        let mut aligner = Aligner::new(condition.sequence.as_str(), genome)?;
        let best = aligner.compute_best_alignment();
        log::debug!(
            "{}: best window at {} with {}% similarity",
            condition.name,
            best.offset,
            best.similarity
        );

        Ok(Some(DiagnosisReport {
            condition: condition.name.clone(),
            redacted: aligner.redacted().to_string(),
            condition_sequence: aligner.target().to_string(),
            similarity: best.similarity,
            best_score: best.score,
            best_offset: best.offset,
        }))
    }

    /// Reports for every condition, concatenated in the given order
    pub fn full_diagnosis_report(
        &self,
        genome: &str,
        conditions: &[Condition],
    ) -> AlignResult<Option<String>> {
        if genome.is_empty() {
            return Ok(None);
        }

        let mut report = String::new();
        for condition in conditions {
            if let Some(section) = self.diagnosis_report(genome, condition)? {
                report.push_str(&section.to_string());
            }
        }
        Ok(Some(report))
    }

    pub fn diagnose_patient(&self, patient: &Patient, condition: &Condition) -> bool {
        let positive = self.diagnose(&patient.genome, condition);
        self.notify(format!(
            "Diagnosed the patient with PHN, {} for genetic conditions.",
            patient.phn
        ));
        positive
    }

    pub fn patient_report(
        &self,
        patient: &Patient,
        condition: &Condition,
    ) -> AlignResult<Option<DiagnosisReport>> {
        self.diagnosis_report(&patient.genome, condition)
    }

    pub fn full_patient_report(
        &self,
        patient: &Patient,
        conditions: &[Condition],
    ) -> AlignResult<Option<String>> {
        let report = self.full_diagnosis_report(&patient.genome, conditions)?;
        if report.is_some() {
            self.notify(format!(
                "Retrieved a full diagnosis report for patient with PHN, {}",
                patient.phn
            ));
        }
        Ok(report)
    }

    /// Exact-match verdict plus alignment report for each condition
    pub fn screen(&self, patient: &Patient, conditions: &[Condition]) -> AlignResult<Vec<Screening>> {
        conditions
            .iter()
            .map(|condition| {
                Ok(Screening {
                    condition: condition.name.clone(),
                    positive: self.diagnose_patient(patient, condition),
                    report: self.patient_report(patient, condition)?,
                })
            })
            .collect()
    }

    fn notify(&self, description: String) {
        if let Some(observer) = self.observer {
            observer.record(Event::new(description));
        }
    }
}

impl fmt::Debug for DiagnosisWorkflow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosisWorkflow")
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignError;
    use crate::events::EventLog;

    const GENOME: &str = "GTACATGCAATGCATGGG";

    fn condition_a() -> Condition {
        Condition::new("Genetic Condition A", "ATGCAATGC", 10)
    }

    fn condition_b() -> Condition {
        Condition::new("Genetic Condition B", "TGCCATGGC", 5)
    }

    fn patient_with(genome: &str) -> Patient {
        let mut patient = Patient::new("Patient Zero", "11/11/1999", "1091239501").unwrap();
        patient.update_genome(genome);
        patient
    }

    #[test]
    fn test_diagnose_exact_substring() {
        let workflow = DiagnosisWorkflow::new();
        assert!(workflow.diagnose(GENOME, &condition_a()));
        assert!(!workflow.diagnose(GENOME, &condition_b()));
    }

    #[test]
    fn test_diagnose_close_match_is_negative() {
        let workflow = DiagnosisWorkflow::new();
        assert!(!workflow.diagnose("GTACATGCGATGCATGGG", &condition_a()));
    }

    #[test]
    fn test_diagnose_longer_needle() {
        let workflow = DiagnosisWorkflow::new();
        assert!(!workflow.diagnose("ATG", &condition_a()));
    }

    #[test]
    fn test_report_text() {
        let report = DiagnosisWorkflow::new()
            .diagnosis_report(GENOME, &condition_a())
            .unwrap()
            .unwrap();
        assert_eq!(report.best_offset, 4);
        assert_eq!(
            report.to_string(),
            "Diagnosis for Genetic Condition A\n\
             Patient Genome: ATGCAATGC\n\
             Condition Seq:  ATGCAATGC\n\
             (Similarity: 100%)\n\n"
        );
    }

    #[test]
    fn test_report_empty_genome() {
        let workflow = DiagnosisWorkflow::new();
        assert_eq!(workflow.diagnosis_report("", &condition_a()).unwrap(), None);
        assert_eq!(workflow.full_diagnosis_report("", &[condition_a()]).unwrap(), None);
    }

    #[test]
    fn test_report_genome_shorter_than_condition() {
        let err = DiagnosisWorkflow::new()
            .diagnosis_report("ATGC", &condition_a())
            .unwrap_err();
        assert!(matches!(err, AlignError::ReferenceTooShort { .. }));
    }

    #[test]
    fn test_full_report_keeps_input_order() {
        let workflow = DiagnosisWorkflow::new();
        let report = workflow
            .full_diagnosis_report(GENOME, &[condition_a(), condition_b()])
            .unwrap()
            .unwrap();
        assert_eq!(
            report,
            "Diagnosis for Genetic Condition A\n\
             Patient Genome: ATGCAATGC\n\
             Condition Seq:  ATGCAATGC\n\
             (Similarity: 100%)\n\n\
             Diagnosis for Genetic Condition B\n\
             Patient Genome: TGC-ATG--\n\
             Condition Seq:  TGCCATGGC\n\
             (Similarity: 67%)\n\n"
        );

        let reversed = workflow
            .full_diagnosis_report(GENOME, &[condition_b(), condition_a()])
            .unwrap()
            .unwrap();
        assert!(reversed.starts_with("Diagnosis for Genetic Condition B"));
    }

    #[test]
    fn test_full_report_no_conditions() {
        let report = DiagnosisWorkflow::new().full_diagnosis_report(GENOME, &[]).unwrap();
        assert_eq!(report.as_deref(), Some(""));
    }

    #[test]
    fn test_observer_sees_patient_calls() {
        let log = EventLog::new();
        let workflow = DiagnosisWorkflow::with_observer(&log);
        let patient = patient_with(GENOME);

        assert!(workflow.diagnose_patient(&patient, &condition_a()));
        workflow.full_patient_report(&patient, &[condition_a()]).unwrap();

        assert_eq!(
            log.descriptions(),
            vec![
                "Diagnosed the patient with PHN, 1091239501 for genetic conditions.",
                "Retrieved a full diagnosis report for patient with PHN, 1091239501",
            ]
        );
    }

    #[test]
    fn test_observer_silent_for_genome_level_calls() {
        let log = EventLog::new();
        let workflow = DiagnosisWorkflow::with_observer(&log);
        let patient = patient_with(GENOME);

        workflow.diagnose(GENOME, &condition_a());
        workflow.diagnosis_report(GENOME, &condition_a()).unwrap();
        workflow.full_diagnosis_report(GENOME, &[condition_a()]).unwrap();
        workflow.patient_report(&patient, &condition_b()).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_observer_silent_without_genome() {
        let log = EventLog::new();
        let workflow = DiagnosisWorkflow::with_observer(&log);
        let patient = patient_with("");

        assert_eq!(workflow.full_patient_report(&patient, &[condition_a()]).unwrap(), None);
        assert!(log.is_empty());
    }

    #[test]
    fn test_screen() {
        let workflow = DiagnosisWorkflow::new();
        let patient = patient_with(GENOME);
        let screenings = workflow.screen(&patient, &[condition_a(), condition_b()]).unwrap();

        assert_eq!(screenings.len(), 2);
        assert_eq!(screenings[0].verdict(), "positive");
        assert_eq!(screenings[1].verdict(), "negative");
        assert_eq!(screenings[1].report.as_ref().map(|r| r.similarity), Some(67));
    }
}
