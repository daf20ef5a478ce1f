//! GenoDx Core Library
//!
//! Windowed sequence scoring, diagnosis reports, the clinic registry and its
//! JSON store, and patient genome import.

pub mod align;
pub mod diagnosis;
pub mod events;
pub mod io;
pub mod registry;
pub mod store;
pub mod types;

// Re-export commonly used types and functions
pub use align::{AlignError, AlignResult, Aligner, WindowMatch, REDACTION_PLACEHOLDER};
pub use diagnosis::{DiagnosisReport, DiagnosisWorkflow, Screening};
pub use events::{Event, EventLog, EventSink};
pub use io::{GenomeError, GenomeReader, GenomeResult};
pub use registry::{Clinic, CohortReport, ConditionList, PatientList, RegistryError, RegistryResult};
pub use store::{ClinicStore, StoreError, StoreResult};
pub use types::{Condition, Patient, TypeError, TypeResult};

/// Version information for the GenoDx core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
