//! GenoDx Diagnosis Demo
//!
//! Registers two conditions and a patient, then prints the exact-match
//! verdicts and the full diagnosis report for the patient's genome.

use genodx_core::{Aligner, Clinic, Condition, Patient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("GenoDx Diagnosis Demo");
    println!("=====================\n");

    let mut clinic = Clinic::new();
    clinic.add_condition(Condition::new("Genetic Condition A", "ATGCAATGC", 10));
    clinic.add_condition(Condition::new("Genetic Condition B", "TGCCATGGC", 5));

    let mut patient = Patient::new("Patient Zero", "11/11/1999", "1091239501")?;
    patient.update_genome("GTACATGCAATGCATGGG");
    println!("Genome: {}\n", patient.genome);
    clinic.add_patient(patient);

    for screening in clinic.diagnose("1091239501")? {
        println!("{}: {}", screening.condition, screening.verdict());
    }
    println!();

    if let Some(report) = clinic.full_report("1091239501")? {
        print!("{report}");
    }

    // Ad hoc scan of one window against a longer reference
    let aligner = Aligner::align("TGACTG", "ATGCATGCATGC")?;
    println!(
        "TGACTG vs ATGCATGCATGC: score {:?}, redacted {}, similarity {:?}%",
        aligner.best_score(),
        aligner.redacted(),
        aligner.similarity_percentage()
    );

    println!("\nEvent log:");
    for event in clinic.events().events() {
        println!("{event}\n");
    }
    Ok(())
}
