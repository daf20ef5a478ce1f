//! Patient command implementation - register, remove, list and annotate patients

use genodx_core::Patient;

use super::Session;
use crate::error::{CliError, CliResult};
use crate::PatientCommand;

pub fn execute(session: &mut Session, command: PatientCommand) -> CliResult<()> {
    match command {
        PatientCommand::Add { name, dob, phn } => add(session, name, &dob, phn),
        PatientCommand::Remove { phn } => remove(session, &phn),
        PatientCommand::List => {
            list(session);
            Ok(())
        }
        PatientCommand::Show { phn } => {
            println!("{}", session.clinic.patient_info(&phn)?);
            Ok(())
        }
        PatientCommand::Notes { phn, text } => notes(session, &phn, text),
    }
}

fn add(session: &mut Session, name: String, dob: &str, phn: String) -> CliResult<()> {
    let patient = Patient::new(name, dob, phn)?;
    let summary = patient.to_string();
    if !session.clinic.add_patient(patient) {
        return Err(CliError::validation(format!(
            "A patient is already registered as {summary}"
        )));
    }

    session.save()?;
    println!("Registered {summary}");
    Ok(())
}

fn remove(session: &mut Session, phn: &str) -> CliResult<()> {
    if !session.clinic.remove_patient(phn) {
        return Err(CliError::not_found("patient", format!("PHN {phn}")));
    }

    session.save()?;
    println!("Removed patient with PHN {phn}");
    Ok(())
}

fn list(session: &Session) {
    let patients = session.clinic.patients();
    if patients.is_empty() {
        println!("No patients registered");
        return;
    }

    for patient in patients.iter() {
        let genome = if patient.has_no_genome() {
            "no genome".to_string()
        } else {
            format!("{} bp genome", patient.genome.len())
        };
        println!("{patient}, born {}, {genome}", patient.dob_string());
    }
}

fn notes(session: &mut Session, phn: &str, text: String) -> CliResult<()> {
    let patient = session
        .clinic
        .find_patient_mut(phn)
        .ok_or_else(|| CliError::not_found("patient", format!("PHN {phn}")))?;
    patient.update_notes(text);

    session.save()?;
    println!("Updated notes for patient with PHN {phn}");
    Ok(())
}
