//! Report command implementation - full diagnosis reports for one or all patients

use super::Session;
use crate::error::CliResult;

pub fn execute(session: &Session, phn: Option<&str>) -> CliResult<()> {
    match phn {
        Some(phn) => patient_report(session, phn),
        None => cohort_report(session),
    }
}

fn patient_report(session: &Session, phn: &str) -> CliResult<()> {
    match session.clinic.full_report(phn)? {
        Some(report) => print!("{report}"),
        None => println!("No genome on file for patient with PHN {phn}"),
    }
    Ok(())
}

fn cohort_report(session: &Session) -> CliResult<()> {
    let reports = session.clinic.cohort_reports()?;
    if reports.is_empty() {
        println!("No patients with a genome on file");
        return Ok(());
    }

    for entry in &reports {
        println!("=== {} (PHN: {}) ===", entry.full_name, entry.phn);
        print!("{}", entry.report);
    }
    Ok(())
}
