//! Diagnose command implementation - screen one patient against every condition

use super::Session;
use crate::config::ReportConfig;
use crate::error::CliResult;

pub fn execute(session: &Session, report_config: &ReportConfig, phn: &str) -> CliResult<()> {
    let screenings = session.clinic.diagnose(phn)?;
    if let Some(patient) = session.clinic.find_patient(phn) {
        if patient.has_no_genome() {
            log::warn!("No genome on file for {patient}; every condition screens negative");
        }
    }

    if screenings.is_empty() {
        println!("No conditions registered");
        return Ok(());
    }

    let mut shown = 0;
    for screening in &screenings {
        if report_config.show_positive_only && !screening.positive {
            continue;
        }
        shown += 1;
        println!("{}: {}", screening.condition, screening.verdict());
        if let Some(report) = &screening.report {
            print!("{report}");
        }
    }

    log::info!(
        "Screened PHN {} against {} conditions ({} shown)",
        phn,
        screenings.len(),
        shown
    );
    Ok(())
}
