//! Command implementations for GenoDx CLI

pub mod align;
pub mod condition;
pub mod diagnose;
pub mod patient;
pub mod report;

use genodx_core::{Clinic, ClinicStore, GenomeReader};

use crate::config::Config;
use crate::error::CliResult;

/// Clinic loaded from disk for the duration of one command
#[derive(Debug)]
pub struct Session {
    pub clinic: Clinic,
    store: ClinicStore,
}

impl Session {
    /// Load the clinic file (or start empty) and import available genomes
    pub fn open(config: &Config) -> CliResult<Self> {
        let store = ClinicStore::new(&config.storage.clinic_file);
        let mut clinic = if store.exists() {
            store.load()?
        } else {
            log::info!(
                "No clinic data at {}, starting with an empty registry",
                store.path().display()
            );
            Clinic::new()
        };

        let reader = GenomeReader::new(&config.storage.genome_dir);
        if reader.dir().is_dir() {
            let fetched = clinic.refresh_genomes(&reader)?;
            log::info!("Imported {} genomes from {}", fetched, reader.dir().display());
        } else {
            log::debug!("Genome directory {} does not exist", reader.dir().display());
        }

        Ok(Self { clinic, store })
    }

    pub fn save(&self) -> CliResult<()> {
        self.store.save(&self.clinic)?;
        Ok(())
    }

    /// Write every recorded event to stderr
    pub fn print_events(&self) {
        for event in self.clinic.events().events() {
            eprintln!("{event}\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genodx_core::{Condition, Patient};
    use tempfile::TempDir;

    pub(crate) fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.clinic_file = dir.path().join("clinicData.json");
        config.storage.genome_dir = dir.path().join("genomes");
        config
    }

    #[test]
    fn test_open_without_data() {
        let dir = TempDir::new().unwrap();
        let session = Session::open(&test_config(&dir)).unwrap();
        assert!(session.clinic.patients().is_empty());
        assert!(session.clinic.conditions().is_empty());
    }

    #[test]
    fn test_save_and_reopen_with_genome() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let mut session = Session::open(&config).unwrap();
        session.clinic.add_patient(Patient::new("Patient Zero", "11/11/1999", "1091239501").unwrap());
        session.clinic.add_condition(Condition::new("Genetic Condition A", "ATGCAATGC", 10));
        session.save().unwrap();

        std::fs::create_dir_all(&config.storage.genome_dir).unwrap();
        std::fs::write(
            config.storage.genome_dir.join("1091239501_genome.txt"),
            "GTACATGCAATGCATGGG\n",
        )
        .unwrap();

        let session = Session::open(&config).unwrap();
        let patient = session.clinic.find_patient("1091239501").unwrap();
        assert_eq!(patient.genome, "GTACATGCAATGCATGGG");
        assert_eq!(session.clinic.conditions().len(), 1);
    }
}
