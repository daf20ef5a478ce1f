//! Error handling for GenoDx CLI

use genodx_core::{AlignError, GenomeError, RegistryError, StoreError, TypeError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GenoDx CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("Clinic data error in {path}: {message}")]
    Store { path: PathBuf, message: String },

    #[error("Genome import error: {message}")]
    Genome { message: String },

    #[error("No {kind} found for {key}")]
    NotFound { kind: String, key: String },

    #[error("Alignment error: {message}")]
    Alignment { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn not_found(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            key: key.into(),
        }
    }

    pub fn alignment<S: Into<String>>(message: S) -> Self {
        Self::Alignment { message: message.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { path, source } => Self::Store {
                path,
                message: source.to_string(),
            },
            StoreError::Json { path, source } => Self::Store {
                path,
                message: source.to_string(),
            },
        }
    }
}

impl From<GenomeError> for CliError {
    fn from(err: GenomeError) -> Self {
        Self::Genome { message: err.to_string() }
    }
}

impl From<AlignError> for CliError {
    fn from(err: AlignError) -> Self {
        Self::alignment(err.to_string())
    }
}

impl From<TypeError> for CliError {
    fn from(err: TypeError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::PatientNotFound(phn) => Self::not_found("patient", format!("PHN {phn}")),
            RegistryError::ConditionNotFound(name) => Self::not_found("condition", name),
            RegistryError::Align(err) => err.into(),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::NotFound { kind, .. } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Use 'genodx {} list' to see what is registered\n\
                 • Check that --data points at the right clinic file",
                kind
            ));
        }

        CliError::Store { path, .. } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the clinic file is valid JSON: {}\n\
                 • Dates of birth are stored as MM/DD/YYYY\n\
                 • Use --data to point at a different clinic file",
                path.display()
            ));
        }

        CliError::Genome { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Genome files are named <PHN>_genome.txt (or .fa/.fasta, optionally .gz)\n\
                 • Use --genomes to point at a different genome directory"
            );
        }

        CliError::Alignment { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • A genome must be at least as long as every condition sequence\n\
                 • Check the patient's genome file for truncation"
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Dates of birth use MM/DD/YYYY\n\
                 • PHNs and condition names must be unique"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your genodx.toml configuration file\n\
                 • Use 'genodx config --example' to generate a sample configuration"
            );
        }

        CliError::Io { .. } => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
