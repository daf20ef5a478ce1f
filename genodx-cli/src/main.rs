use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use commands::Session;
use config::Config;
use error::{print_error_and_exit, CliError, CliResult};

#[derive(Parser)]
#[command(name = "genodx")]
#[command(about = "GenoDx - Genetic condition screening for a clinic's patients")]
#[command(version)]
#[command(long_about = "
GenoDx keeps a registry of patients and genetic conditions and screens each
patient's genome for the conditions' mutated sequences.

Examples:
  genodx condition add --name 'Genetic Condition A' --seq ATGCAATGC --chromosome 10
  genodx patient add --name 'Patient Zero' --dob 11/11/1999 --phn 1091239501
  genodx diagnose --phn 1091239501
  genodx report --all --genomes ./data/genomes
  genodx align --target TGACTG --reference ATGCATGCATGC
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Clinic data file (overrides storage.clinic_file)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Genome directory (overrides storage.genome_dir)
    #[arg(long, global = true)]
    pub genomes: Option<PathBuf>,

    /// Print the session's event log to stderr on exit
    #[arg(long, global = true)]
    pub show_events: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register, remove and inspect patients
    Patient {
        #[command(subcommand)]
        action: PatientCommand,
    },

    /// Register, remove and list genetic conditions
    Condition {
        #[command(subcommand)]
        action: ConditionCommand,
    },

    /// Screen a patient against every registered condition
    Diagnose {
        /// Personal health number of the patient
        #[arg(long)]
        phn: String,
    },

    /// Print full diagnosis reports
    Report {
        /// Report on one patient
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        phn: Option<String>,

        /// Report on every patient with a genome on file
        #[arg(long)]
        all: bool,
    },

    /// Find the best-matching window of a target sequence in a reference
    Align {
        /// Sequence to look for
        #[arg(long)]
        target: String,

        /// Sequence to scan, at least as long as the target
        #[arg(long)]
        reference: String,
    },

    /// Show the effective configuration
    Config {
        /// Use the example configuration instead of the effective one
        #[arg(long)]
        example: bool,

        /// Write the configuration to this file instead of printing it
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PatientCommand {
    /// Register a new patient
    Add {
        /// Full name
        #[arg(long)]
        name: String,

        /// Date of birth (MM/DD/YYYY)
        #[arg(long)]
        dob: String,

        /// Personal health number
        #[arg(long)]
        phn: String,
    },

    /// Remove a patient
    Remove {
        #[arg(long)]
        phn: String,
    },

    /// List registered patients
    List,

    /// Show a patient's details
    Show {
        #[arg(long)]
        phn: String,
    },

    /// Replace a patient's notes
    Notes {
        #[arg(long)]
        phn: String,

        #[arg(long)]
        text: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConditionCommand {
    /// Register a new genetic condition
    Add {
        #[arg(long)]
        name: String,

        /// Mutated sequence
        #[arg(long)]
        seq: String,

        /// Chromosome number
        #[arg(long)]
        chromosome: u32,
    },

    /// Remove a condition
    Remove {
        #[arg(long)]
        name: String,
    },

    /// List registered conditions
    List,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

fn config_command(config: &Config, example: bool, write: Option<PathBuf>) -> CliResult<()> {
    let to_cli_error = |e: anyhow::Error| CliError::config(format!("{e:#}"));

    match write {
        Some(path) => {
            let chosen = if example { Config::default() } else { config.clone() };
            chosen.save_to_file(&path).map_err(to_cli_error)?;
            println!("Wrote configuration to {}", path.display());
        }
        None => {
            let content = if example {
                Config::example_toml().map_err(to_cli_error)?
            } else {
                toml::to_string_pretty(config)?
            };
            print!("{content}");
        }
    }
    Ok(())
}

fn run(command: Commands, config: &Config, show_events: bool) -> CliResult<()> {
    match command {
        Commands::Align { target, reference } => commands::align::execute(&target, &reference),

        Commands::Config { example, write } => config_command(config, example, write),

        command => {
            let mut session = Session::open(config)?;
            let result = match command {
                Commands::Patient { action } => commands::patient::execute(&mut session, action),
                Commands::Condition { action } => commands::condition::execute(&mut session, action),
                Commands::Diagnose { phn } => commands::diagnose::execute(&session, &config.report, &phn),
                Commands::Report { phn, .. } => commands::report::execute(&session, phn.as_deref()),
                Commands::Align { .. } | Commands::Config { .. } => Ok(()),
            };
            if show_events {
                session.print_events();
            }
            result
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // CLI flags win over the configuration file
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.storage.clinic_file = data;
    }
    if let Some(genomes) = cli.genomes {
        config.storage.genome_dir = genomes;
    }
    let show_events = cli.show_events || config.report.show_events;

    if let Err(err) = run(cli.command, &config, show_events) {
        print_error_and_exit(&err);
    }

    Ok(())
}
