//! Core clinic types for GenoDx
//!
//! Genetic conditions and registered patients, with the date-of-birth format
//! used for input and for the saved clinic document.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Text format of a date of birth
pub const DOB_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("Invalid date of birth '{value}', expected MM/DD/YYYY: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type TypeResult<T> = Result<T, TypeError>;

/// Parse a `MM/DD/YYYY` date; leading zeros are optional
pub fn parse_dob(value: &str) -> TypeResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DOB_FORMAT).map_err(|source| TypeError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// A genetic condition: a mutated sequence located on a chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    #[serde(rename = "seq")]
    pub sequence: String,
    #[serde(rename = "chrNum")]
    pub chromosome: u32,
}

impl Condition {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>, chromosome: u32) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            chromosome,
        }
    }

    pub fn full_info(&self) -> String {
        format!(
            "Condition Name: {}\nChromosome Number: {}\nMutated Sequence: {}\n",
            self.name, self.chromosome, self.sequence
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A patient registered with the clinic.
///
/// The genome is loaded from disk at runtime and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "name")]
    pub full_name: String,
    #[serde(with = "dob_format")]
    pub dob: NaiveDate,
    pub phn: String,
    #[serde(skip)]
    pub genome: String,
    #[serde(default)]
    pub notes: String,
}

impl Patient {
    /// Create a patient with no genome and empty notes
    pub fn new(full_name: impl Into<String>, dob: &str, phn: impl Into<String>) -> TypeResult<Self> {
        Ok(Self {
            full_name: full_name.into(),
            dob: parse_dob(dob)?,
            phn: phn.into(),
            genome: String::new(),
            notes: String::new(),
        })
    }

    pub fn update_genome(&mut self, genome: impl Into<String>) {
        self.genome = genome.into();
    }

    pub fn update_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn has_no_genome(&self) -> bool {
        self.genome.is_empty()
    }

    /// Age in whole years on the given day
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.dob).unwrap_or(0)
    }

    /// Age in whole years today
    pub fn age(&self) -> u32 {
        self.age_on(Local::now().date_naive())
    }

    pub fn dob_string(&self) -> String {
        self.dob.format(DOB_FORMAT).to_string()
    }

    pub fn all_info_on(&self, today: NaiveDate) -> String {
        format!(
            "Full Name: {}\nPHN: {}\nAge: {}\nDate of Birth: {}\nNotes: {}",
            self.full_name,
            self.phn,
            self.age_on(today),
            self.dob_string(),
            self.notes
        )
    }

    pub fn all_info(&self) -> String {
        self.all_info_on(Local::now().date_naive())
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (PHN: {})", self.full_name, self.phn)
    }
}

mod dob_format {
    use super::{parse_dob, DOB_FORMAT};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DOB_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_dob(&value).map_err(serde::de::Error::custom)
    }
}
