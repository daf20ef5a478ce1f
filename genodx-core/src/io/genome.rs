//! Patient genome import
//!
//! A patient's genome lives in `<dir>/<PHN>_genome.<ext>`. Plain text files
//! are read line by line and joined; FASTA files are parsed with needletail
//! and every record's sequence is joined in file order. Any of them may be
//! gzip compressed.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use needletail::parse_fastx_reader;
use thiserror::Error;

/// File name suffixes tried, in order, after `<PHN>_genome`
pub const GENOME_EXTENSIONS: &[&str] = &[".txt", ".txt.gz", ".fa", ".fa.gz", ".fasta", ".fasta.gz"];

#[derive(Debug, Error)]
pub enum GenomeError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

pub type GenomeResult<T> = Result<T, GenomeError>;

/// Reader for genome files stored in one directory
#[derive(Debug, Clone)]
pub struct GenomeReader {
    dir: PathBuf,
}

impl GenomeReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First existing genome file for this PHN
    pub fn locate(&self, phn: &str) -> Option<PathBuf> {
        GENOME_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{phn}_genome{ext}")))
            .find(|path| path.is_file())
    }

    /// Genome of the patient, or `None` when no file exists for the PHN
    pub fn read(&self, phn: &str) -> GenomeResult<Option<String>> {
        let Some(path) = self.locate(phn) else {
            log::debug!("No genome file for PHN {} in {}", phn, self.dir.display());
            return Ok(None);
        };

        let genome = Self::read_file(&path)?;
        log::info!("Loaded {} bp genome for PHN {} from {}", genome.len(), phn, path.display());
        Ok(Some(genome))
    }

    /// Read one genome file, decompressing and parsing FASTA as needed
    pub fn read_file(path: &Path) -> GenomeResult<String> {
        let io_err = |source| GenomeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let mut bytes = Vec::new();
        if path.to_string_lossy().ends_with(".gz") {
            GzDecoder::new(file).read_to_end(&mut bytes).map_err(io_err)?;
        } else {
            BufReader::new(file).read_to_end(&mut bytes).map_err(io_err)?;
        }

        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'>') {
            Self::parse_fasta(path, bytes)
        } else {
            Self::join_lines(path, &bytes)
        }
    }

    fn parse_fasta(path: &Path, bytes: Vec<u8>) -> GenomeResult<String> {
        let parse_err = |e: needletail::errors::ParseError| GenomeError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut reader = parse_fastx_reader(Cursor::new(bytes)).map_err(parse_err)?;
        let mut genome = String::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(parse_err)?;
            genome.push_str(&String::from_utf8_lossy(&record.seq()));
        }
        Ok(genome)
    }

    fn join_lines(path: &Path, bytes: &[u8]) -> GenomeResult<String> {
        let mut genome = String::new();
        for line in bytes.lines() {
            let line = line.map_err(|source| GenomeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            genome.push_str(line.trim());
        }
        Ok(genome)
    }
}
