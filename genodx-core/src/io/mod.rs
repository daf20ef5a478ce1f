//! File I/O for GenoDx
//!
//! Genome import for registered patients. The clinic registry itself is
//! persisted by [`crate::store`].

pub mod genome;

pub use genome::{GenomeError, GenomeReader, GenomeResult};
