//! Provides input/output functionality for molecule notations and files.
//!
//! This module contains the SMILES line notation parser and the SMILES file
//! format (one molecule per line, optionally followed by a name), built on a
//! unified trait-based interface for file I/O operations.

pub mod smi;
pub mod smiles;
pub mod traits;
