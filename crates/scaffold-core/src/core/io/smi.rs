use super::smiles::{SmilesError, parse};
use crate::core::io::traits::MolecularFile;
use crate::core::models::molecule::Molecule;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// One line of a SMILES file.
#[derive(Debug, Clone)]
pub struct SmilesRecord {
    /// The SMILES text as it appears in the file.
    pub smiles: String,
    /// Optional title following the SMILES on the same line.
    pub name: Option<String>,
    /// The parsed structure.
    pub molecule: Molecule,
}

impl SmilesRecord {
    pub fn new(smiles: impl Into<String>, name: Option<String>) -> Result<Self, SmilesError> {
        let smiles = smiles.into();
        let molecule = parse(&smiles)?;
        Ok(Self {
            smiles,
            name,
            molecule,
        })
    }

    /// The record name, or a fallback derived from its 1-based position.
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("molecule_{}", index + 1))
    }
}

#[derive(Debug, Error)]
pub enum SmiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {source}")]
    Parse { line: usize, source: SmilesError },
}

/// The SMILES file format: one `SMILES [name]` entry per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub struct SmiFile;

impl MolecularFile for SmiFile {
    type Record = SmilesRecord;
    type Error = SmiError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Self::Record>, Self::Error> {
        let mut records = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.splitn(2, char::is_whitespace);
            let smiles = fields.next().unwrap_or_default();
            let name = fields
                .next()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string);

            let record = SmilesRecord::new(smiles, name).map_err(|source| SmiError::Parse {
                line: line_num + 1,
                source,
            })?;
            records.push(record);
        }

        Ok(records)
    }

    fn write_to(records: &[Self::Record], writer: &mut impl Write) -> Result<(), Self::Error> {
        for record in records {
            match &record.name {
                Some(name) => writeln!(writer, "{} {}", record.smiles, name)?,
                None => writeln!(writer, "{}", record.smiles)?,
            }
        }
        Ok(())
    }
}
