//! Canonical identity of molecules.
//!
//! Two molecules are treated as the same scaffold iff their canonical SMILES are
//! byte-equal. The identity is computed from canonical atom ranks
//! ([`ranking`]) and a rank-ordered depth-first SMILES writer ([`writer`]).

pub mod ranking;
pub mod writer;

use crate::core::models::molecule::Molecule;
use serde::{Deserialize, Serialize};

/// Options of the canonical SMILES generator.
///
/// Stereochemistry is not modelled by the molecule graph, so `stereo` must stay
/// `false`; configuration builders reject flavors that request it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SmilesFlavor {
    /// Write aromatic atoms in lowercase with implicit aromatic bonds.
    pub aromatic_symbols: bool,
    /// Encode stereochemistry.
    pub stereo: bool,
}

impl SmilesFlavor {
    /// Unique SMILES in Kekulé form.
    pub const UNIQUE: Self = Self {
        aromatic_symbols: false,
        stereo: false,
    };

    /// Unique SMILES with aromatic symbols.
    pub const UNIQUE_AROMATIC: Self = Self {
        aromatic_symbols: true,
        stereo: false,
    };
}

impl Default for SmilesFlavor {
    fn default() -> Self {
        Self::UNIQUE_AROMATIC
    }
}

/// Returns the canonical SMILES of a molecule under the given flavor.
pub fn canonical_smiles(molecule: &Molecule, flavor: &SmilesFlavor) -> String {
    writer::write_canonical(molecule, flavor)
}
