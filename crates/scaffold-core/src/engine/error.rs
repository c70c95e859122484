use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::smiles::SmilesError;
use crate::graph::GraphError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid SMILES input: {source}")]
    Smiles {
        #[from]
        source: SmilesError,
    },

    #[error("Scaffold graph operation failed: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Molecule has no ring and therefore no scaffold")]
    EmptyMolecule,

    #[error("Molecules produce {count} distinct Schuffenhauer roots: {roots:?}")]
    MultipleRoots { count: usize, roots: Vec<String> },
}
