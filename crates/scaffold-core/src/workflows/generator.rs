use crate::core::canon::canonical_smiles;
use crate::core::io::smiles::parse;
use crate::core::models::molecule::Molecule;
use crate::core::perception::aromaticity::perceive;
use crate::engine::config::ScaffoldConfig;
use crate::engine::enumeration::{enumerate_removals, prioritized_removals};
use crate::engine::error::EngineError;
use crate::engine::extraction;
use crate::engine::progress::ProgressReporter;
use crate::graph::IdentityFn;
use crate::graph::network::ScaffoldNetwork;
use crate::graph::tree::ScaffoldTree;

/// Entry point bundling every scaffold operation under one configuration.
///
/// The generator holds no state besides its immutable [`ScaffoldConfig`]; clone it
/// freely or build a new one to change options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldGenerator {
    config: ScaffoldConfig,
}

impl ScaffoldGenerator {
    pub fn new(config: ScaffoldConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Parses a SMILES string and perceives aromaticity when configured.
    pub fn parse_smiles(&self, smiles: &str) -> Result<Molecule, EngineError> {
        Ok(self.prepare(parse(smiles)?))
    }

    /// Readies an already parsed molecule, perceiving aromaticity when configured.
    pub fn prepare(&self, mut molecule: Molecule) -> Molecule {
        if self.config.determine_aromaticity {
            perceive(&mut molecule, &self.config.aromaticity_model);
        }
        molecule
    }

    /// The canonical identity of a molecule under the configured flavor.
    pub fn identity(&self, molecule: &Molecule) -> String {
        canonical_smiles(molecule, &self.config.smiles_flavor)
    }

    pub fn identity_fn(&self) -> IdentityFn<Molecule> {
        super::network::identity_fn(&self.config)
    }

    pub fn get_scaffold(&self, molecule: &Molecule, saturate: bool) -> Molecule {
        extraction::get_scaffold(molecule, &self.config, saturate)
    }

    pub fn get_rings(&self, molecule: &Molecule, saturate: bool) -> Vec<Molecule> {
        extraction::get_rings(molecule, &self.config, saturate)
    }

    pub fn get_linkers(&self, molecule: &Molecule, saturate: bool) -> Vec<Molecule> {
        extraction::get_linkers(molecule, &self.config, saturate)
    }

    pub fn get_side_chains(&self, molecule: &Molecule, saturate: bool) -> Vec<Molecule> {
        extraction::get_side_chains(molecule, &self.config, saturate)
    }

    /// Every scaffold reachable by ring removal, the molecule's scaffold first.
    pub fn apply_enumerative_removal(&self, molecule: &Molecule) -> Vec<Molecule> {
        let scaffold = self.get_scaffold(molecule, true);
        enumerate_removals(scaffold, &self.config)
            .scaffolds
            .into_iter()
            .map(|s| s.molecule)
            .collect()
    }

    /// The chain of scaffolds chosen by the prioritization rules, largest first.
    pub fn apply_schuffenhauer_rules(&self, molecule: &Molecule) -> Vec<Molecule> {
        let scaffold = self.get_scaffold(molecule, true);
        prioritized_removals(scaffold, &self.config)
            .into_iter()
            .map(|s| s.molecule)
            .collect()
    }

    pub fn generate_scaffold_network(
        &self,
        molecules: &[Molecule],
        reporter: &ProgressReporter,
    ) -> Result<ScaffoldNetwork<Molecule>, EngineError> {
        super::network::run(molecules, &self.config, reporter)
    }

    pub fn generate_schuffenhauer_forest(
        &self,
        molecules: &[Molecule],
        reporter: &ProgressReporter,
    ) -> Result<Vec<ScaffoldTree<Molecule>>, EngineError> {
        super::tree::run_forest(molecules, &self.config, reporter)
    }

    pub fn generate_schuffenhauer_tree(
        &self,
        molecules: &[Molecule],
        reporter: &ProgressReporter,
    ) -> Result<ScaffoldTree<Molecule>, EngineError> {
        super::tree::run(molecules, &self.config, reporter)
    }
}
