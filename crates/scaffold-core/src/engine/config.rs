use crate::core::canon::SmilesFlavor;
use crate::core::perception::aromaticity::AromaticityModel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Unsupported SMILES flavor: {0}")]
    UnsupportedFlavor(&'static str),
}

/// The abstraction level used when a scaffold is extracted from a molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaffoldMode {
    /// Rings and linkers plus atoms attached to them by a multiple bond.
    #[default]
    Scaffold,
    /// Rings and linkers only (Bemis-Murcko framework).
    MurckoFramework,
    /// Murcko framework with every bond reduced to a single bond.
    ElementalWireFrame,
    /// Murcko framework with every atom turned into carbon.
    BasicFramework,
    /// Murcko framework with carbon atoms and single bonds only.
    BasicWireFrame,
}

impl ScaffoldMode {
    /// Whether exocyclic and exolinker multiply-bonded atoms belong to the scaffold.
    pub fn keeps_exocyclic_atoms(self) -> bool {
        matches!(self, ScaffoldMode::Scaffold)
    }

    pub fn reduces_bond_orders(self) -> bool {
        matches!(
            self,
            ScaffoldMode::ElementalWireFrame | ScaffoldMode::BasicWireFrame
        )
    }

    pub fn converts_to_carbon(self) -> bool {
        matches!(
            self,
            ScaffoldMode::BasicFramework | ScaffoldMode::BasicWireFrame
        )
    }
}

/// Immutable options of the scaffold engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScaffoldConfig {
    pub scaffold_mode: ScaffoldMode,
    /// Restore double bonds after ring removal only where the bond was aromatic.
    pub retain_only_hybridisations_at_aromatic_bonds: bool,
    /// Re-perceive aromaticity on parsed molecules and every produced fragment.
    pub determine_aromaticity: bool,
    pub aromaticity_model: AromaticityModel,
    /// Enable the aromatic ring-system rule of the prioritization cascade.
    pub apply_rule_seven: bool,
    /// Flavor of the canonical SMILES used as scaffold identity.
    pub smiles_flavor: SmilesFlavor,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            scaffold_mode: ScaffoldMode::default(),
            retain_only_hybridisations_at_aromatic_bonds: false,
            determine_aromaticity: true,
            aromaticity_model: AromaticityModel::default(),
            apply_rule_seven: true,
            smiles_flavor: SmilesFlavor::default(),
        }
    }
}

impl ScaffoldConfig {
    pub fn builder() -> ScaffoldConfigBuilder {
        ScaffoldConfigBuilder::new()
    }
}

/// Builder for [`ScaffoldConfig`]; unset options take their default values.
#[derive(Default)]
pub struct ScaffoldConfigBuilder {
    scaffold_mode: Option<ScaffoldMode>,
    retain_only_hybridisations_at_aromatic_bonds: Option<bool>,
    determine_aromaticity: Option<bool>,
    aromaticity_model: Option<AromaticityModel>,
    apply_rule_seven: Option<bool>,
    smiles_flavor: Option<SmilesFlavor>,
}

impl ScaffoldConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scaffold_mode(mut self, mode: ScaffoldMode) -> Self {
        self.scaffold_mode = Some(mode);
        self
    }
    pub fn retain_only_hybridisations_at_aromatic_bonds(mut self, retain: bool) -> Self {
        self.retain_only_hybridisations_at_aromatic_bonds = Some(retain);
        self
    }
    pub fn determine_aromaticity(mut self, determine: bool) -> Self {
        self.determine_aromaticity = Some(determine);
        self
    }
    pub fn aromaticity_model(mut self, model: AromaticityModel) -> Self {
        self.aromaticity_model = Some(model);
        self
    }
    pub fn apply_rule_seven(mut self, apply: bool) -> Self {
        self.apply_rule_seven = Some(apply);
        self
    }
    pub fn smiles_flavor(mut self, flavor: SmilesFlavor) -> Self {
        self.smiles_flavor = Some(flavor);
        self
    }

    pub fn build(self) -> Result<ScaffoldConfig, ConfigError> {
        let defaults = ScaffoldConfig::default();
        let smiles_flavor = self.smiles_flavor.unwrap_or(defaults.smiles_flavor);
        if smiles_flavor.stereo {
            return Err(ConfigError::UnsupportedFlavor("stereo"));
        }
        Ok(ScaffoldConfig {
            scaffold_mode: self.scaffold_mode.unwrap_or(defaults.scaffold_mode),
            retain_only_hybridisations_at_aromatic_bonds: self
                .retain_only_hybridisations_at_aromatic_bonds
                .unwrap_or(defaults.retain_only_hybridisations_at_aromatic_bonds),
            determine_aromaticity: self
                .determine_aromaticity
                .unwrap_or(defaults.determine_aromaticity),
            aromaticity_model: self.aromaticity_model.unwrap_or(defaults.aromaticity_model),
            apply_rule_seven: self.apply_rule_seven.unwrap_or(defaults.apply_rule_seven),
            smiles_flavor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::perception::aromaticity::{CycleSet, ElectronDonation};

    #[test]
    fn defaults_match_documented_values() {
        let config = ScaffoldConfig::default();
        assert_eq!(config.scaffold_mode, ScaffoldMode::Scaffold);
        assert!(!config.retain_only_hybridisations_at_aromatic_bonds);
        assert!(config.determine_aromaticity);
        assert!(config.apply_rule_seven);
        assert_eq!(
            config.aromaticity_model,
            AromaticityModel::new(ElectronDonation::Cdk, CycleSet::CdkAromaticSet)
        );
        assert_eq!(config.smiles_flavor, SmilesFlavor::UNIQUE_AROMATIC);
    }

    #[test]
    fn builder_without_options_yields_defaults() {
        assert_eq!(
            ScaffoldConfigBuilder::new().build().unwrap(),
            ScaffoldConfig::default()
        );
    }

    #[test]
    fn builder_applies_overrides() {
        let config = ScaffoldConfig::builder()
            .scaffold_mode(ScaffoldMode::BasicWireFrame)
            .apply_rule_seven(false)
            .smiles_flavor(SmilesFlavor::UNIQUE)
            .build()
            .unwrap();
        assert_eq!(config.scaffold_mode, ScaffoldMode::BasicWireFrame);
        assert!(!config.apply_rule_seven);
        assert!(!config.smiles_flavor.aromatic_symbols);
    }

    #[test]
    fn builder_rejects_stereo_flavors() {
        let result = ScaffoldConfig::builder()
            .smiles_flavor(SmilesFlavor {
                aromatic_symbols: true,
                stereo: true,
            })
            .build();
        assert_eq!(result, Err(ConfigError::UnsupportedFlavor("stereo")));
    }

    #[test]
    fn mode_flags_describe_each_abstraction() {
        assert!(ScaffoldMode::Scaffold.keeps_exocyclic_atoms());
        assert!(!ScaffoldMode::MurckoFramework.keeps_exocyclic_atoms());
        assert!(ScaffoldMode::ElementalWireFrame.reduces_bond_orders());
        assert!(!ScaffoldMode::ElementalWireFrame.converts_to_carbon());
        assert!(ScaffoldMode::BasicFramework.converts_to_carbon());
        assert!(!ScaffoldMode::BasicFramework.reduces_bond_orders());
        assert!(ScaffoldMode::BasicWireFrame.converts_to_carbon());
        assert!(ScaffoldMode::BasicWireFrame.reduces_bond_orders());
    }
}
