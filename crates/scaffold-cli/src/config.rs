use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use scaffoldpp::core::canon::SmilesFlavor;
use scaffoldpp::core::perception::aromaticity::{AromaticityModel, CycleSet, ElectronDonation};
use scaffoldpp::engine::config::{ScaffoldConfig, ScaffoldConfigBuilder, ScaffoldMode};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialScaffoldSection {
    mode: Option<ScaffoldMode>,
    retain_only_hybridisations_at_aromatic_bonds: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAromaticitySection {
    determine: Option<bool>,
    electron_donation: Option<ElectronDonation>,
    cycle_set: Option<CycleSet>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPrioritizationSection {
    apply_rule_seven: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSmilesSection {
    aromatic_symbols: Option<bool>,
    stereo: Option<bool>,
}

/// Scaffold options as read from a TOML file; every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialScaffoldConfig {
    scaffold: Option<PartialScaffoldSection>,
    aromaticity: Option<PartialAromaticitySection>,
    prioritization: Option<PartialPrioritizationSection>,
    smiles: Option<PartialSmilesSection>,
}

impl PartialScaffoldConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn load(args: &InputArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration.
    ///
    /// Command-line flags win over `--set` values, which win over the file; anything
    /// left unset takes the library default.
    pub fn merge_with_cli(mut self, args: &InputArgs) -> Result<ScaffoldConfig> {
        self.apply_set_values(&args.set_values)?;

        let scaffold = self.scaffold.take().unwrap_or_default();
        let aromaticity = self.aromaticity.take().unwrap_or_default();
        let prioritization = self.prioritization.take().unwrap_or_default();
        let smiles = self.smiles.take().unwrap_or_default();
        let defaults = ScaffoldConfig::default();

        let mut builder = ScaffoldConfigBuilder::new();
        if let Some(mode) = args.mode.map(ScaffoldMode::from).or(scaffold.mode) {
            builder = builder.scaffold_mode(mode);
        }
        if args.aromatic_hybridisations_only {
            builder = builder.retain_only_hybridisations_at_aromatic_bonds(true);
        } else if let Some(retain) = scaffold.retain_only_hybridisations_at_aromatic_bonds {
            builder = builder.retain_only_hybridisations_at_aromatic_bonds(retain);
        }
        if args.no_rule_seven {
            builder = builder.apply_rule_seven(false);
        } else if let Some(apply) = prioritization.apply_rule_seven {
            builder = builder.apply_rule_seven(apply);
        }
        if args.no_aromaticity {
            builder = builder.determine_aromaticity(false);
        } else if let Some(determine) = aromaticity.determine {
            builder = builder.determine_aromaticity(determine);
        }

        builder = builder.aromaticity_model(AromaticityModel::new(
            aromaticity
                .electron_donation
                .unwrap_or(defaults.aromaticity_model.electron_donation),
            aromaticity
                .cycle_set
                .unwrap_or(defaults.aromaticity_model.cycle_set),
        ));

        let aromatic_symbols = if args.kekule {
            false
        } else {
            smiles
                .aromatic_symbols
                .unwrap_or(defaults.smiles_flavor.aromatic_symbols)
        };
        builder = builder.smiles_flavor(SmilesFlavor {
            aromatic_symbols,
            stereo: smiles.stereo.unwrap_or(defaults.smiles_flavor.stereo),
        });

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "scaffold.mode" => {
                    self.scaffold.get_or_insert_with(Default::default).mode =
                        Some(parse_enum(key, value)?);
                }
                "scaffold.retain-only-hybridisations-at-aromatic-bonds" => {
                    self.scaffold
                        .get_or_insert_with(Default::default)
                        .retain_only_hybridisations_at_aromatic_bonds =
                        Some(parse_bool(key, value)?);
                }
                "aromaticity.determine" => {
                    self.aromaticity
                        .get_or_insert_with(Default::default)
                        .determine = Some(parse_bool(key, value)?);
                }
                "aromaticity.electron-donation" => {
                    self.aromaticity
                        .get_or_insert_with(Default::default)
                        .electron_donation = Some(parse_enum(key, value)?);
                }
                "aromaticity.cycle-set" => {
                    self.aromaticity
                        .get_or_insert_with(Default::default)
                        .cycle_set = Some(parse_enum(key, value)?);
                }
                "prioritization.apply-rule-seven" => {
                    self.prioritization
                        .get_or_insert_with(Default::default)
                        .apply_rule_seven = Some(parse_bool(key, value)?);
                }
                "smiles.aromatic-symbols" => {
                    self.smiles
                        .get_or_insert_with(Default::default)
                        .aromatic_symbols = Some(parse_bool(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid boolean value for {}: {}", key, value)))
}

fn parse_enum<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    T::deserialize(value.into_deserializer()).map_err(|e: serde::de::value::Error| {
        CliError::Config(format!("Invalid value for {}: {} ({})", key, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("scaffold.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn input_args(extra: &[&str]) -> InputArgs {
        let mut args = vec!["scaffold", "enumerate", "-i", "in.smi"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Enumerate(chain) => chain.input,
            other => panic!("Expected 'enumerate' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn missing_config_file_yields_library_defaults() {
        let args = input_args(&[]);
        let config = PartialScaffoldConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert_eq!(config, ScaffoldConfig::default());
    }

    #[test]
    fn file_values_are_applied() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [scaffold]
            mode = "murcko-framework"
            retain-only-hybridisations-at-aromatic-bonds = true

            [aromaticity]
            electron-donation = "pi-bonds"
            cycle-set = "sssr"

            [prioritization]
            apply-rule-seven = false

            [smiles]
            aromatic-symbols = false
            "#,
        );
        let path_str = path.to_str().unwrap();
        let args = input_args(&["-c", path_str]);

        let config = PartialScaffoldConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.scaffold_mode, ScaffoldMode::MurckoFramework);
        assert!(config.retain_only_hybridisations_at_aromatic_bonds);
        assert_eq!(
            config.aromaticity_model,
            AromaticityModel::new(ElectronDonation::PiBonds, CycleSet::Sssr)
        );
        assert!(!config.apply_rule_seven);
        assert_eq!(config.smiles_flavor, SmilesFlavor::UNIQUE);
        assert!(config.determine_aromaticity);
    }

    #[test]
    fn cli_args_override_file_and_set_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [scaffold]
            mode = "murcko-framework"

            [prioritization]
            apply-rule-seven = true
            "#,
        );
        let path_str = path.to_str().unwrap();
        let args = input_args(&[
            "-c",
            path_str,
            "--mode",
            "basic-framework",
            "--no-rule-seven",
            "-S",
            "scaffold.mode=elemental-wire-frame",
            "-S",
            "aromaticity.determine=false",
        ]);

        let config = PartialScaffoldConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.scaffold_mode, ScaffoldMode::BasicFramework);
        assert!(!config.apply_rule_seven);
        assert!(!config.determine_aromaticity);
    }

    #[test]
    fn set_value_overrides_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[smiles]\naromatic-symbols = true\n");
        let path_str = path.to_str().unwrap();
        let args = input_args(&["-c", path_str, "-S", "smiles.aromatic-symbols=false"]);

        let config = PartialScaffoldConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();
        assert!(!config.smiles_flavor.aromatic_symbols);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[scaffold]\nsize = 3\n");
        let result = PartialScaffoldConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn stereo_flavor_is_a_configuration_error() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[smiles]\nstereo = true\n");
        let path_str = path.to_str().unwrap();
        let args = input_args(&["-c", path_str]);

        let result = PartialScaffoldConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args);
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("stereo")),
            other => panic!("Expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["scaffold.mode", "scaffold.mode=ring", "smiles.stereo=true", "aromaticity.determine=maybe"] {
            let args = input_args(&["-S", bad]);
            let result = PartialScaffoldConfig::default().merge_with_cli(&args);
            assert!(matches!(result, Err(CliError::Config(_))), "accepted {bad}");
        }
    }
}
