use clap::{Args, Parser, Subcommand, ValueEnum};
use scaffoldpp::engine::config::ScaffoldMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "Scaffold++ CLI - Dissect small molecules into scaffolds, Schuffenhauer trees and scaffold networks.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the scaffold, rings, linkers and side chains of every molecule.
    Extract(ExtractArgs),
    /// Print every scaffold reachable by ring removal from each molecule.
    Enumerate(ChainArgs),
    /// Print the chain of scaffolds selected by the Schuffenhauer rules.
    Prioritize(ChainArgs),
    /// Build the scaffold network of all molecules.
    Network(GraphArgs),
    /// Build Schuffenhauer trees, one per distinct root scaffold.
    Tree(TreeArgs),
}

/// Input file and scaffold options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the input SMILES file (one `SMILES [name]` entry per line).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the scaffold abstraction mode.
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Restore double bonds after ring removal only where the bond was aromatic.
    #[arg(long)]
    pub aromatic_hybridisations_only: bool,

    /// Disable the aromatic ring-system rule of the prioritization cascade.
    #[arg(long)]
    pub no_rule_seven: bool,

    /// Skip aromaticity perception on inputs and fragments.
    #[arg(long)]
    pub no_aromaticity: bool,

    /// Write identities in Kekulé form instead of with aromatic symbols.
    #[arg(long)]
    pub kekule: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scaffold.mode=murcko-framework
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Leave fragment atoms unsaturated instead of filling open valences with hydrogens.
    #[arg(long)]
    pub unsaturated: bool,
}

/// Arguments for the `enumerate` and `prioritize` subcommands.
#[derive(Args, Debug)]
pub struct ChainArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the `network` subcommand.
#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the adjacency matrix of the graph as CSV.
    #[arg(long, value_name = "PATH")]
    pub matrix_csv: Option<PathBuf>,
}

/// Arguments for the `tree` subcommand.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Fail unless all molecules share one root scaffold.
    #[arg(long)]
    pub single: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Scaffold,
    MurckoFramework,
    ElementalWireFrame,
    BasicFramework,
    BasicWireFrame,
}

impl From<ModeArg> for ScaffoldMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Scaffold => ScaffoldMode::Scaffold,
            ModeArg::MurckoFramework => ScaffoldMode::MurckoFramework,
            ModeArg::ElementalWireFrame => ScaffoldMode::ElementalWireFrame,
            ModeArg::BasicFramework => ScaffoldMode::BasicFramework,
            ModeArg::BasicWireFrame => ScaffoldMode::BasicWireFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_the_subcommand() {
        let cli = Cli::parse_from(["scaffold", "network", "-i", "in.smi", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        match cli.command {
            Commands::Network(args) => {
                assert_eq!(args.input.input, PathBuf::from("in.smi"));
                assert!(args.matrix_csv.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_mode_and_overrides() {
        let cli = Cli::parse_from([
            "scaffold",
            "tree",
            "-i",
            "in.smi",
            "--mode",
            "basic-wire-frame",
            "--no-rule-seven",
            "--single",
            "-S",
            "smiles.aromatic-symbols=false",
        ]);
        match cli.command {
            Commands::Tree(args) => {
                let input = &args.graph.input;
                assert_eq!(input.mode, Some(ModeArg::BasicWireFrame));
                assert!(input.no_rule_seven);
                assert!(args.single);
                assert_eq!(input.set_values, vec!["smiles.aromatic-symbols=false"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["scaffold", "extract", "-i", "in.smi", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["scaffold", "enumerate"]).is_err());
    }
}
