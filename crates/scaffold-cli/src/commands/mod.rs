pub mod chain;
pub mod extract;
pub mod network;
pub mod tree;

use crate::cli::InputArgs;
use crate::config::PartialScaffoldConfig;
use crate::error::{CliError, Result};
use scaffoldpp::core::io::smi::SmiFile;
use scaffoldpp::core::io::traits::MolecularFile;
use scaffoldpp::core::models::molecule::Molecule;
use scaffoldpp::graph::ScaffoldGraph;
use scaffoldpp::graph::node::ScaffoldNode;
use scaffoldpp::workflows::generator::ScaffoldGenerator;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// One molecule of the input file, prepared for the scaffold engine.
pub struct InputMolecule {
    pub name: String,
    pub molecule: Molecule,
}

/// Resolves the configuration and reads every molecule of the input file.
pub fn load_inputs(args: &InputArgs) -> Result<(ScaffoldGenerator, Vec<InputMolecule>)> {
    info!("Merging configuration from file and CLI arguments...");
    let config = PartialScaffoldConfig::load(args)?.merge_with_cli(args)?;
    let generator = ScaffoldGenerator::new(config);

    info!("Loading molecules from {:?}", &args.input);
    let records = SmiFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;
    info!("Read {} molecule(s).", records.len());

    let inputs = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| InputMolecule {
            name: record.display_name(index),
            molecule: generator.prepare(record.molecule),
        })
        .collect();
    Ok((generator, inputs))
}

/// Writes the identity of every node, grouped by level, smallest scaffolds first.
pub fn write_levels<G>(graph: &G, out: &mut impl Write) -> Result<()>
where
    G: ScaffoldGraph,
{
    for level in 0..=graph.max_level() {
        let ids = graph.all_nodes_on_level(level);
        if ids.is_empty() {
            continue;
        }
        writeln!(out, "Level {} ({} scaffolds)", level, ids.len())?;
        for node in ids.iter().filter_map(|&id| graph.node(id)) {
            writeln!(
                out,
                "  {}\torigins={} non-virtual={} children={}",
                node.identity(),
                node.origin_count(),
                node.non_virtual_origin_count(),
                node.children().len()
            )?;
        }
    }
    Ok(())
}

/// Writes the adjacency matrix of a graph to a CSV file.
pub fn export_matrix<G>(graph: &G, path: &Path) -> Result<()>
where
    G: ScaffoldGraph,
{
    info!("Writing adjacency matrix to {:?}", path);
    let file = File::create(path)?;
    graph
        .write_matrix_csv(BufWriter::new(file))
        .map_err(|source| CliError::MatrixExport {
            path: path.to_path_buf(),
            source,
        })
}

/// `base` itself for a single output, otherwise `stem_<n>.ext` per output.
pub fn numbered_output_path(base: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("matrix");
    let file_name = match base.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, index, ext),
        None => format!("{}_{}", stem, index),
    };
    base.with_file_name(file_name)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::cli::{Cli, Commands, InputArgs};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub const BENZODIAZEPINES: &str = "\
CN1C(=O)CN=C(C2=C1C=CC(=C2)Cl)C3=CC=CC=C3 diazepam
C1C(=O)NC2=C(C=C(C=C2)Br)C(=N1)C3=CC=CC=N3 bromazepam
CC1=NN(C2=C1C(=NCC(=O)N2C)C3=CC=CC=C3F)C zolazepam
";

    pub fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("input.smi");
        fs::write(&path, content).unwrap();
        path
    }

    pub fn input_args(path: &std::path::Path) -> InputArgs {
        let path = path.to_str().unwrap();
        match Cli::parse_from(["scaffold", "enumerate", "-i", path]).command {
            Commands::Enumerate(chain) => chain.input,
            other => panic!("Expected 'enumerate' subcommand, got {other:?}"),
        }
    }
}
