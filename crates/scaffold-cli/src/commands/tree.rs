use super::{export_matrix, load_inputs, numbered_output_path, write_levels};
use crate::cli::TreeArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use scaffoldpp::core::models::molecule::Molecule;
use scaffoldpp::engine::progress::ProgressReporter;
use scaffoldpp::graph::ScaffoldGraph;
use scaffoldpp::graph::node::ScaffoldNode;
use scaffoldpp::graph::tree::ScaffoldTree;
use std::io::{self, Write};
use tracing::{info, warn};

pub fn run(args: &TreeArgs, progress: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let forest = build(args, &reporter)?;

    if forest.is_empty() {
        warn!("No molecule contained a ring; no tree was built.");
    }

    let stdout = io::stdout();
    write_report(&forest, &mut stdout.lock())?;

    if let Some(base) = &args.graph.matrix_csv {
        for (i, tree) in forest.iter().enumerate() {
            let path = numbered_output_path(base, i + 1, forest.len());
            export_matrix(tree, &path)?;
            println!("✓ Adjacency matrix of tree {} written to: {}", i + 1, path.display());
        }
    }
    Ok(())
}

fn build(args: &TreeArgs, reporter: &ProgressReporter) -> Result<Vec<ScaffoldTree<Molecule>>> {
    let (generator, inputs) = load_inputs(&args.graph.input)?;
    let molecules: Vec<Molecule> = inputs.into_iter().map(|i| i.molecule).collect();

    if args.single {
        info!("Invoking the single Schuffenhauer tree workflow...");
        let tree = generator.generate_schuffenhauer_tree(&molecules, reporter)?;
        return Ok(vec![tree]);
    }
    info!("Invoking the Schuffenhauer forest workflow...");
    Ok(generator.generate_schuffenhauer_forest(&molecules, reporter)?)
}

fn write_report(forest: &[ScaffoldTree<Molecule>], out: &mut impl Write) -> Result<()> {
    for (i, tree) in forest.iter().enumerate() {
        let root = tree.root_node()?;
        writeln!(
            out,
            "Tree {}: root {}, {} scaffolds, max level {}",
            i + 1,
            root.identity(),
            tree.node_count(),
            tree.max_level()
        )?;
        write_levels(tree, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::test_support::{BENZODIAZEPINES, write_input};
    use crate::error::CliError;
    use clap::Parser;
    use scaffoldpp::engine::error::EngineError;
    use std::path::Path;
    use tempfile::tempdir;

    const FLUCLOXACILLIN: &str =
        "CC1=C(C(=NO1)C2=C(C=CC=C2Cl)F)C(=O)NC3C4N(C3=O)C(C(S4)(C)C)C(=O)O flucloxacillin\n";

    fn tree_args(input: &Path, extra: &[&str]) -> TreeArgs {
        let mut argv = vec!["scaffold", "tree", "-i", input.to_str().unwrap()];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Tree(args) => args,
            other => panic!("Expected 'tree' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn benzodiazepines_share_one_tree() {
        let dir = tempdir().unwrap();
        let args = tree_args(&write_input(&dir, BENZODIAZEPINES), &["--single"]);
        let forest = build(&args, &ProgressReporter::new()).unwrap();

        let mut out = Vec::new();
        write_report(&forest, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(forest.len(), 1);
        assert!(text.starts_with("Tree 1: root "));
        assert!(text.contains(", 6 scaffolds, max level 2\n"));
        assert!(text.contains("Level 0 (1 scaffolds)"));
    }

    #[test]
    fn different_roots_need_the_forest() {
        let dir = tempdir().unwrap();
        let content = format!("{}{}", BENZODIAZEPINES, FLUCLOXACILLIN);
        let input = write_input(&dir, &content);

        let forest = build(&tree_args(&input, &[]), &ProgressReporter::new()).unwrap();
        assert_eq!(forest.len(), 2);

        let result = build(&tree_args(&input, &["--single"]), &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(CliError::ScaffoldCore(EngineError::MultipleRoots { count: 2, .. }))
        ));
    }

    #[test]
    fn one_matrix_file_per_tree() {
        let dir = tempdir().unwrap();
        let content = format!("{}{}", BENZODIAZEPINES, FLUCLOXACILLIN);
        let input = write_input(&dir, &content);
        let base = dir.path().join("tree.csv");
        let args = tree_args(&input, &["--matrix-csv", base.to_str().unwrap()]);

        run(&args, &CliProgressHandler::hidden()).unwrap();

        let first = std::fs::read_to_string(dir.path().join("tree_1.csv")).unwrap();
        let second = std::fs::read_to_string(dir.path().join("tree_2.csv")).unwrap();
        assert_eq!(first.lines().count(), 7);
        assert_eq!(second.lines().count(), 5);
        assert!(!base.exists());
    }
}
