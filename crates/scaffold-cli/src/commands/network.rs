use super::{export_matrix, load_inputs, write_levels};
use crate::cli::GraphArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use scaffoldpp::core::models::molecule::Molecule;
use scaffoldpp::engine::progress::ProgressReporter;
use scaffoldpp::graph::ScaffoldGraph;
use scaffoldpp::graph::network::ScaffoldNetwork;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: &GraphArgs, progress: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let network = build(args, &reporter)?;

    let stdout = io::stdout();
    write_report(&network, &mut stdout.lock())?;

    if let Some(path) = &args.matrix_csv {
        export_matrix(&network, path)?;
        println!("✓ Adjacency matrix written to: {}", path.display());
    }
    Ok(())
}

fn build(args: &GraphArgs, reporter: &ProgressReporter) -> Result<ScaffoldNetwork<Molecule>> {
    let (generator, inputs) = load_inputs(&args.input)?;
    let molecules: Vec<Molecule> = inputs.into_iter().map(|i| i.molecule).collect();

    info!("Invoking the scaffold network workflow...");
    Ok(generator.generate_scaffold_network(&molecules, reporter)?)
}

fn write_report(network: &ScaffoldNetwork<Molecule>, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Scaffold network: {} scaffolds, {} roots, max level {}",
        network.node_count(),
        network.roots().len(),
        network.max_level()
    )?;
    write_levels(network, out)
}
