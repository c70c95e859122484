use super::{InputMolecule, load_inputs};
use crate::cli::ExtractArgs;
use crate::error::Result;
use scaffoldpp::core::models::molecule::Molecule;
use scaffoldpp::workflows::generator::ScaffoldGenerator;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: &ExtractArgs) -> Result<()> {
    let (generator, inputs) = load_inputs(&args.input)?;
    info!(
        "Extracting fragments with mode {:?}.",
        generator.config().scaffold_mode
    );
    let stdout = io::stdout();
    write_report(&generator, &inputs, !args.unsaturated, &mut stdout.lock())
}

fn write_report(
    generator: &ScaffoldGenerator,
    inputs: &[InputMolecule],
    saturate: bool,
    out: &mut impl Write,
) -> Result<()> {
    for input in inputs {
        let molecule = &input.molecule;
        let scaffold = generator.get_scaffold(molecule, saturate);

        writeln!(out, "{}", input.name)?;
        writeln!(out, "  scaffold:    {}", identity_or_dash(generator, &scaffold))?;
        writeln!(
            out,
            "  rings:       {}",
            joined(generator, &generator.get_rings(molecule, saturate))
        )?;
        writeln!(
            out,
            "  linkers:     {}",
            joined(generator, &generator.get_linkers(molecule, saturate))
        )?;
        writeln!(
            out,
            "  side chains: {}",
            joined(generator, &generator.get_side_chains(molecule, saturate))
        )?;
    }
    Ok(())
}

fn identity_or_dash(generator: &ScaffoldGenerator, molecule: &Molecule) -> String {
    if molecule.is_empty() {
        "-".to_string()
    } else {
        generator.identity(molecule)
    }
}

fn joined(generator: &ScaffoldGenerator, fragments: &[Molecule]) -> String {
    if fragments.is_empty() {
        return "-".to_string();
    }
    fragments
        .iter()
        .map(|f| generator.identity(f))
        .collect::<Vec<_>>()
        .join(" ")
}
