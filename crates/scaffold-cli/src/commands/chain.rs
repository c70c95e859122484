use super::{InputMolecule, load_inputs};
use crate::cli::ChainArgs;
use crate::error::Result;
use scaffoldpp::core::models::molecule::Molecule;
use scaffoldpp::workflows::generator::ScaffoldGenerator;
use std::io::{self, Write};
use tracing::{info, warn};

/// How the scaffolds of one molecule are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    /// Every scaffold reachable by ring removal.
    Enumerative,
    /// The single chain chosen by the Schuffenhauer rules.
    Prioritized,
}

impl ChainKind {
    fn scaffolds(self, generator: &ScaffoldGenerator, molecule: &Molecule) -> Vec<Molecule> {
        match self {
            ChainKind::Enumerative => generator.apply_enumerative_removal(molecule),
            ChainKind::Prioritized => generator.apply_schuffenhauer_rules(molecule),
        }
    }
}

pub fn run(args: &ChainArgs, kind: ChainKind) -> Result<()> {
    let (generator, inputs) = load_inputs(&args.input)?;
    info!("Deriving {:?} scaffolds for {} molecule(s).", kind, inputs.len());
    let stdout = io::stdout();
    write_report(&generator, &inputs, kind, &mut stdout.lock())
}

fn write_report(
    generator: &ScaffoldGenerator,
    inputs: &[InputMolecule],
    kind: ChainKind,
    out: &mut impl Write,
) -> Result<()> {
    for input in inputs {
        let scaffolds = kind.scaffolds(generator, &input.molecule);
        if scaffolds.is_empty() {
            warn!("Molecule '{}' has no ring; skipping.", input.name);
        }
        writeln!(out, "{} ({} scaffolds)", input.name, scaffolds.len())?;
        for scaffold in &scaffolds {
            writeln!(
                out,
                "  {}\trings={}",
                generator.identity(scaffold),
                ring_count(scaffold)
            )?;
        }
    }
    Ok(())
}

/// Cyclomatic number of a connected scaffold.
fn ring_count(molecule: &Molecule) -> usize {
    (molecule.bond_count() + 1).saturating_sub(molecule.atom_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{input_args, write_input};
    use tempfile::tempdir;

    const FLUCLOXACILLIN: &str =
        "CC1=C(C(=NO1)C2=C(C=CC=C2Cl)F)C(=O)NC3C4N(C3=O)C(C(S4)(C)C)C(=O)O flucloxacillin\n";

    fn report(content: &str, kind: ChainKind) -> (ScaffoldGenerator, Vec<String>) {
        let dir = tempdir().unwrap();
        let path = write_input(&dir, content);
        let (generator, inputs) = load_inputs(&input_args(&path)).unwrap();
        let mut out = Vec::new();
        write_report(&generator, &inputs, kind, &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (generator, lines)
    }

    #[test]
    fn enumeration_lists_all_ring_removal_scaffolds() {
        let (_, lines) = report(FLUCLOXACILLIN, ChainKind::Enumerative);
        assert_eq!(lines[0], "flucloxacillin (10 scaffolds)");
        assert_eq!(lines.len(), 11);
        assert!(lines[1].ends_with("rings=4"));
    }

    #[test]
    fn prioritization_ends_at_the_beta_lactam() {
        let (generator, lines) = report(FLUCLOXACILLIN, ChainKind::Prioritized);
        let beta_lactam = generator.identity(&generator.parse_smiles("O=C1NCC1").unwrap());

        assert_eq!(lines[0], "flucloxacillin (4 scaffolds)");
        let rings: Vec<&str> = lines[1..]
            .iter()
            .filter_map(|l| l.rsplit('=').next())
            .collect();
        assert_eq!(rings, vec!["4", "3", "2", "1"]);
        assert_eq!(lines[4], format!("  {}\trings=1", beta_lactam));
    }

    #[test]
    fn acyclic_molecules_report_no_scaffolds() {
        let (_, lines) = report("CCO ethanol\n", ChainKind::Prioritized);
        assert_eq!(lines, vec!["ethanol (0 scaffolds)"]);
    }
}
