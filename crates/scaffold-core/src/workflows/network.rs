use crate::core::canon::canonical_smiles;
use crate::core::models::molecule::Molecule;
use crate::engine::config::ScaffoldConfig;
use crate::engine::enumeration::enumerate_removals;
use crate::engine::error::EngineError;
use crate::engine::extraction::get_scaffold;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::graph::network::ScaffoldNetwork;
use crate::graph::{IdentityFn, NodeId, ScaffoldGraph};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The identity function of graphs built under `config`.
pub fn identity_fn(config: &ScaffoldConfig) -> IdentityFn<Molecule> {
    let flavor = config.smiles_flavor;
    Arc::new(move |molecule: &Molecule| canonical_smiles(molecule, &flavor))
}

/// Builds the scaffold network of a set of molecules.
///
/// Every scaffold reachable by removing rings from a molecule's scaffold becomes a
/// node, linked below each scaffold it was derived from. The molecule is recorded
/// as a non-virtual origin of its own scaffold and as a virtual origin of every
/// smaller one. Molecules without rings are skipped.
#[instrument(skip_all, name = "scaffold_network_workflow")]
pub fn run(
    molecules: &[Molecule],
    config: &ScaffoldConfig,
    reporter: &ProgressReporter,
) -> Result<ScaffoldNetwork<Molecule>, EngineError> {
    let mut network = ScaffoldNetwork::new(identity_fn(config));

    reporter.report(Progress::PhaseStart {
        name: "Scaffold Network",
    });
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    for (index, molecule) in molecules.iter().enumerate() {
        add_molecule(&mut network, molecule, index, config)?;
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        nodes = network.node_count(),
        roots = network.roots().len(),
        max_level = network.max_level(),
        "Scaffold network complete."
    );
    Ok(network)
}

fn add_molecule(
    network: &mut ScaffoldNetwork<Molecule>,
    molecule: &Molecule,
    index: usize,
    config: &ScaffoldConfig,
) -> Result<(), EngineError> {
    let scaffold = get_scaffold(molecule, config, true);
    if scaffold.is_empty() {
        warn!(molecule = index + 1, "Molecule has no ring; skipping.");
        return Ok(());
    }
    let origin = canonical_smiles(molecule, &config.smiles_flavor);
    let enumeration = enumerate_removals(scaffold, config);

    let mut ids: Vec<NodeId> = Vec::with_capacity(enumeration.scaffolds.len());
    for (position, entry) in enumeration.scaffolds.into_iter().enumerate() {
        let id = network.add_node(entry.molecule)?;
        if position == 0 {
            network.add_non_virtual_origin_smiles(id, &origin)?;
        } else {
            network.add_origin_smiles(id, &origin)?;
        }
        ids.push(id);
    }
    for (child, parent) in enumeration.edges {
        network.add_edge(ids[parent], ids[child])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse;
    use crate::core::perception::aromaticity::perceive;
    use crate::graph::node::ScaffoldNode;
    use std::sync::Mutex;

    const BENZODIAZEPINES: [&str; 3] = [
        "CN1C(=O)CN=C(C2=C1C=CC(=C2)Cl)C3=CC=CC=C3",
        "C1C(=O)NC2=C(C=C(C=C2)Br)C(=N1)C3=CC=CC=N3",
        "CC1=NN(C2=C1C(=NCC(=O)N2C)C3=CC=CC=C3F)C",
    ];

    fn molecule(smiles: &str) -> Molecule {
        let mut mol = parse(smiles).unwrap();
        perceive(&mut mol, &ScaffoldConfig::default().aromaticity_model);
        mol
    }

    fn identity(smiles: &str) -> String {
        canonical_smiles(&molecule(smiles), &ScaffoldConfig::default().smiles_flavor)
    }

    fn level_identities(network: &ScaffoldNetwork<Molecule>, level: usize) -> Vec<String> {
        let mut ids: Vec<String> = network
            .all_nodes_on_level(level)
            .into_iter()
            .filter_map(|id| network.node(id))
            .map(|n| n.identity().to_string())
            .collect();
        ids.sort();
        ids
    }

    fn sorted(smiles: &[&str]) -> Vec<String> {
        let mut ids: Vec<String> = smiles.iter().map(|s| identity(s)).collect();
        ids.sort();
        ids
    }

    fn benzodiazepine_network() -> ScaffoldNetwork<Molecule> {
        let molecules: Vec<Molecule> = BENZODIAZEPINES.iter().map(|s| molecule(s)).collect();
        run(&molecules, &ScaffoldConfig::default(), &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn benzodiazepine_network_has_expected_levels() {
        let network = benzodiazepine_network();

        assert_eq!(network.node_count(), 11);
        assert_eq!(network.max_level(), 2);
        assert_eq!(
            level_identities(&network, 0),
            sorted(&["O=C1NC=CC=NC1", "c1ccccc1", "n1ccc[nH]1", "n1ccccc1"])
        );
        assert_eq!(
            level_identities(&network, 1),
            sorted(&[
                "O=C1NC=CC(=NC1)c2ncccc2",
                "O=C1Nc2ccccc2C=NC1",
                "O=C1NC=CC(=NC1)c2ccccc2",
                "O=C1Nc2[nH]ncc2C=NC1",
            ])
        );
        assert_eq!(level_identities(&network, 2).len(), 3);
        assert_eq!(network.roots().len(), 4);
    }

    #[test]
    fn benzene_is_a_virtual_scaffold_of_all_three_molecules() {
        let network = benzodiazepine_network();
        let benzene = network.get_node(&molecule("c1ccccc1")).unwrap();

        assert!(benzene.is_orphan());
        assert_eq!(benzene.origin_count(), 3);
        assert_eq!(benzene.non_virtual_origin_count(), 0);

        let mut children: Vec<String> = benzene
            .children()
            .iter()
            .filter_map(|&id| network.node(id))
            .map(|n| n.identity().to_string())
            .collect();
        children.sort();
        assert_eq!(
            children,
            sorted(&["O=C1Nc2ccccc2C=NC1", "O=C1NC=CC(=NC1)c2ccccc2"])
        );
    }

    #[test]
    fn input_scaffolds_have_their_molecule_as_non_virtual_origin() {
        let network = benzodiazepine_network();
        for id in network.all_nodes_on_level(2) {
            let node = network.node(id).unwrap();
            assert_eq!(node.non_virtual_origin_count(), 1);
            assert!(node.is_leaf());
        }
    }

    #[test]
    fn every_node_sits_above_its_parents() {
        let network = benzodiazepine_network();
        for node in network.all_nodes() {
            let highest_parent = node
                .parents()
                .iter()
                .map(|&p| network.node(p).unwrap().level())
                .max();
            match highest_parent {
                Some(level) => assert_eq!(node.level(), level + 1),
                None => assert_eq!(node.level(), 0),
            }
        }
    }

    #[test]
    fn acyclic_molecules_are_skipped() {
        let molecules = vec![molecule("CCO"), molecule("c1ccccc1")];
        let network = run(&molecules, &ScaffoldConfig::default(), &ProgressReporter::new()).unwrap();
        assert_eq!(network.node_count(), 1);
    }

    #[test]
    fn progress_is_reported_per_molecule() {
        let increments = Mutex::new(0u64);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                *increments.lock().unwrap() += 1;
            }
        }));
        let molecules: Vec<Molecule> = BENZODIAZEPINES.iter().map(|s| molecule(s)).collect();
        run(&molecules, &ScaffoldConfig::default(), &reporter).unwrap();
        drop(reporter);
        assert_eq!(increments.into_inner().unwrap(), 3);
    }
}
