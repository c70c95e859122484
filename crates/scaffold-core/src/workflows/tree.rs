use super::network::identity_fn;
use crate::core::canon::canonical_smiles;
use crate::core::models::molecule::Molecule;
use crate::engine::config::ScaffoldConfig;
use crate::engine::enumeration::{IdentifiedScaffold, prioritized_removals};
use crate::engine::error::EngineError;
use crate::engine::extraction::get_scaffold;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::graph::node::ScaffoldNode;
use crate::graph::tree::ScaffoldTree;
use tracing::{debug, info, instrument, warn};

/// Builds one Schuffenhauer tree per distinct root scaffold.
///
/// Each molecule contributes the chain of scaffolds chosen by the prioritization
/// rules. Chains ending in the same root are merged into one tree; a new root
/// starts a new tree. Molecules without rings are skipped.
#[instrument(skip_all, name = "schuffenhauer_forest_workflow")]
pub fn run_forest(
    molecules: &[Molecule],
    config: &ScaffoldConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ScaffoldTree<Molecule>>, EngineError> {
    let mut forest: Vec<ScaffoldTree<Molecule>> = Vec::new();

    reporter.report(Progress::PhaseStart {
        name: "Schuffenhauer Forest",
    });
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    for (index, molecule) in molecules.iter().enumerate() {
        if let Some(tree) = chain_tree(molecule, index, config)? {
            let merged = forest.iter_mut().any(|existing| existing.merge_tree(&tree));
            if !merged {
                debug!(molecule = index + 1, "Molecule starts a new tree.");
                forest.push(tree);
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(trees = forest.len(), "Schuffenhauer forest complete.");
    Ok(forest)
}

/// Builds the single Schuffenhauer tree of molecules that share one root.
///
/// # Errors
///
/// Returns [`EngineError::MultipleRoots`] when the molecules lead to different
/// roots and [`EngineError::EmptyMolecule`] when no molecule has a ring.
pub fn run(
    molecules: &[Molecule],
    config: &ScaffoldConfig,
    reporter: &ProgressReporter,
) -> Result<ScaffoldTree<Molecule>, EngineError> {
    let mut forest = run_forest(molecules, config, reporter)?;
    match forest.len() {
        0 => Err(EngineError::EmptyMolecule),
        1 => Ok(forest.remove(0)),
        count => {
            let roots = forest
                .iter()
                .filter_map(|tree| tree.root_node().ok())
                .map(|node| node.identity().to_string())
                .collect();
            Err(EngineError::MultipleRoots { count, roots })
        }
    }
}

/// The tree of a single molecule: its prioritized chain, root first.
fn chain_tree(
    molecule: &Molecule,
    index: usize,
    config: &ScaffoldConfig,
) -> Result<Option<ScaffoldTree<Molecule>>, EngineError> {
    let scaffold = get_scaffold(molecule, config, true);
    if scaffold.is_empty() {
        warn!(molecule = index + 1, "Molecule has no ring; skipping.");
        return Ok(None);
    }
    let origin = canonical_smiles(molecule, &config.smiles_flavor);
    let chain = prioritized_removals(scaffold, config);

    let mut tree = ScaffoldTree::new(identity_fn(config));
    let mut parent = None;
    for (position, IdentifiedScaffold { molecule: step, .. }) in chain.into_iter().enumerate().rev() {
        let id = match parent {
            Some(parent) => tree.add_child(parent, step)?,
            None => tree.add_node(step)?,
        };
        if position == 0 {
            tree.add_non_virtual_origin_smiles(id, &origin)?;
        } else {
            tree.add_origin_smiles(id, &origin)?;
        }
        parent = Some(id);
    }
    Ok(Some(tree))
}
