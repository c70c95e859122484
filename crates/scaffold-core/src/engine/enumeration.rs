//! Stepwise ring removal: exhaustive enumeration and the prioritized chain.

use super::config::ScaffoldConfig;
use super::removal::ring_removals;
use super::rules::select_removal;
use crate::core::canon::canonical_smiles;
use crate::core::models::molecule::Molecule;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// A scaffold together with its canonical identity.
#[derive(Debug, Clone)]
pub struct IdentifiedScaffold {
    pub molecule: Molecule,
    pub identity: String,
}

impl IdentifiedScaffold {
    pub fn new(molecule: Molecule, config: &ScaffoldConfig) -> Self {
        let identity = canonical_smiles(&molecule, &config.smiles_flavor);
        Self { molecule, identity }
    }
}

/// All scaffolds reachable by ring removal, with the removal edges between them.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// Distinct scaffolds in breadth-first order, the input scaffold first.
    pub scaffolds: Vec<IdentifiedScaffold>,
    /// `(child, parent)` index pairs: removing one ring of `child` gives `parent`.
    pub edges: Vec<(usize, usize)>,
}

/// Enumerates every scaffold obtainable by repeatedly removing removable rings.
///
/// The traversal is a breadth-first search keyed by canonical identity, so each
/// distinct scaffold appears once and larger scaffolds precede the smaller ones
/// derived from them. An empty input gives an empty enumeration.
pub fn enumerate_removals(scaffold: Molecule, config: &ScaffoldConfig) -> Enumeration {
    let mut enumeration = Enumeration::default();
    if scaffold.is_empty() {
        return enumeration;
    }

    let mut index_of: HashMap<String, usize> = HashMap::new();
    let root = IdentifiedScaffold::new(scaffold, config);
    index_of.insert(root.identity.clone(), 0);
    enumeration.scaffolds.push(root);

    let mut queue = VecDeque::from([0usize]);
    while let Some(child) = queue.pop_front() {
        let removals = ring_removals(&enumeration.scaffolds[child].molecule, config);
        trace!(
            scaffold = %enumeration.scaffolds[child].identity,
            removable = removals.len(),
            "Expanding scaffold"
        );
        for removal in removals {
            let parent = match index_of.get(&removal.parent_identity) {
                Some(&index) => index,
                None => {
                    let index = enumeration.scaffolds.len();
                    index_of.insert(removal.parent_identity.clone(), index);
                    enumeration.scaffolds.push(IdentifiedScaffold {
                        molecule: removal.parent,
                        identity: removal.parent_identity,
                    });
                    queue.push_back(index);
                    index
                }
            };
            if !enumeration.edges.contains(&(child, parent)) {
                enumeration.edges.push((child, parent));
            }
        }
    }

    debug!(
        scaffolds = enumeration.scaffolds.len(),
        edges = enumeration.edges.len(),
        "Enumerated ring removals"
    );
    enumeration
}

/// Removes one ring per step, chosen by the prioritization rules, until a single
/// ring remains.
///
/// The returned chain starts with the input scaffold and ends with the smallest
/// scaffold. An empty input gives an empty chain.
pub fn prioritized_removals(scaffold: Molecule, config: &ScaffoldConfig) -> Vec<IdentifiedScaffold> {
    if scaffold.is_empty() {
        return Vec::new();
    }
    let mut chain = vec![IdentifiedScaffold::new(scaffold, config)];
    loop {
        let Some(current) = chain.last() else {
            break;
        };
        let removals = ring_removals(&current.molecule, config);
        let Some(removal) = select_removal(&current.molecule, removals, config) else {
            break;
        };
        trace!(parent = %removal.parent_identity, "Selected ring removal");
        chain.push(IdentifiedScaffold {
            molecule: removal.parent,
            identity: removal.parent_identity,
        });
    }
    chain
}
