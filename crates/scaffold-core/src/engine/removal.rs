//! Ring removal on scaffolds.

use super::config::ScaffoldConfig;
use super::extraction::scaffold_atoms;
use crate::core::canon::canonical_smiles;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::perception::aromaticity::perceive;
use crate::core::perception::rings::{Ring, RingInfo};
use std::collections::HashSet;
use tracing::trace;

/// A ring that can be removed from a scaffold together with the resulting parent.
#[derive(Debug, Clone)]
pub struct RingRemoval {
    /// Position of the ring in the SSSR of the child scaffold.
    pub ring_index: usize,
    pub ring: Ring,
    /// The scaffold left after the removal.
    pub parent: Molecule,
    /// Canonical identity of `parent`.
    pub parent_identity: String,
}

/// Removes one ring from a scaffold and returns the re-scaffolded remainder.
///
/// Ring atoms shared with another ring stay; the others are deleted and the cut
/// valences saturated. Pairs of kept atoms joined by a bond of the removed ring
/// that both lost their double bond get that bond restored as a double bond.
/// Dangling chains are pruned afterwards, keeping multiply-bonded atoms according
/// to the configured mode.
///
/// # Arguments
///
/// * `scaffold` - The scaffold the ring belongs to.
/// * `info` - Ring perception result of `scaffold`.
/// * `ring` - The ring to remove; must be one of `info.rings()`.
/// * `config` - Engine options.
pub fn remove_ring(
    scaffold: &Molecule,
    info: &RingInfo,
    ring: &Ring,
    config: &ScaffoldConfig,
) -> Molecule {
    let deleted: HashSet<AtomId> = ring
        .atoms
        .iter()
        .copied()
        .filter(|&a| info.ring_membership(a) <= 1)
        .collect();
    let keep: HashSet<AtomId> = scaffold
        .atom_ids()
        .into_iter()
        .filter(|a| !deleted.contains(a))
        .collect();

    let mut remainder = scaffold.induced(&keep, true);
    restore_double_bonds(scaffold, &mut remainder, ring, config);

    let remainder_info = RingInfo::perceive(&remainder);
    let atoms = scaffold_atoms(&remainder, &remainder_info, config.scaffold_mode);
    let mut parent = remainder.induced(&atoms, true);
    if config.determine_aromaticity {
        perceive(&mut parent, &config.aromaticity_model);
    }
    parent
}

fn restore_double_bonds(
    scaffold: &Molecule,
    remainder: &mut Molecule,
    ring: &Ring,
    config: &ScaffoldConfig,
) {
    let lost_double_bond = |remainder: &Molecule, atom: AtomId| {
        scaffold.has_multiple_bond(atom)
            && !remainder.has_multiple_bond(atom)
            && remainder.atom(atom).is_some_and(|a| a.implicit_hydrogens > 0)
    };

    for &bond_id in &ring.bonds {
        let Some(bond) = scaffold.bond(bond_id) else {
            continue;
        };
        if !remainder.contains_atom(bond.atom1_id) || !remainder.contains_atom(bond.atom2_id) {
            continue;
        }
        if config.retain_only_hybridisations_at_aromatic_bonds && !bond.aromatic {
            continue;
        }
        let (a, b) = (bond.atom1_id, bond.atom2_id);
        if !lost_double_bond(remainder, a) || !lost_double_bond(remainder, b) {
            continue;
        }
        if let Some(kept) = remainder.bond_mut(bond_id) {
            kept.order = BondOrder::Double;
        }
        for atom_id in [a, b] {
            if let Some(atom) = remainder.atom_mut(atom_id) {
                atom.implicit_hydrogens -= 1;
            }
        }
        trace!("Restored a double bond between the kept atoms of a removed ring");
    }
}

/// Whether a ring may be removed at all, before trying the removal.
fn is_removal_candidate(info: &RingInfo, index: usize) -> bool {
    let rings = info.rings();
    let ring = &rings[index];
    rings.len() > 1
        && ring.atoms.iter().any(|&a| info.ring_membership(a) <= 1)
        && rings
            .iter()
            .enumerate()
            .all(|(i, other)| i == index || ring.shared_atoms(other) <= 2)
}

/// Computes every admissible ring removal of a scaffold, in SSSR order.
///
/// A ring is admissible when the scaffold has more than one ring, the ring owns
/// at least one atom not shared with another ring, it shares at most two atoms
/// with every other ring (bridged rings are kept), and its removal leaves a
/// single connected scaffold.
pub fn ring_removals(scaffold: &Molecule, config: &ScaffoldConfig) -> Vec<RingRemoval> {
    let info = RingInfo::perceive(scaffold);
    (0..info.ring_count())
        .filter(|&i| is_removal_candidate(&info, i))
        .filter_map(|i| {
            let ring = info.rings()[i].clone();
            let parent = remove_ring(scaffold, &info, &ring, config);
            if parent.is_empty() || !parent.is_connected() {
                trace!(ring = i, "Ring is not terminal");
                return None;
            }
            let parent_identity = canonical_smiles(&parent, &config.smiles_flavor);
            Some(RingRemoval {
                ring_index: i,
                ring,
                parent,
                parent_identity,
            })
        })
        .collect()
}
