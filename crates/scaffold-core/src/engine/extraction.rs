//! Decomposition of a molecule into scaffold, rings, linkers and side chains.
//!
//! All fragments are induced sub-molecules of the input, so atom identifiers of a
//! fragment refer to the same atoms as in the molecule it was cut from.

use super::config::{ScaffoldConfig, ScaffoldMode};
use crate::core::editing::{convert_to_carbon, reduce_bond_orders};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::perception::aromaticity::perceive;
use crate::core::perception::rings::{Ring, RingInfo};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// Atoms of the Murcko framework: ring atoms and the chains that connect them.
///
/// Non-ring atoms with at most one remaining neighbour are pruned until none is
/// left, so an acyclic molecule yields an empty set.
pub(crate) fn framework_atoms(molecule: &Molecule, info: &RingInfo) -> HashSet<AtomId> {
    let mut keep: HashSet<AtomId> = molecule.atom_ids().into_iter().collect();
    let mut degree: HashMap<AtomId, usize> = molecule
        .atom_ids()
        .into_iter()
        .map(|a| (a, molecule.degree(a)))
        .collect();
    let mut queue: VecDeque<AtomId> = molecule
        .atom_ids()
        .into_iter()
        .filter(|a| !info.is_ring_atom(*a) && degree[a] <= 1)
        .collect();

    while let Some(atom) = queue.pop_front() {
        if !keep.remove(&atom) {
            continue;
        }
        for &(neighbor, _) in molecule.neighbors(atom) {
            if !keep.contains(&neighbor) {
                continue;
            }
            if let Some(d) = degree.get_mut(&neighbor) {
                *d = d.saturating_sub(1);
                if *d <= 1 && !info.is_ring_atom(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
    }
    keep
}

/// Atoms outside `core` that are bound to a `core` atom by a double or triple bond.
pub(crate) fn exocyclic_atoms(molecule: &Molecule, core: &HashSet<AtomId>) -> Vec<AtomId> {
    molecule
        .atom_ids()
        .into_iter()
        .filter(|a| !core.contains(a))
        .filter(|&a| {
            molecule.neighbors(a).iter().any(|&(n, b)| {
                core.contains(&n) && molecule.bond(b).is_some_and(|b| b.order.is_multiple())
            })
        })
        .collect()
}

/// Atoms that belong to the scaffold of `molecule` under `mode`.
pub(crate) fn scaffold_atoms(
    molecule: &Molecule,
    info: &RingInfo,
    mode: ScaffoldMode,
) -> HashSet<AtomId> {
    let mut keep = framework_atoms(molecule, info);
    if mode.keeps_exocyclic_atoms() && !keep.is_empty() {
        let exo = exocyclic_atoms(molecule, &keep);
        keep.extend(exo);
    }
    keep
}

fn finish_fragment(mut fragment: Molecule, config: &ScaffoldConfig) -> Molecule {
    if config.determine_aromaticity {
        perceive(&mut fragment, &config.aromaticity_model);
    }
    fragment
}

/// Splits the atoms of `keep` into connected fragments of `molecule`.
fn fragments(
    molecule: &Molecule,
    keep: &HashSet<AtomId>,
    config: &ScaffoldConfig,
    saturate: bool,
) -> Vec<Molecule> {
    let cut = molecule.induced(keep, saturate);
    cut.components()
        .into_iter()
        .map(|component| {
            let atoms: HashSet<AtomId> = component.into_iter().collect();
            finish_fragment(cut.induced(&atoms, false), config)
        })
        .collect()
}

/// Returns the scaffold of a molecule under the configured mode.
///
/// The Murcko framework is cut out first. In [`ScaffoldMode::Scaffold`] atoms
/// bound to it by a multiple bond are kept; the wire-frame and basic modes then
/// abstract bond orders and atom types. An acyclic molecule gives an empty
/// molecule.
///
/// # Arguments
///
/// * `molecule` - The input structure; it is not modified.
/// * `config` - Mode and aromaticity options.
/// * `saturate` - Whether cut valences are filled with implicit hydrogens.
pub fn get_scaffold(molecule: &Molecule, config: &ScaffoldConfig, saturate: bool) -> Molecule {
    let info = RingInfo::perceive(molecule);
    let keep = scaffold_atoms(molecule, &info, config.scaffold_mode);
    trace!(
        kept = keep.len(),
        total = molecule.atom_count(),
        "Extracted scaffold atoms"
    );

    let mut scaffold = molecule.induced(&keep, saturate);
    if config.scaffold_mode.converts_to_carbon() {
        convert_to_carbon(&mut scaffold, saturate);
    }
    if config.scaffold_mode.reduces_bond_orders() {
        reduce_bond_orders(&mut scaffold, saturate);
    }
    finish_fragment(scaffold, config)
}

/// Atoms of one ring together with the atoms the mode attaches to it.
fn ring_atoms_with_exocyclic(molecule: &Molecule, ring: &Ring, mode: ScaffoldMode) -> HashSet<AtomId> {
    let mut atoms: HashSet<AtomId> = ring.atoms.iter().copied().collect();
    if mode.keeps_exocyclic_atoms() {
        let exo = exocyclic_atoms(molecule, &atoms);
        atoms.extend(exo);
    }
    atoms
}

/// Returns every SSSR ring of the molecule as a separate fragment.
///
/// In [`ScaffoldMode::Scaffold`] each ring keeps its exocyclic multiply-bonded
/// atoms. Rings are returned in SSSR order: by size, then discovery.
pub fn get_rings(molecule: &Molecule, config: &ScaffoldConfig, saturate: bool) -> Vec<Molecule> {
    let info = RingInfo::perceive(molecule);
    info.rings()
        .iter()
        .map(|ring| {
            let atoms = ring_atoms_with_exocyclic(molecule, ring, config.scaffold_mode);
            finish_fragment(molecule.induced(&atoms, saturate), config)
        })
        .collect()
}

/// Returns the linkers of the molecule: connected non-ring framework pieces.
pub fn get_linkers(molecule: &Molecule, config: &ScaffoldConfig, saturate: bool) -> Vec<Molecule> {
    let info = RingInfo::perceive(molecule);
    let framework = framework_atoms(molecule, &info);
    let mut linker_atoms: HashSet<AtomId> = framework
        .iter()
        .copied()
        .filter(|a| !info.is_ring_atom(*a))
        .collect();
    if linker_atoms.is_empty() {
        return Vec::new();
    }
    if config.scaffold_mode.keeps_exocyclic_atoms() {
        let exo: Vec<AtomId> = exocyclic_atoms(molecule, &linker_atoms)
            .into_iter()
            .filter(|a| !framework.contains(a))
            .collect();
        linker_atoms.extend(exo);
    }
    fragments(molecule, &linker_atoms, config, saturate)
}

/// Returns the side chains: connected pieces of atoms outside the scaffold.
///
/// Exocyclic multiply-bonded atoms are part of the scaffold in
/// [`ScaffoldMode::Scaffold`] and are therefore never side chains in that mode.
pub fn get_side_chains(
    molecule: &Molecule,
    config: &ScaffoldConfig,
    saturate: bool,
) -> Vec<Molecule> {
    let info = RingInfo::perceive(molecule);
    let scaffold = scaffold_atoms(molecule, &info, config.scaffold_mode);
    let side: HashSet<AtomId> = molecule
        .atom_ids()
        .into_iter()
        .filter(|a| !scaffold.contains(a))
        .collect();
    if side.is_empty() {
        return Vec::new();
    }
    fragments(molecule, &side, config, saturate)
}
