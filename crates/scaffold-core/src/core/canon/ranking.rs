use super::SmilesFlavor;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::Bond;
use crate::core::perception::rings::ring_bonds;
use std::collections::HashMap;

/// Computes a canonical rank for every atom.
///
/// Atoms start from graph invariants (element, degree, hydrogens, charge,
/// aromaticity, ring membership) and are refined with the ranks of their
/// neighbours and the connecting bond types until the partition is stable. Any
/// remaining tie is broken by splitting the lowest tied class and refining again,
/// so the returned ranks are `0..n` without duplicates.
///
/// Tied classes left after refinement are assumed to be symmetry-equivalent,
/// which holds for the molecular graphs handled here.
pub fn canonical_ranks(molecule: &Molecule, flavor: &SmilesFlavor) -> HashMap<AtomId, usize> {
    let atoms = molecule.atom_ids();
    let index: HashMap<AtomId, usize> = atoms.iter().enumerate().map(|(i, &a)| (a, i)).collect();
    let cyclic = ring_bonds(molecule);

    let adjacency: Vec<Vec<(usize, u8)>> = atoms
        .iter()
        .map(|&a| {
            molecule
                .neighbors(a)
                .iter()
                .filter_map(|&(n, b)| {
                    let bond = molecule.bond(b)?;
                    Some((index[&n], bond_code(bond, flavor)))
                })
                .collect()
        })
        .collect();

    let invariants: Vec<(u8, usize, u8, i8, bool, bool)> = atoms
        .iter()
        .map(|&a| {
            let (z, h, charge, aromatic) = molecule.atom(a).map_or((0, 0, 0, false), |atom| {
                (
                    atom.element.atomic_number,
                    atom.implicit_hydrogens,
                    atom.formal_charge,
                    flavor.aromatic_symbols && atom.aromatic,
                )
            });
            let in_ring = molecule.neighbors(a).iter().any(|(_, b)| cyclic.contains(b));
            (z, molecule.degree(a), h, charge, aromatic, in_ring)
        })
        .collect();

    let mut ranks = refine(dense_ranks(&invariants), &adjacency);
    while class_count(&ranks) < ranks.len() {
        let tied = lowest_tied_rank(&ranks);
        let chosen = ranks.iter().position(|&r| r == tied).unwrap_or(0);
        let split: Vec<usize> = ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| 2 * r + usize::from(r == tied && i != chosen))
            .collect();
        ranks = refine(dense_ranks(&split), &adjacency);
    }

    atoms.into_iter().zip(ranks).collect()
}

/// Bond type used for refinement: aromatic bonds are one class when aromatic
/// symbols are written, so that Kekulé forms do not influence the ranks.
pub(crate) fn bond_code(bond: &Bond, flavor: &SmilesFlavor) -> u8 {
    if flavor.aromatic_symbols && bond.aromatic {
        4
    } else {
        bond.order.valence()
    }
}

fn refine(mut ranks: Vec<usize>, adjacency: &[Vec<(usize, u8)>]) -> Vec<usize> {
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = adjacency
            .iter()
            .enumerate()
            .map(|(i, neighbors)| {
                let mut environment: Vec<(usize, u8)> =
                    neighbors.iter().map(|&(j, code)| (ranks[j], code)).collect();
                environment.sort_unstable();
                (ranks[i], environment)
            })
            .collect();
        let refined = dense_ranks(&keys);
        if class_count(&refined) == class_count(&ranks) {
            return refined;
        }
        ranks = refined;
    }
}

fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut ranks = vec![0; keys.len()];
    let mut rank = 0;
    for (position, &i) in order.iter().enumerate() {
        if position > 0 && keys[i] != keys[order[position - 1]] {
            rank += 1;
        }
        ranks[i] = rank;
    }
    ranks
}

fn class_count(ranks: &[usize]) -> usize {
    ranks.iter().max().map_or(0, |&m| m + 1)
}

fn lowest_tied_rank(ranks: &[usize]) -> usize {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &r in ranks {
        *counts.entry(r).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(rank, _)| rank)
        .min()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse;
    use std::collections::HashSet;

    fn ranks_of(smiles: &str) -> Vec<usize> {
        let mol = parse(smiles).unwrap();
        let ranks = canonical_ranks(&mol, &SmilesFlavor::default());
        mol.atom_ids().iter().map(|a| ranks[a]).collect()
    }

    #[test]
    fn ranks_are_a_permutation() {
        for smiles in ["c1ccccc1", "CC(C)(C)C", "O=C1NC=CC=NC1", "C1CC2CCC1C2"] {
            let ranks = ranks_of(smiles);
            let unique: HashSet<usize> = ranks.iter().copied().collect();
            assert_eq!(unique.len(), ranks.len(), "{smiles}");
            assert_eq!(*ranks.iter().max().unwrap(), ranks.len() - 1);
        }
    }

    #[test]
    fn invariants_order_atoms_before_tie_breaking() {
        // Carbon (Z=6) ranks below oxygen (Z=8) regardless of input order.
        let ranks = ranks_of("OC");
        assert!(ranks[1] < ranks[0]);
    }

    #[test]
    fn dense_ranks_assigns_equal_ranks_to_equal_keys() {
        assert_eq!(dense_ranks(&[5, 3, 5, 1]), vec![2, 1, 2, 0]);
        assert_eq!(class_count(&[2, 1, 2, 0]), 3);
        assert_eq!(lowest_tied_rank(&[2, 1, 2, 0, 1]), 1);
    }
}
