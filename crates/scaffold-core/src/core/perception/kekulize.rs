use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use std::collections::HashSet;

/// Finds a Kekulé assignment: a set of bonds forming a perfect matching on the
/// atoms that need a double bond.
///
/// Only bonds in `candidates` whose endpoints both need a double bond can be
/// chosen. The search always extends the most constrained atom first, which
/// resolves typical fused aromatic systems without backtracking.
///
/// # Arguments
///
/// * `molecule` - The molecule being kekulized.
/// * `needs` - Atoms that must end up with exactly one double bond.
/// * `candidates` - Bonds that may be turned into double bonds.
///
/// # Return
///
/// The bonds to make double, or `None` if no assignment exists.
pub fn assign_double_bonds(
    molecule: &Molecule,
    needs: &[AtomId],
    candidates: &HashSet<BondId>,
) -> Option<Vec<BondId>> {
    let mut search = Matching {
        molecule,
        needs,
        need_set: needs.iter().copied().collect(),
        candidates,
        matched: HashSet::with_capacity(needs.len()),
        chosen: Vec::with_capacity(needs.len() / 2),
    };
    search.solve().then_some(search.chosen)
}

struct Matching<'a> {
    molecule: &'a Molecule,
    needs: &'a [AtomId],
    need_set: HashSet<AtomId>,
    candidates: &'a HashSet<BondId>,
    matched: HashSet<AtomId>,
    chosen: Vec<BondId>,
}

impl Matching<'_> {
    fn options(&self, atom: AtomId) -> Vec<(AtomId, BondId)> {
        self.molecule
            .neighbors(atom)
            .iter()
            .copied()
            .filter(|(neighbor, bond)| {
                self.candidates.contains(bond)
                    && self.need_set.contains(neighbor)
                    && !self.matched.contains(neighbor)
            })
            .collect()
    }

    fn solve(&mut self) -> bool {
        let mut best: Option<(AtomId, Vec<(AtomId, BondId)>)> = None;
        for &atom in self.needs {
            if self.matched.contains(&atom) {
                continue;
            }
            let options = self.options(atom);
            if options.is_empty() {
                return false;
            }
            let better = best
                .as_ref()
                .is_none_or(|(_, current)| options.len() < current.len());
            if better {
                let forced = options.len() == 1;
                best = Some((atom, options));
                if forced {
                    break;
                }
            }
        }

        let Some((atom, options)) = best else {
            return true;
        };

        for (partner, bond) in options {
            self.matched.insert(atom);
            self.matched.insert(partner);
            self.chosen.push(bond);
            if self.solve() {
                return true;
            }
            self.chosen.pop();
            self.matched.remove(&partner);
            self.matched.remove(&atom);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::BondOrder;

    fn ring(size: usize) -> (Molecule, Vec<AtomId>, HashSet<BondId>) {
        let mut mol = Molecule::new();
        let atoms: Vec<AtomId> = (0..size).map(|_| mol.add_atom(Atom::carbon(1))).collect();
        let bonds = (0..size)
            .map(|i| {
                mol.add_bond(atoms[i], atoms[(i + 1) % size], BondOrder::Aromatic)
                    .unwrap()
            })
            .collect();
        (mol, atoms, bonds)
    }

    #[test]
    fn six_membered_ring_gets_three_alternating_double_bonds() {
        let (mol, atoms, bonds) = ring(6);
        let chosen = assign_double_bonds(&mol, &atoms, &bonds).unwrap();

        assert_eq!(chosen.len(), 3);
        for atom in &atoms {
            let count = mol
                .neighbors(*atom)
                .iter()
                .filter(|(_, b)| chosen.contains(b))
                .count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn odd_number_of_needy_atoms_has_no_assignment() {
        let (mol, atoms, bonds) = ring(5);
        assert!(assign_double_bonds(&mol, &atoms, &bonds).is_none());
    }

    #[test]
    fn atoms_without_need_are_skipped() {
        let (mol, atoms, bonds) = ring(5);
        let needs: Vec<AtomId> = atoms[1..].to_vec();
        let chosen = assign_double_bonds(&mol, &needs, &bonds).unwrap();
        assert_eq!(chosen.len(), 2);
        assert!(
            mol.neighbors(atoms[0])
                .iter()
                .all(|(_, b)| !chosen.contains(b))
        );
    }

    #[test]
    fn empty_need_set_is_trivially_satisfied() {
        let (mol, _, bonds) = ring(6);
        assert_eq!(assign_double_bonds(&mol, &[], &bonds), Some(Vec::new()));
    }
}
