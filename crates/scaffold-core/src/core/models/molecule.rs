use super::atom::Atom;
use super::ids::{AtomId, BondId};
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashSet, VecDeque};

/// A molecular graph: atoms connected by bonds, hydrogens held implicitly.
///
/// This struct is the structure handle consumed by every scaffold operation.
/// Atom and bond identifiers are slot map keys, so they stay valid when other
/// atoms are removed. Editing operations therefore work on a clone of the input
/// and delete what they do not need, which keeps identifiers comparable between
/// a molecule and the fragments derived from it.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for bonds.
    bonds: SlotMap<BondId, Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    adjacency: SecondaryMap<AtomId, Vec<(AtomId, BondId)>>,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in insertion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Returns a mutable iterator over all atoms in insertion order.
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    /// Returns the IDs of all atoms in insertion order.
    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atoms.keys().collect()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, id: AtomId) -> bool {
        self.atoms.contains_key(id)
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    pub fn bond_mut(&mut self, id: BondId) -> Option<&mut Bond> {
        self.bonds.get_mut(id)
    }

    /// Returns an iterator over all bonds in insertion order.
    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bonds.iter()
    }

    pub fn bonds_iter_mut(&mut self) -> impl Iterator<Item = (BondId, &mut Bond)> {
        self.bonds.iter_mut()
    }

    pub fn bond_ids(&self) -> Vec<BondId> {
        self.bonds.keys().collect()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Adds an atom to the molecule and returns its new ID.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Adds a bond between two atoms.
    ///
    /// This operation is idempotent: if the two atoms are already bonded the
    /// existing bond is returned unchanged.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - ID of the first atom.
    /// * `atom2_id` - ID of the second atom.
    /// * `order` - The order of the bond.
    ///
    /// # Return
    ///
    /// Returns the bond ID, or `None` if either atom does not exist or both IDs
    /// refer to the same atom.
    pub fn add_bond(
        &mut self,
        atom1_id: AtomId,
        atom2_id: AtomId,
        order: BondOrder,
    ) -> Option<BondId> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if let Some(existing) = self.bond_between(atom1_id, atom2_id) {
            return Some(existing);
        }

        let bond_id = self.bonds.insert(Bond::new(atom1_id, atom2_id, order));
        self.adjacency[atom1_id].push((atom2_id, bond_id));
        self.adjacency[atom2_id].push((atom1_id, bond_id));
        Some(bond_id)
    }

    /// Returns the ID of the bond joining two atoms, if any.
    pub fn bond_between(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<BondId> {
        self.adjacency
            .get(atom1_id)?
            .iter()
            .find(|(neighbor, _)| *neighbor == atom2_id)
            .map(|&(_, bond_id)| bond_id)
    }

    /// Returns the neighbours of an atom together with the connecting bonds.
    ///
    /// Unknown atoms have no neighbours.
    pub fn neighbors(&self, atom_id: AtomId) -> &[(AtomId, BondId)] {
        self.adjacency
            .get(atom_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of explicit neighbours of an atom.
    pub fn degree(&self, atom_id: AtomId) -> usize {
        self.neighbors(atom_id).len()
    }

    /// Sum of the valences of all bonds incident to an atom.
    pub fn bond_order_sum(&self, atom_id: AtomId) -> u8 {
        self.neighbors(atom_id)
            .iter()
            .filter_map(|&(_, bond_id)| self.bonds.get(bond_id))
            .map(|bond| bond.order.valence())
            .sum()
    }

    /// Whether the atom carries at least one double or triple bond.
    pub fn has_multiple_bond(&self, atom_id: AtomId) -> bool {
        self.neighbors(atom_id)
            .iter()
            .filter_map(|&(_, bond_id)| self.bonds.get(bond_id))
            .any(|bond| bond.order.is_multiple())
    }

    /// Removes a bond and updates the adjacency of both endpoints.
    pub fn remove_bond(&mut self, bond_id: BondId) -> Option<Bond> {
        let bond = self.bonds.remove(bond_id)?;
        for atom_id in [bond.atom1_id, bond.atom2_id] {
            if let Some(adjacency) = self.adjacency.get_mut(atom_id) {
                adjacency.retain(|&(_, id)| id != bond_id);
            }
        }
        Some(bond)
    }

    /// Removes an atom from the molecule.
    ///
    /// This method removes the atom and all bonds connected to it.
    ///
    /// # Arguments
    ///
    /// * `atom_id` - The ID of the atom to remove.
    ///
    /// # Return
    ///
    /// Returns `Some(Atom)` if the atom existed and was removed, otherwise `None`.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;

        let neighbors = self.adjacency.remove(atom_id).unwrap_or_default();
        for (neighbor_id, bond_id) in neighbors {
            self.bonds.remove(bond_id);
            if let Some(adjacency) = self.adjacency.get_mut(neighbor_id) {
                adjacency.retain(|&(id, _)| id != atom_id);
            }
        }

        Some(atom)
    }

    /// Builds the sub-molecule induced by a set of atoms.
    ///
    /// Atom and bond IDs of the kept atoms are preserved. With `saturate` set,
    /// every bond cut between a kept and a dropped atom adds its valence to the
    /// implicit hydrogen count of the kept atom.
    ///
    /// # Arguments
    ///
    /// * `keep` - The atoms to keep.
    /// * `saturate` - Whether to fill the cut valences with implicit hydrogens.
    pub fn induced(&self, keep: &HashSet<AtomId>, saturate: bool) -> Molecule {
        let mut fragment = self.clone();
        let dropped: Vec<AtomId> = self.atoms.keys().filter(|id| !keep.contains(id)).collect();

        if saturate {
            for &atom_id in &dropped {
                for &(neighbor_id, bond_id) in self.neighbors(atom_id) {
                    if !keep.contains(&neighbor_id) {
                        continue;
                    }
                    let valence = self.bonds[bond_id].order.valence();
                    if let Some(atom) = fragment.atom_mut(neighbor_id) {
                        atom.implicit_hydrogens = atom.implicit_hydrogens.saturating_add(valence);
                    }
                }
            }
        }

        for atom_id in dropped {
            fragment.remove_atom(atom_id);
        }
        fragment
    }

    /// Splits the molecule into its connected components.
    ///
    /// Components are ordered by their first atom in insertion order, and each
    /// component lists its atoms in breadth-first discovery order.
    pub fn components(&self) -> Vec<Vec<AtomId>> {
        let mut seen: HashSet<AtomId> = HashSet::with_capacity(self.atoms.len());
        let mut components = Vec::new();

        for start in self.atoms.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for &(neighbor, _) in self.neighbors(current) {
                    if seen.insert(neighbor) {
                        component.push(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Whether the molecule consists of exactly one connected component.
    pub fn is_connected(&self) -> bool {
        self.components().len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::{CARBON, OXYGEN};

    fn propanol() -> (Molecule, [AtomId; 4]) {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::carbon(3));
        let c2 = mol.add_atom(Atom::carbon(2));
        let c3 = mol.add_atom(Atom::carbon(2));
        let o = mol.add_atom(Atom::new(OXYGEN).with_hydrogens(1));
        mol.add_bond(c1, c2, BondOrder::Single).unwrap();
        mol.add_bond(c2, c3, BondOrder::Single).unwrap();
        mol.add_bond(c3, o, BondOrder::Single).unwrap();
        (mol, [c1, c2, c3, o])
    }

    #[test]
    fn molecule_creation_and_access() {
        let (mol, [c1, c2, _, o]) = propanol();

        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.atom(o).unwrap().element, OXYGEN);
        assert_eq!(mol.degree(c2), 2);
        assert_eq!(mol.bond_order_sum(c1), 1);
        assert!(mol.bond_between(c1, c2).is_some());
        assert!(mol.bond_between(c1, o).is_none());
    }

    #[test]
    fn idempotent_add_bond_does_not_create_duplicates() {
        let (mut mol, [c1, c2, _, _]) = propanol();
        let first = mol.bond_between(c1, c2).unwrap();

        let again = mol.add_bond(c2, c1, BondOrder::Double).unwrap();

        assert_eq!(first, again);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.bond(first).unwrap().order, BondOrder::Single);
    }

    #[test]
    fn add_bond_rejects_self_loops_and_unknown_atoms() {
        let (mut mol, [c1, _, _, _]) = propanol();
        let stale = mol.add_atom(Atom::new(CARBON));
        mol.remove_atom(stale).unwrap();

        assert!(mol.add_bond(c1, c1, BondOrder::Single).is_none());
        assert!(mol.add_bond(c1, stale, BondOrder::Single).is_none());
        assert!(mol.add_bond(stale, c1, BondOrder::Single).is_none());
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn atom_removal_updates_bonds_and_adjacency() {
        let (mut mol, [c1, c2, c3, o]) = propanol();

        let removed = mol.remove_atom(c2).unwrap();

        assert_eq!(removed.implicit_hydrogens, 2);
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 1);
        assert_eq!(mol.degree(c1), 0);
        assert_eq!(mol.neighbors(c3), &[(o, mol.bond_between(c3, o).unwrap())]);
        assert!(mol.remove_atom(c2).is_none());
        assert_eq!(mol.components().len(), 2);
    }

    #[test]
    fn induced_fragment_keeps_ids_and_saturates_cut_bonds() {
        let (mut mol, [c1, c2, c3, o]) = propanol();
        let double = mol.bond_between(c2, c3).unwrap();
        mol.bond_mut(double).unwrap().order = BondOrder::Double;
        mol.atom_mut(c2).unwrap().implicit_hydrogens = 1;

        let keep: HashSet<AtomId> = [c1, c2].into_iter().collect();
        let saturated = mol.induced(&keep, true);
        let bare = mol.induced(&keep, false);

        assert_eq!(saturated.atom_count(), 2);
        assert_eq!(saturated.atom(c2).unwrap().implicit_hydrogens, 3);
        assert_eq!(bare.atom(c2).unwrap().implicit_hydrogens, 1);
        assert!(!saturated.contains_atom(o));
        assert!(saturated.bond_between(c1, c2).is_some());
        assert_eq!(mol.atom_count(), 4);
    }

    #[test]
    fn components_are_ordered_by_first_atom() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(Atom::carbon(4));
        let b = mol.add_atom(Atom::carbon(3));
        let c = mol.add_atom(Atom::carbon(3));
        mol.add_bond(b, c, BondOrder::Single);

        assert_eq!(mol.components(), vec![vec![a], vec![b, c]]);
        assert!(!mol.is_connected());

        mol.add_bond(a, b, BondOrder::Single);
        assert!(mol.is_connected());
    }

    #[test]
    fn remove_bond_updates_neighbors() {
        let (mut mol, [c1, c2, _, _]) = propanol();
        let bond = mol.bond_between(c1, c2).unwrap();

        assert!(mol.remove_bond(bond).is_some());
        assert!(mol.bond_between(c1, c2).is_none());
        assert_eq!(mol.degree(c2), 1);
        assert!(!mol.has_multiple_bond(c2));
    }
}
