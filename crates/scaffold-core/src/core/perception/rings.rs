use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use std::collections::{HashMap, HashSet, VecDeque};

/// A simple cycle of the molecular graph.
///
/// Atoms are stored in traversal order, so `atoms[i]` and `atoms[i + 1]` (and the
/// last and first atom) are bonded through `bonds[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<AtomId>,
    pub bonds: Vec<BondId>,
}

impl Ring {
    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains_atom(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }

    pub fn contains_bond(&self, bond_id: BondId) -> bool {
        self.bonds.contains(&bond_id)
    }

    /// Number of atoms this ring shares with another ring.
    pub fn shared_atoms(&self, other: &Ring) -> usize {
        self.atoms.iter().filter(|a| other.contains_atom(**a)).count()
    }

    /// Number of bonds this ring shares with another ring.
    pub fn shared_bonds(&self, other: &Ring) -> usize {
        self.bonds.iter().filter(|b| other.contains_bond(**b)).count()
    }
}

/// Ring perception result for one molecule.
///
/// Holds the cyclic atoms and bonds, the ring systems (maximal sets of fused,
/// bridged or spiro-connected rings) and the smallest set of smallest rings.
#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    ring_atoms: HashSet<AtomId>,
    ring_bonds: HashSet<BondId>,
    systems: Vec<Vec<AtomId>>,
    sssr: Vec<Ring>,
}

impl RingInfo {
    /// Perceives the rings of a molecule.
    ///
    /// # Arguments
    ///
    /// * `molecule` - The molecule to analyse.
    ///
    /// # Return
    ///
    /// The ring information. Acyclic molecules yield an empty result.
    pub fn perceive(molecule: &Molecule) -> Self {
        let ring_bonds = ring_bonds(molecule);
        let ring_atoms: HashSet<AtomId> = ring_bonds
            .iter()
            .filter_map(|&b| molecule.bond(b))
            .flat_map(|bond| [bond.atom1_id, bond.atom2_id])
            .collect();
        let systems = ring_systems(molecule, &ring_bonds);
        let sssr = smallest_set_of_smallest_rings(molecule, &ring_bonds, &ring_atoms, &systems);
        Self {
            ring_atoms,
            ring_bonds,
            systems,
            sssr,
        }
    }

    pub fn is_ring_atom(&self, atom_id: AtomId) -> bool {
        self.ring_atoms.contains(&atom_id)
    }

    pub fn is_ring_bond(&self, bond_id: BondId) -> bool {
        self.ring_bonds.contains(&bond_id)
    }

    pub fn ring_atoms(&self) -> &HashSet<AtomId> {
        &self.ring_atoms
    }

    pub fn ring_bonds(&self) -> &HashSet<BondId> {
        &self.ring_bonds
    }

    /// Ring systems as atom lists, ordered by their first atom.
    pub fn ring_systems(&self) -> &[Vec<AtomId>] {
        &self.systems
    }

    /// The smallest set of smallest rings, ordered by size then discovery.
    pub fn rings(&self) -> &[Ring] {
        &self.sssr
    }

    pub fn ring_count(&self) -> usize {
        self.sssr.len()
    }

    /// Number of SSSR rings an atom belongs to.
    pub fn ring_membership(&self, atom_id: AtomId) -> usize {
        self.sssr.iter().filter(|r| r.contains_atom(atom_id)).count()
    }

    /// Number of SSSR rings a bond belongs to.
    pub fn bond_ring_membership(&self, bond_id: BondId) -> usize {
        self.sssr.iter().filter(|r| r.contains_bond(bond_id)).count()
    }
}

/// Returns the bonds that are part of at least one cycle.
///
/// A bond is cyclic iff it is not a bridge of the graph; bridges are found with an
/// iterative low-link traversal.
pub fn ring_bonds(molecule: &Molecule) -> HashSet<BondId> {
    let mut discovery: HashMap<AtomId, usize> = HashMap::with_capacity(molecule.atom_count());
    let mut low: HashMap<AtomId, usize> = HashMap::with_capacity(molecule.atom_count());
    let mut bridges: HashSet<BondId> = HashSet::new();
    let mut time = 0usize;

    for root in molecule.atom_ids() {
        if discovery.contains_key(&root) {
            continue;
        }
        discovery.insert(root, time);
        low.insert(root, time);
        time += 1;

        // (atom, bond used to enter it, next neighbour index)
        let mut stack: Vec<(AtomId, Option<BondId>, usize)> = vec![(root, None, 0)];
        while let Some(frame) = stack.last_mut() {
            let (atom, entry_bond) = (frame.0, frame.1);
            let neighbors = molecule.neighbors(atom);
            if frame.2 < neighbors.len() {
                let (neighbor, bond) = neighbors[frame.2];
                frame.2 += 1;
                if Some(bond) == entry_bond {
                    continue;
                }
                if let Some(&d) = discovery.get(&neighbor) {
                    let current = low[&atom];
                    low.insert(atom, current.min(d));
                } else {
                    discovery.insert(neighbor, time);
                    low.insert(neighbor, time);
                    time += 1;
                    stack.push((neighbor, Some(bond), 0));
                }
            } else {
                stack.pop();
                if let (Some(bond), Some(&(parent, _, _))) = (entry_bond, stack.last()) {
                    let child_low = low[&atom];
                    let parent_low = low[&parent];
                    low.insert(parent, parent_low.min(child_low));
                    if child_low > discovery[&parent] {
                        bridges.insert(bond);
                    }
                }
            }
        }
    }

    molecule
        .bonds_iter()
        .map(|(id, _)| id)
        .filter(|id| !bridges.contains(id))
        .collect()
}

/// Groups ring atoms into ring systems: connected components over cyclic bonds.
pub fn ring_systems(molecule: &Molecule, ring_bonds: &HashSet<BondId>) -> Vec<Vec<AtomId>> {
    let mut seen: HashSet<AtomId> = HashSet::new();
    let mut systems = Vec::new();

    for (start, _) in molecule.atoms_iter() {
        let cyclic = molecule
            .neighbors(start)
            .iter()
            .any(|(_, b)| ring_bonds.contains(b));
        if !cyclic || !seen.insert(start) {
            continue;
        }
        let mut system = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &(neighbor, bond) in molecule.neighbors(current) {
                if ring_bonds.contains(&bond) && seen.insert(neighbor) {
                    system.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        systems.push(system);
    }
    systems
}

/// Computes the smallest set of smallest rings (a minimum cycle basis).
///
/// Candidate cycles are built from breadth-first shortest-path trees rooted at
/// every ring atom (Horton's construction), sorted by size and accepted greedily
/// when they are linearly independent over GF(2) of the already accepted cycles.
pub fn smallest_set_of_smallest_rings(
    molecule: &Molecule,
    ring_bonds: &HashSet<BondId>,
    ring_atoms: &HashSet<AtomId>,
    systems: &[Vec<AtomId>],
) -> Vec<Ring> {
    if ring_bonds.is_empty() {
        return Vec::new();
    }

    let cyclic: Vec<BondId> = molecule
        .bonds_iter()
        .map(|(id, _)| id)
        .filter(|id| ring_bonds.contains(id))
        .collect();
    let bond_index: HashMap<BondId, usize> =
        cyclic.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let cyclomatic = ring_bonds.len() + systems.len() - ring_atoms.len();

    let mut candidates: Vec<Ring> = Vec::new();
    let mut seen_edge_sets: HashSet<Vec<usize>> = HashSet::new();

    for (root, _) in molecule.atoms_iter() {
        if !ring_atoms.contains(&root) {
            continue;
        }
        let tree = ShortestPathTree::grow(molecule, ring_bonds, root);
        for &bond_id in &cyclic {
            let Some(bond) = molecule.bond(bond_id) else {
                continue;
            };
            let (x, y) = (bond.atom1_id, bond.atom2_id);
            if tree.parent_bond(x) == Some(bond_id) || tree.parent_bond(y) == Some(bond_id) {
                continue;
            }
            let (Some(px), Some(py)) = (tree.path_to_root(x), tree.path_to_root(y)) else {
                continue;
            };
            // The two paths may only meet at the root.
            let px_set: HashSet<AtomId> = px.iter().copied().collect();
            if py.iter().filter(|a| px_set.contains(a)).count() != 1 {
                continue;
            }
            let mut atoms: Vec<AtomId> = px.iter().rev().copied().collect();
            atoms.extend(py.iter().take(py.len() - 1));
            let Some(ring) = ring_from_atoms(molecule, atoms) else {
                continue;
            };
            let mut key: Vec<usize> = ring.bonds.iter().map(|b| bond_index[b]).collect();
            key.sort_unstable();
            if seen_edge_sets.insert(key) {
                candidates.push(ring);
            }
        }
    }

    candidates.sort_by_cached_key(|ring| {
        let mut key: Vec<usize> = ring.bonds.iter().map(|b| bond_index[b]).collect();
        key.sort_unstable();
        (ring.size(), key)
    });

    let mut basis = Gf2Basis::new(bond_index.len());
    let mut sssr = Vec::with_capacity(cyclomatic);
    for ring in candidates {
        if sssr.len() == cyclomatic {
            break;
        }
        let vector = ring.bonds.iter().map(|b| bond_index[b]).collect::<Vec<_>>();
        if basis.insert(&vector) {
            sssr.push(ring);
        }
    }
    sssr
}

pub(crate) fn ring_from_atoms(molecule: &Molecule, atoms: Vec<AtomId>) -> Option<Ring> {
    if atoms.len() < 3 {
        return None;
    }
    let mut bonds = Vec::with_capacity(atoms.len());
    for i in 0..atoms.len() {
        let next = atoms[(i + 1) % atoms.len()];
        bonds.push(molecule.bond_between(atoms[i], next)?);
    }
    Some(Ring { atoms, bonds })
}

struct ShortestPathTree {
    parent: HashMap<AtomId, (AtomId, BondId)>,
    reached: HashSet<AtomId>,
}

impl ShortestPathTree {
    fn grow(molecule: &Molecule, ring_bonds: &HashSet<BondId>, root: AtomId) -> Self {
        let mut parent = HashMap::new();
        let mut reached = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for &(neighbor, bond) in molecule.neighbors(current) {
                if ring_bonds.contains(&bond) && reached.insert(neighbor) {
                    parent.insert(neighbor, (current, bond));
                    queue.push_back(neighbor);
                }
            }
        }
        Self { parent, reached }
    }

    fn parent_bond(&self, atom: AtomId) -> Option<BondId> {
        self.parent.get(&atom).map(|&(_, bond)| bond)
    }

    /// Path from `atom` back to the root, both ends included.
    fn path_to_root(&self, atom: AtomId) -> Option<Vec<AtomId>> {
        if !self.reached.contains(&atom) {
            return None;
        }
        let mut path = vec![atom];
        let mut current = atom;
        while let Some(&(up, _)) = self.parent.get(&current) {
            path.push(up);
            current = up;
        }
        Some(path)
    }
}

/// Incremental row-echelon basis of bit vectors over GF(2).
struct Gf2Basis {
    words: usize,
    rows: Vec<(usize, Vec<u64>)>,
}

impl Gf2Basis {
    fn new(bits: usize) -> Self {
        Self {
            words: bits.div_ceil(64).max(1),
            rows: Vec::new(),
        }
    }

    /// Inserts a vector given by its set bits; returns false if it is dependent.
    fn insert(&mut self, set_bits: &[usize]) -> bool {
        let mut vector = vec![0u64; self.words];
        for &bit in set_bits {
            vector[bit / 64] ^= 1 << (bit % 64);
        }
        for (pivot, row) in &self.rows {
            if vector[pivot / 64] >> (pivot % 64) & 1 == 1 {
                for (v, r) in vector.iter_mut().zip(row) {
                    *v ^= r;
                }
            }
        }
        let Some(pivot) = (0..self.words * 64).find(|&bit| vector[bit / 64] >> (bit % 64) & 1 == 1)
        else {
            return false;
        };
        // Keep existing rows reduced against the new pivot.
        for (_, row) in self.rows.iter_mut() {
            if row[pivot / 64] >> (pivot % 64) & 1 == 1 {
                for (r, v) in row.iter_mut().zip(&vector) {
                    *r ^= v;
                }
            }
        }
        self.rows.push((pivot, vector));
        true
    }
}
