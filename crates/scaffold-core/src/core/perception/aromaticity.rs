use super::rings::{Ring, RingInfo, ring_from_atoms};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How many π electrons each ring atom donates to a candidate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElectronDonation {
    /// Ring π bonds and lone pairs; atoms with an exocyclic π bond are excluded.
    #[default]
    Cdk,
    /// As `Cdk`, but an exocyclic π bond to an electronegative atom donates nothing
    /// instead of excluding the atom (pyridones, pyrimidinones).
    CdkAllowingExocyclic,
    /// Only ring π bonds count; lone pairs never donate.
    PiBonds,
}

/// Which cycles are tested for the 4n+2 rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleSet {
    /// SSSR rings plus the envelopes of pairs of rings fused by one bond.
    #[default]
    CdkAromaticSet,
    /// SSSR rings only.
    Sssr,
}

/// Aromaticity model: electron donation combined with a cycle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AromaticityModel {
    pub electron_donation: ElectronDonation,
    pub cycle_set: CycleSet,
}

impl AromaticityModel {
    pub fn new(electron_donation: ElectronDonation, cycle_set: CycleSet) -> Self {
        Self {
            electron_donation,
            cycle_set,
        }
    }
}

/// Perceives aromaticity and records it on atom and bond flags.
///
/// All previous flags are cleared first. A candidate cycle is aromatic when every
/// atom in it can donate electrons and the total is 4n+2. Bond orders are never
/// touched, so the Kekulé structure survives perception.
///
/// # Arguments
///
/// * `molecule` - The molecule whose flags are updated.
/// * `model` - The aromaticity model to apply.
///
/// # Return
///
/// `true` if at least one aromatic cycle was found.
pub fn perceive(molecule: &mut Molecule, model: &AromaticityModel) -> bool {
    for (_, atom) in molecule.atoms_iter_mut() {
        atom.aromatic = false;
    }
    for (_, bond) in molecule.bonds_iter_mut() {
        bond.aromatic = false;
    }

    let info = RingInfo::perceive(molecule);
    if info.ring_count() == 0 {
        return false;
    }

    let contributions: HashMap<AtomId, Option<u8>> = info
        .ring_atoms()
        .iter()
        .map(|&a| (a, electron_contribution(molecule, &info, a, model.electron_donation)))
        .collect();

    let candidates = candidate_cycles(molecule, &info, model.cycle_set);
    let mut found = false;
    for cycle in &candidates {
        let mut total = 0u32;
        let mut valid = true;
        for atom in &cycle.atoms {
            match contributions.get(atom).copied().flatten() {
                Some(electrons) => total += u32::from(electrons),
                None => {
                    valid = false;
                    break;
                }
            }
        }
        if !valid || total % 4 != 2 {
            continue;
        }
        found = true;
        for &atom in &cycle.atoms {
            if let Some(a) = molecule.atom_mut(atom) {
                a.aromatic = true;
            }
        }
        for &bond in &cycle.bonds {
            if let Some(b) = molecule.bond_mut(bond) {
                b.aromatic = true;
            }
        }
    }
    found
}

/// Electrons an atom donates to any cycle it is part of, or `None` if it cannot
/// be aromatic.
fn electron_contribution(
    molecule: &Molecule,
    info: &RingInfo,
    atom_id: AtomId,
    donation: ElectronDonation,
) -> Option<u8> {
    let atom = molecule.atom(atom_id)?;
    let mut ring_pi = 0;
    let mut exocyclic_pi: Option<AtomId> = None;

    for &(neighbor, bond_id) in molecule.neighbors(atom_id) {
        let bond = molecule.bond(bond_id)?;
        match bond.order {
            BondOrder::Single => {}
            BondOrder::Double | BondOrder::Aromatic => {
                if info.is_ring_bond(bond_id) {
                    ring_pi += 1;
                } else {
                    exocyclic_pi = Some(neighbor);
                }
            }
            BondOrder::Triple => return None,
        }
    }

    if ring_pi > 1 {
        return None;
    }
    if ring_pi == 1 {
        return match exocyclic_pi {
            Some(_) => None,
            None => Some(1),
        };
    }

    if let Some(partner) = exocyclic_pi {
        return match donation {
            ElectronDonation::CdkAllowingExocyclic => {
                let partner = molecule.atom(partner)?;
                matches!(partner.element.atomic_number, 7 | 8 | 16).then_some(0)
            }
            ElectronDonation::Cdk | ElectronDonation::PiBonds => None,
        };
    }

    if donation == ElectronDonation::PiBonds {
        return None;
    }

    let connections = molecule.degree(atom_id) + usize::from(atom.implicit_hydrogens);
    match (atom.element.atomic_number, atom.formal_charge, connections) {
        (7 | 15 | 33, 0, 3) => Some(2),
        (7, -1, 2) => Some(2),
        (8 | 16 | 34 | 52, 0, 2) => Some(2),
        (6, -1, 3) => Some(2),
        (6, 1, 3) => Some(0),
        (5, 0, 3) => Some(0),
        _ => None,
    }
}

fn candidate_cycles(molecule: &Molecule, info: &RingInfo, cycle_set: CycleSet) -> Vec<Ring> {
    let rings = info.rings();
    let mut cycles: Vec<Ring> = rings.to_vec();
    if cycle_set == CycleSet::Sssr {
        return cycles;
    }

    for (i, first) in rings.iter().enumerate() {
        for second in &rings[i + 1..] {
            if first.shared_bonds(second) != 1 || first.shared_atoms(second) != 2 {
                continue;
            }
            if let Some(envelope) = envelope(molecule, first, second) {
                cycles.push(envelope);
            }
        }
    }
    cycles
}

/// The outer cycle of two rings fused through exactly one bond.
fn envelope(molecule: &Molecule, first: &Ring, second: &Ring) -> Option<Ring> {
    let k = first.bonds.iter().position(|b| second.contains_bond(*b))?;
    let j = second.bonds.iter().position(|b| *b == first.bonds[k])?;

    let mut atoms = walk_around(first, k);
    let mut rest = walk_around(second, j);
    if rest.first() != atoms.last() {
        rest.reverse();
    }
    atoms.extend(&rest[1..rest.len().saturating_sub(1)]);
    ring_from_atoms(molecule, atoms)
}

/// Atoms of a ring from the far end of bond `index` around to its near end.
fn walk_around(ring: &Ring, index: usize) -> Vec<AtomId> {
    let n = ring.size();
    (1..=n).map(|step| ring.atoms[(index + step) % n]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse;

    fn aromatic_atom_count(smiles: &str, model: AromaticityModel) -> usize {
        let mut mol = parse(smiles).unwrap();
        perceive(&mut mol, &model);
        mol.atoms_iter().filter(|(_, a)| a.aromatic).count()
    }

    fn default_count(smiles: &str) -> usize {
        aromatic_atom_count(smiles, AromaticityModel::default())
    }

    #[test]
    fn kekule_benzene_is_aromatic() {
        assert_eq!(default_count("C1=CC=CC=C1"), 6);
    }

    #[test]
    fn five_membered_heteroaromatics_are_aromatic() {
        assert_eq!(default_count("C1=CC=CN1"), 5);
        assert_eq!(default_count("c1ccoc1"), 5);
        assert_eq!(default_count("c1ccsc1"), 5);
        assert_eq!(default_count("c1cnoc1"), 5);
    }

    #[test]
    fn saturated_and_antiaromatic_rings_are_not_aromatic() {
        assert_eq!(default_count("C1CCCCC1"), 0);
        assert_eq!(default_count("C1=CC=C1"), 0);
        assert_eq!(default_count("C1=CC=CC1"), 0);
        assert_eq!(default_count("O=C1NC=CC=NC1"), 0);
    }

    #[test]
    fn fused_systems_mark_every_ring_atom() {
        assert_eq!(default_count("c1ccc2ccccc2c1"), 10);
        assert_eq!(default_count("c1ccc2[nH]ccc2c1"), 9);
    }

    #[test]
    fn exocyclic_double_bond_handling_depends_on_model() {
        let pyridone = "O=C1C=CC=CN1";
        assert_eq!(default_count(pyridone), 0);
        let allowing = AromaticityModel::new(
            ElectronDonation::CdkAllowingExocyclic,
            CycleSet::CdkAromaticSet,
        );
        assert_eq!(aromatic_atom_count(pyridone, allowing), 6);
    }

    #[test]
    fn pi_bond_model_ignores_lone_pairs() {
        let model = AromaticityModel::new(ElectronDonation::PiBonds, CycleSet::Sssr);
        assert_eq!(aromatic_atom_count("c1ccccc1", model), 6);
        assert_eq!(aromatic_atom_count("c1cc[nH]c1", model), 0);
    }

    #[test]
    fn aromatic_flags_are_reset_before_perception() {
        let mut mol = parse("c1ccccc1").unwrap();
        let model = AromaticityModel::new(ElectronDonation::PiBonds, CycleSet::Sssr);
        for (_, atom) in mol.atoms_iter_mut() {
            atom.element = crate::core::models::element::CARBON;
        }
        let bond_ids = mol.bond_ids();
        for id in bond_ids {
            mol.bond_mut(id).unwrap().order = BondOrder::Single;
        }
        assert!(!perceive(&mut mol, &model));
        assert!(mol.atoms_iter().all(|(_, a)| !a.aromatic));
        assert!(mol.bonds_iter().all(|(_, b)| !b.aromatic));
    }
}
