//! Structure editing used by the scaffold abstractions.
//!
//! Atom removal with hydrogen saturation lives on [`Molecule::induced`]; this
//! module adds the in-place transformations that abstract atom types and bond
//! orders. Both clear aromaticity flags, which callers re-perceive afterwards.

use crate::core::models::element::CARBON;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Reduces every bond to a single bond (wire frame).
///
/// With `saturate`, each endpoint receives the lost bond valence as implicit
/// hydrogens, so a C=C double bond becomes two additional C-H bonds.
pub fn reduce_bond_orders(molecule: &mut Molecule, saturate: bool) {
    let mut lost = Vec::new();
    for (_, bond) in molecule.bonds_iter_mut() {
        let extra = bond.order.valence() - 1;
        if extra > 0 && saturate {
            lost.push((bond.atom1_id, extra));
            lost.push((bond.atom2_id, extra));
        }
        bond.order = BondOrder::Single;
        bond.aromatic = false;
    }
    for (atom_id, extra) in lost {
        if let Some(atom) = molecule.atom_mut(atom_id) {
            atom.implicit_hydrogens = atom.implicit_hydrogens.saturating_add(extra);
        }
    }
    clear_atom_aromaticity(molecule);
}

/// Turns every atom into an uncharged carbon (basic framework).
///
/// With `saturate`, hydrogen counts are recomputed from the carbon valence so
/// that, for example, a furan oxygen becomes a CH2 group.
pub fn convert_to_carbon(molecule: &mut Molecule, saturate: bool) {
    let atom_ids = molecule.atom_ids();
    for atom_id in atom_ids {
        let used = molecule.bond_order_sum(atom_id);
        if let Some(atom) = molecule.atom_mut(atom_id) {
            atom.element = CARBON;
            atom.formal_charge = 0;
            atom.aromatic = false;
            if saturate {
                atom.implicit_hydrogens = 4u8.saturating_sub(used);
            }
        }
    }
    for (_, bond) in molecule.bonds_iter_mut() {
        bond.aromatic = false;
    }
}

fn clear_atom_aromaticity(molecule: &mut Molecule) {
    for (_, atom) in molecule.atoms_iter_mut() {
        atom.aromatic = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse;

    fn hydrogens(mol: &Molecule) -> Vec<u8> {
        mol.atoms_iter().map(|(_, a)| a.implicit_hydrogens).collect()
    }

    #[test]
    fn wire_frame_saturates_lost_bond_orders() {
        let mut mol = parse("C=CC#N").unwrap();
        reduce_bond_orders(&mut mol, true);

        assert!(mol.bonds_iter().all(|(_, b)| b.order == BondOrder::Single));
        assert_eq!(hydrogens(&mol), vec![3, 2, 2, 2]);
    }

    #[test]
    fn wire_frame_without_saturation_keeps_hydrogen_counts() {
        let mut mol = parse("c1ccccc1").unwrap();
        reduce_bond_orders(&mut mol, false);

        assert_eq!(hydrogens(&mol), vec![1; 6]);
        assert!(mol.atoms_iter().all(|(_, a)| !a.aromatic));
        assert!(mol.bonds_iter().all(|(_, b)| !b.aromatic));
    }

    #[test]
    fn basic_framework_turns_heteroatoms_into_carbon() {
        let mut mol = parse("c1ccoc1").unwrap();
        convert_to_carbon(&mut mol, true);

        assert!(mol.atoms_iter().all(|(_, a)| a.element == CARBON));
        let oxygen_position = 3;
        assert_eq!(hydrogens(&mol)[oxygen_position], 2);
        assert_eq!(
            mol.bonds_iter()
                .filter(|(_, b)| b.order == BondOrder::Double)
                .count(),
            2
        );
    }

    #[test]
    fn basic_framework_clears_charges() {
        let mut mol = parse("C[N+](C)(C)C").unwrap();
        convert_to_carbon(&mut mol, true);
        assert!(mol.atoms_iter().all(|(_, a)| a.formal_charge == 0));
        assert_eq!(hydrogens(&mol)[1], 0);
    }
}
