use super::element::{CARBON, Element};

/// Represents a heavy atom (or an explicit hydrogen) of a molecular graph.
///
/// Hydrogens attached to an atom are normally not stored as separate atoms but
/// counted in [`Atom::implicit_hydrogens`]. The `aromatic` flag is the result of
/// the last aromaticity perception (or of lowercase SMILES input) and never
/// replaces the Kekulé bond orders stored on the bonds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Number of hydrogens attached to this atom that are not stored as atoms.
    pub implicit_hydrogens: u8,
    /// Whether the atom is part of an aromatic ring.
    pub aromatic: bool,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom without implicit hydrogens.
    ///
    /// # Arguments
    ///
    /// * `element` - The chemical element of the atom.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            implicit_hydrogens: 0,
            aromatic: false,
        }
    }

    /// Creates a carbon atom carrying the given number of implicit hydrogens.
    pub fn carbon(implicit_hydrogens: u8) -> Self {
        Self::new(CARBON).with_hydrogens(implicit_hydrogens)
    }

    pub fn with_hydrogens(mut self, implicit_hydrogens: u8) -> Self {
        self.implicit_hydrogens = implicit_hydrogens;
        self
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn with_aromatic(mut self, aromatic: bool) -> Self {
        self.aromatic = aromatic;
        self
    }

    /// Whether the atom is a heteroatom (neither carbon nor hydrogen).
    pub fn is_heteroatom(&self) -> bool {
        self.element.is_heteroatom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::{NITROGEN, OXYGEN};

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(NITROGEN);

        assert_eq!(atom.element, NITROGEN);
        assert_eq!(atom.formal_charge, 0);
        assert_eq!(atom.implicit_hydrogens, 0);
        assert!(!atom.aromatic);
    }

    #[test]
    fn builder_methods_set_fields() {
        let atom = Atom::new(OXYGEN)
            .with_charge(-1)
            .with_hydrogens(1)
            .with_aromatic(true);

        assert_eq!(atom.formal_charge, -1);
        assert_eq!(atom.implicit_hydrogens, 1);
        assert!(atom.aromatic);
    }

    #[test]
    fn carbon_constructor_sets_hydrogens() {
        let methane = Atom::carbon(4);
        assert_eq!(methane.element, CARBON);
        assert_eq!(methane.implicit_hydrogens, 4);
        assert!(!methane.is_heteroatom());
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom1 = Atom::new(NITROGEN).with_aromatic(true);
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
        assert!(atom2.is_heteroatom());
    }
}
