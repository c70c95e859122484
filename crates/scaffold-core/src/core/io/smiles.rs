use crate::core::models::atom::Atom;
use crate::core::models::element::{Element, HYDROGEN};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::perception::kekulize::assign_double_bonds;
use crate::core::perception::rings::ring_bonds;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("Empty SMILES string")]
    Empty,
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },
    #[error("Invalid bracket atom at position {position}: {reason}")]
    InvalidBracketAtom { position: usize, reason: String },
    #[error("Branch opened at position {position} is never closed")]
    UnclosedBranch { position: usize },
    #[error("Unmatched ')' at position {position}")]
    UnmatchedBranch { position: usize },
    #[error("Ring bond {label} opened at position {position} is never closed")]
    UnclosedRing { label: u16, position: usize },
    #[error("Ring bond {label} at position {position} is invalid: {reason}")]
    InvalidRingBond {
        label: u16,
        position: usize,
        reason: &'static str,
    },
    #[error("Bond at position {position} is not followed by an atom")]
    DanglingBond { position: usize },
    #[error("No Kekulé structure can be assigned to the aromatic atoms")]
    Kekulization,
}

/// Parses a SMILES string into a molecule.
///
/// Supports the organic subset, bracket atoms (isotope and atom class are read
/// and discarded, chirality is ignored), branches, ring closures including `%nn`,
/// the bond symbols `-=#:/\` and dot-disconnected components. Aromatic input is
/// kekulized, and the lowercase atoms and their ring bonds keep their aromatic
/// flags. Explicit neutral hydrogens bonded to one heavy atom are folded into its
/// implicit hydrogen count.
///
/// # Arguments
///
/// * `smiles` - The SMILES string. Parsing stops at the first whitespace.
///
/// # Errors
///
/// Returns [`SmilesError`] describing the first syntax problem found, or
/// [`SmilesError::Kekulization`] if the aromatic part has no valid Kekulé form.
pub fn parse(smiles: &str) -> Result<Molecule, SmilesError> {
    Parser::new(smiles).run()
}

impl FromStr for Molecule {
    type Err = SmilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

struct OpenRing {
    atom: AtomId,
    order: Option<BondOrder>,
    position: usize,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    molecule: Molecule,
    previous: Option<AtomId>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<(Option<AtomId>, usize)>,
    rings: BTreeMap<u16, OpenRing>,
    bracket_atoms: HashSet<AtomId>,
}

impl Parser {
    fn new(smiles: &str) -> Self {
        Self {
            chars: smiles.trim_start().chars().collect(),
            pos: 0,
            molecule: Molecule::new(),
            previous: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
            bracket_atoms: HashSet::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn unexpected(&self) -> SmilesError {
        SmilesError::UnexpectedCharacter {
            character: self.peek().unwrap_or(' '),
            position: self.pos,
        }
    }

    fn run(mut self) -> Result<Molecule, SmilesError> {
        while let Some(c) = self.peek() {
            match c {
                '[' => self.bracket_atom()?,
                'A'..='Z' | 'a'..='z' | '*' => self.organic_atom()?,
                '(' => {
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    self.branches.push((self.previous, self.pos));
                    self.pos += 1;
                }
                ')' => {
                    if let Some((_, position)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond { position });
                    }
                    let (previous, _) = self
                        .branches
                        .pop()
                        .ok_or(SmilesError::UnmatchedBranch { position: self.pos })?;
                    self.previous = previous;
                    self.pos += 1;
                }
                '-' | '=' | '#' | ':' | '/' | '\\' => {
                    if self.previous.is_none() || self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    let order = match c {
                        '=' => BondOrder::Double,
                        '#' => BondOrder::Triple,
                        ':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    };
                    self.pending_bond = Some((order, self.pos));
                    self.pos += 1;
                }
                '0'..='9' | '%' => self.ring_closure()?,
                '.' => {
                    if let Some((_, position)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond { position });
                    }
                    if self.previous.is_none() {
                        return Err(self.unexpected());
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                c if c.is_whitespace() => break,
                _ => return Err(self.unexpected()),
            }
        }

        if let Some((_, position)) = self.pending_bond {
            return Err(SmilesError::DanglingBond { position });
        }
        if let Some(&(_, position)) = self.branches.last() {
            return Err(SmilesError::UnclosedBranch { position });
        }
        if let Some((&label, open)) = self.rings.iter().next() {
            return Err(SmilesError::UnclosedRing {
                label,
                position: open.position,
            });
        }
        if self.molecule.is_empty() {
            return Err(SmilesError::Empty);
        }

        self.finish()
    }

    fn implicit_order(&self, a: AtomId, b: AtomId) -> BondOrder {
        let aromatic = |id| self.molecule.atom(id).is_some_and(|atom| atom.aromatic);
        if aromatic(a) && aromatic(b) {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn attach(&mut self, atom: Atom) -> AtomId {
        let id = self.molecule.add_atom(atom);
        if let Some(previous) = self.previous {
            let order = match self.pending_bond.take() {
                Some((order, _)) => order,
                None => self.implicit_order(previous, id),
            };
            self.molecule.add_bond(previous, id, order);
        }
        self.previous = Some(id);
        id
    }

    fn organic_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let c = self.peek().ok_or(SmilesError::Empty)?;
        let (symbol, aromatic) = match (c, self.peek_at(1)) {
            ('C', Some('l')) => ("Cl".to_string(), false),
            ('B', Some('r')) => ("Br".to_string(), false),
            ('b' | 'c' | 'n' | 'o' | 'p' | 's', _) => (c.to_ascii_uppercase().to_string(), true),
            (c, _) if c.is_ascii_uppercase() || c == '*' => (c.to_string(), false),
            _ => return Err(self.unexpected()),
        };

        let element = Element::from_symbol(&symbol)
            .filter(|e| e.is_organic_subset())
            .ok_or_else(|| SmilesError::UnknownElement {
                symbol: symbol.clone(),
                position: start,
            })?;
        self.pos += symbol.len();
        self.attach(Atom::new(element).with_aromatic(aromatic));
        Ok(())
    }

    fn bracket_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let invalid = |reason: String| SmilesError::InvalidBracketAtom {
            position: start,
            reason,
        };
        self.pos += 1;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }

        let (element, aromatic) = self.bracket_symbol().ok_or_else(|| {
            invalid(match self.peek() {
                Some(c) => format!("expected element symbol, found '{c}'"),
                None => "unterminated bracket atom".to_string(),
            })
        })?;

        if self.peek() == Some('@') {
            while self.peek() == Some('@') {
                self.pos += 1;
            }
            let class: String = [self.peek(), self.peek_at(1)].iter().flatten().collect();
            if matches!(class.as_str(), "TH" | "AL" | "SP" | "TB" | "OH") {
                self.pos += 2;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some('H') {
            self.pos += 1;
            hydrogens = self.read_number().unwrap_or(1);
        }

        let mut charge = 0i8;
        if let Some(sign @ ('+' | '-')) = self.peek() {
            let unit: i8 = if sign == '+' { 1 } else { -1 };
            self.pos += 1;
            if let Some(magnitude) = self.read_number() {
                let magnitude = i8::try_from(magnitude)
                    .map_err(|_| invalid(format!("charge {magnitude} out of range")))?;
                charge = unit * magnitude;
            } else {
                charge = unit;
                while self.peek() == Some(sign) {
                    charge += unit;
                    self.pos += 1;
                }
            }
        }

        if self.peek() == Some(':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return Err(invalid("atom class without a number".to_string()));
            }
        }

        match self.peek() {
            Some(']') => self.pos += 1,
            Some(c) => return Err(invalid(format!("unexpected '{c}'"))),
            None => return Err(invalid("unterminated bracket atom".to_string())),
        }

        let atom = Atom::new(element)
            .with_hydrogens(hydrogens)
            .with_charge(charge)
            .with_aromatic(aromatic);
        let id = self.attach(atom);
        self.bracket_atoms.insert(id);
        Ok(())
    }

    fn bracket_symbol(&mut self) -> Option<(Element, bool)> {
        let first = self.peek()?;
        let second = self.peek_at(1).filter(|c| c.is_ascii_lowercase());

        if first.is_ascii_uppercase() {
            if let Some(second) = second {
                let pair: String = [first, second].iter().collect();
                if let Some(element) = Element::from_symbol(&pair) {
                    self.pos += 2;
                    return Some((element, false));
                }
            }
            let element = Element::from_symbol(&first.to_string())?;
            self.pos += 1;
            return Some((element, false));
        }

        if first.is_ascii_lowercase() {
            if let Some(second) = second {
                let pair: String = [first, second].iter().collect();
                if let Some(element) = Element::from_aromatic_symbol(&pair) {
                    self.pos += 2;
                    return Some((element, true));
                }
            }
            let element = Element::from_aromatic_symbol(&first.to_string())?;
            self.pos += 1;
            return Some((element, true));
        }
        None
    }

    fn read_number(&mut self) -> Option<u8> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }

    fn ring_closure(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let Some(current) = self.previous else {
            return Err(self.unexpected());
        };

        let label = if self.peek() == Some('%') {
            let digits: Option<u16> = match (self.peek_at(1), self.peek_at(2)) {
                (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                    Some((a as u16 - '0' as u16) * 10 + (b as u16 - '0' as u16))
                }
                _ => None,
            };
            let Some(label) = digits else {
                return Err(self.unexpected());
            };
            self.pos += 3;
            label
        } else {
            let digit = self.peek().and_then(|c| c.to_digit(10)).ok_or_else(|| self.unexpected())?;
            self.pos += 1;
            digit as u16
        };

        let bond = self.pending_bond.take().map(|(order, _)| order);
        match self.rings.remove(&label) {
            None => {
                self.rings.insert(
                    label,
                    OpenRing {
                        atom: current,
                        order: bond,
                        position: start,
                    },
                );
            }
            Some(open) => {
                let invalid = |reason| SmilesError::InvalidRingBond {
                    label,
                    position: start,
                    reason,
                };
                if open.atom == current {
                    return Err(invalid("ring bond to the same atom"));
                }
                if self.molecule.bond_between(open.atom, current).is_some() {
                    return Err(invalid("atoms are already bonded"));
                }
                let order = match (open.order, bond) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(invalid("conflicting bond orders"));
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.implicit_order(open.atom, current),
                };
                self.molecule.add_bond(open.atom, current, order);
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Molecule, SmilesError> {
        let mut needs: Vec<AtomId> = Vec::new();

        for atom_id in self.molecule.atom_ids() {
            let used = self.molecule.bond_order_sum(atom_id);
            let bracket = self.bracket_atoms.contains(&atom_id);
            let Some(atom) = self.molecule.atom_mut(atom_id) else {
                continue;
            };

            if bracket {
                let used = used + atom.implicit_hydrogens;
                let needs_pi = atom.aromatic
                    && atom
                        .element
                        .target_valence(atom.formal_charge, used)
                        .is_some_and(|v| v > used);
                if needs_pi {
                    needs.push(atom_id);
                }
            } else if atom.aromatic {
                let valence = atom.element.valences.first().copied().unwrap_or(0);
                if used < valence {
                    atom.implicit_hydrogens = valence - used - 1;
                    needs.push(atom_id);
                } else {
                    atom.implicit_hydrogens = valence.saturating_sub(used);
                }
            } else {
                atom.implicit_hydrogens = atom
                    .element
                    .target_valence(0, used)
                    .map_or(0, |v| v - used);
            }
        }

        let cyclic = ring_bonds(&self.molecule);
        let aromatic_bonds: HashSet<_> = self
            .molecule
            .bonds_iter()
            .filter(|(id, bond)| bond.order == BondOrder::Aromatic && cyclic.contains(id))
            .map(|(id, _)| id)
            .collect();
        let doubles = assign_double_bonds(&self.molecule, &needs, &aromatic_bonds)
            .ok_or(SmilesError::Kekulization)?;

        for (id, bond) in self.molecule.bonds_iter_mut() {
            if bond.order != BondOrder::Aromatic {
                continue;
            }
            bond.aromatic = aromatic_bonds.contains(&id);
            bond.order = if doubles.contains(&id) {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
        }

        fold_explicit_hydrogens(&mut self.molecule);
        Ok(self.molecule)
    }
}

fn fold_explicit_hydrogens(molecule: &mut Molecule) {
    let foldable: Vec<(AtomId, AtomId)> = molecule
        .atoms_iter()
        .filter(|(_, atom)| atom.element == HYDROGEN && atom.formal_charge == 0)
        .filter_map(|(id, _)| match molecule.neighbors(id) {
            [(heavy, bond)] => {
                let single = molecule
                    .bond(*bond)
                    .is_some_and(|b| b.order == BondOrder::Single);
                let heavy_atom = molecule
                    .atom(*heavy)
                    .is_some_and(|a| a.element != HYDROGEN);
                (single && heavy_atom).then_some((id, *heavy))
            }
            _ => None,
        })
        .collect();

    for (hydrogen, heavy) in foldable {
        molecule.remove_atom(hydrogen);
        if let Some(atom) = molecule.atom_mut(heavy) {
            atom.implicit_hydrogens += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::{CARBON, CHLORINE, NITROGEN, OXYGEN, SULFUR};

    fn hydrogens(mol: &Molecule) -> Vec<u8> {
        mol.atoms_iter().map(|(_, a)| a.implicit_hydrogens).collect()
    }

    fn double_bond_count(mol: &Molecule) -> usize {
        mol.bonds_iter()
            .filter(|(_, b)| b.order == BondOrder::Double)
            .count()
    }

    #[test]
    fn parses_simple_chain_with_implicit_hydrogens() {
        let mol = parse("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(hydrogens(&mol), vec![3, 2, 1]);
    }

    #[test]
    fn parses_two_letter_symbols_and_branches() {
        let mol = parse("ClC(Br)(F)C(=O)O").unwrap();
        let elements: Vec<&str> = mol.atoms_iter().map(|(_, a)| a.element.symbol).collect();
        assert_eq!(elements, vec!["Cl", "C", "Br", "F", "C", "O", "O"]);
        assert_eq!(hydrogens(&mol), vec![0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(double_bond_count(&mol), 1);
    }

    #[test]
    fn aromatic_benzene_is_kekulized_with_aromatic_flags() {
        let mol = parse("c1ccccc1").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert_eq!(double_bond_count(&mol), 3);
        assert!(mol.atoms_iter().all(|(_, a)| a.aromatic && a.implicit_hydrogens == 1));
        assert!(mol.bonds_iter().all(|(_, b)| b.aromatic));
    }

    #[test]
    fn pyrrole_nitrogen_needs_explicit_hydrogen() {
        let mol = parse("c1cc[nH]c1").unwrap();
        assert_eq!(double_bond_count(&mol), 2);
        let n = mol.atoms_iter().find(|(_, a)| a.element == NITROGEN).unwrap().1;
        assert_eq!(n.implicit_hydrogens, 1);

        assert_eq!(parse("c1ccnc1").err(), Some(SmilesError::Kekulization));
    }

    #[test]
    fn flucloxacillin_parses_with_expected_composition() {
        let mol =
            parse("CC1=C(C(=NO1)C2=C(C=CC=C2Cl)F)C(=O)NC3C4N(C3=O)C(C(S4)(C)C)C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 30);
        assert_eq!(mol.atoms_iter().filter(|(_, a)| a.element == SULFUR).count(), 1);
        assert_eq!(mol.atoms_iter().filter(|(_, a)| a.element == CHLORINE).count(), 1);
    }

    #[test]
    fn biphenyl_linker_bond_is_single_and_not_aromatic() {
        let mol = parse("c1ccccc1c1ccccc1").unwrap();
        let non_aromatic: Vec<_> = mol.bonds_iter().filter(|(_, b)| !b.aromatic).collect();
        assert_eq!(non_aromatic.len(), 1);
        assert_eq!(non_aromatic[0].1.order, BondOrder::Single);
        assert_eq!(double_bond_count(&mol), 6);
    }

    #[test]
    fn bracket_atoms_keep_explicit_hydrogens_and_charges() {
        let mol = parse("[NH4+].[O-]C(=O)C").unwrap();
        let atoms: Vec<&Atom> = mol.atoms_iter().map(|(_, a)| a).collect();
        assert_eq!(atoms[0].implicit_hydrogens, 4);
        assert_eq!(atoms[0].formal_charge, 1);
        assert_eq!(atoms[1].element, OXYGEN);
        assert_eq!(atoms[1].formal_charge, -1);
        assert_eq!(atoms[1].implicit_hydrogens, 0);
        assert_eq!(mol.components().len(), 2);
    }

    #[test]
    fn stereo_and_isotope_annotations_are_ignored() {
        let mol = parse("[13CH3][C@@H](O)/C=C/C").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.atoms_iter().next().unwrap().1.element, CARBON);
        assert_eq!(hydrogens(&mol), vec![3, 1, 1, 1, 1, 3]);
    }

    #[test]
    fn explicit_hydrogen_atoms_are_folded() {
        let mol = parse("[H]C([H])([H])O").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(hydrogens(&mol), vec![3, 1]);
    }

    #[test]
    fn percent_ring_closures_are_supported() {
        let mol = parse("C%12CCCCC%12").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.atoms_iter().all(|(_, a)| a.implicit_hydrogens == 2));
    }

    #[test]
    fn malformed_input_is_rejected_with_positions() {
        assert_eq!(parse("").err(), Some(SmilesError::Empty));
        assert_eq!(
            parse("C1CC").err(),
            Some(SmilesError::UnclosedRing { label: 1, position: 1 })
        );
        assert_eq!(
            parse("CC(C").err(),
            Some(SmilesError::UnclosedBranch { position: 2 })
        );
        assert_eq!(
            parse("CC)").err(),
            Some(SmilesError::UnmatchedBranch { position: 2 })
        );
        assert_eq!(parse("CC=").err(), Some(SmilesError::DanglingBond { position: 2 }));
        assert!(matches!(
            parse("CXC"),
            Err(SmilesError::UnknownElement { position: 1, .. })
        ));
        assert!(matches!(
            parse("C[Xx]"),
            Err(SmilesError::InvalidBracketAtom { position: 1, .. })
        ));
        assert!(matches!(
            parse("C11"),
            Err(SmilesError::InvalidRingBond { label: 1, .. })
        ));
        assert!(matches!(
            parse("C?"),
            Err(SmilesError::UnexpectedCharacter { character: '?', position: 1 })
        ));
    }

    #[test]
    fn from_str_delegates_to_parser() {
        let mol: Molecule = "O=C=O".parse().unwrap();
        assert_eq!(double_bond_count(&mol), 2);
        assert!("C(".parse::<Molecule>().is_err());
    }
}
