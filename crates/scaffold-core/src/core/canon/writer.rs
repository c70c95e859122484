use super::SmilesFlavor;
use super::ranking::canonical_ranks;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write;

/// Writes the canonical SMILES of a molecule.
///
/// Each connected component is written by a depth-first traversal that starts at
/// its lowest-ranked atom and visits neighbours in rank order. Components are
/// sorted as strings and joined with `.`, and the empty molecule gives an empty
/// string.
pub fn write_canonical(molecule: &Molecule, flavor: &SmilesFlavor) -> String {
    if molecule.is_empty() {
        return String::new();
    }
    let ranks = canonical_ranks(molecule, flavor);

    let mut parts: Vec<String> = molecule
        .components()
        .into_iter()
        .filter_map(|component| {
            let root = component.into_iter().min_by_key(|a| ranks[a])?;
            Some(ComponentWriter::new(molecule, flavor, &ranks).write(root))
        })
        .collect();
    parts.sort();
    parts.join(".")
}

struct ComponentWriter<'a> {
    molecule: &'a Molecule,
    flavor: &'a SmilesFlavor,
    ranks: &'a HashMap<AtomId, usize>,
    visited: HashSet<AtomId>,
    children: HashMap<AtomId, Vec<(AtomId, BondId)>>,
    ring_opens: HashMap<AtomId, Vec<(AtomId, BondId)>>,
    ring_closes: HashMap<AtomId, Vec<(AtomId, BondId)>>,
    closure_bonds: HashSet<BondId>,
    digits: HashMap<BondId, u16>,
    free_digits: BTreeSet<u16>,
    next_digit: u16,
    out: String,
}

impl<'a> ComponentWriter<'a> {
    fn new(
        molecule: &'a Molecule,
        flavor: &'a SmilesFlavor,
        ranks: &'a HashMap<AtomId, usize>,
    ) -> Self {
        Self {
            molecule,
            flavor,
            ranks,
            visited: HashSet::new(),
            children: HashMap::new(),
            ring_opens: HashMap::new(),
            ring_closes: HashMap::new(),
            closure_bonds: HashSet::new(),
            digits: HashMap::new(),
            free_digits: BTreeSet::new(),
            next_digit: 1,
            out: String::new(),
        }
    }

    fn write(mut self, root: AtomId) -> String {
        self.traverse(root, None);
        self.emit(root);
        self.out
    }

    fn sorted_neighbors(&self, atom: AtomId) -> Vec<(AtomId, BondId)> {
        let mut neighbors = self.molecule.neighbors(atom).to_vec();
        neighbors.sort_by_key(|(n, _)| self.ranks.get(n).copied().unwrap_or(usize::MAX));
        neighbors
    }

    /// First pass: spanning tree and ring-closure bonds.
    fn traverse(&mut self, atom: AtomId, entry: Option<BondId>) {
        self.visited.insert(atom);
        for (neighbor, bond) in self.sorted_neighbors(atom) {
            if Some(bond) == entry {
                continue;
            }
            if self.visited.contains(&neighbor) {
                if self.closure_bonds.insert(bond) {
                    self.ring_opens.entry(neighbor).or_default().push((atom, bond));
                    self.ring_closes.entry(atom).or_default().push((neighbor, bond));
                }
            } else {
                self.children.entry(atom).or_default().push((neighbor, bond));
                self.traverse(neighbor, Some(bond));
            }
        }
    }

    /// Second pass: text output.
    fn emit(&mut self, atom: AtomId) {
        let token = atom_token(self.molecule, atom, self.flavor);
        self.out.push_str(&token);

        let mut closes = self.ring_closes.remove(&atom).unwrap_or_default();
        closes.sort_by_key(|(n, _)| self.ranks[n]);
        for (_, bond) in closes {
            if let Some(digit) = self.digits.remove(&bond) {
                self.push_digit(digit);
                self.free_digits.insert(digit);
            }
        }

        let mut opens = self.ring_opens.remove(&atom).unwrap_or_default();
        opens.sort_by_key(|(n, _)| self.ranks[n]);
        for (partner, bond) in opens {
            let digit = match self.free_digits.pop_first() {
                Some(d) => d,
                None => {
                    self.next_digit += 1;
                    self.next_digit - 1
                }
            };
            let symbol = self.bond_symbol(atom, partner, bond);
            self.out.push_str(symbol);
            self.push_digit(digit);
            self.digits.insert(bond, digit);
        }

        let children = self.children.remove(&atom).unwrap_or_default();
        let last = children.len().saturating_sub(1);
        for (i, (child, bond)) in children.into_iter().enumerate() {
            let symbol = self.bond_symbol(atom, child, bond);
            if i < last {
                self.out.push('(');
                self.out.push_str(symbol);
                self.emit(child);
                self.out.push(')');
            } else {
                self.out.push_str(symbol);
                self.emit(child);
            }
        }
    }

    fn push_digit(&mut self, digit: u16) {
        if digit < 10 {
            let _ = write!(self.out, "{digit}");
        } else {
            let _ = write!(self.out, "%{digit}");
        }
    }

    fn bond_symbol(&self, a: AtomId, b: AtomId, bond: BondId) -> &'static str {
        let Some(bond) = self.molecule.bond(bond) else {
            return "";
        };
        let lower = |id| written_aromatic(self.molecule, id, self.flavor);
        bond_token(bond, lower(a) && lower(b), self.flavor)
    }
}

fn written_aromatic(molecule: &Molecule, atom: AtomId, flavor: &SmilesFlavor) -> bool {
    flavor.aromatic_symbols
        && molecule
            .atom(atom)
            .is_some_and(|a| a.aromatic && a.element.has_aromatic_symbol())
}

fn bond_token(bond: &Bond, between_lowercase: bool, flavor: &SmilesFlavor) -> &'static str {
    if flavor.aromatic_symbols && bond.aromatic && between_lowercase {
        return "";
    }
    match bond.order {
        BondOrder::Single if between_lowercase => "-",
        BondOrder::Single => "",
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Aromatic => ":",
    }
}

/// Valence contributed by a bond as the parser will read it back.
fn written_valence(bond: &Bond, between_lowercase: bool, flavor: &SmilesFlavor) -> u8 {
    if flavor.aromatic_symbols && bond.aromatic && between_lowercase {
        1
    } else {
        bond.order.valence()
    }
}

fn atom_token(molecule: &Molecule, atom_id: AtomId, flavor: &SmilesFlavor) -> String {
    let Some(atom) = molecule.atom(atom_id) else {
        return String::new();
    };
    let lowercase = written_aromatic(molecule, atom_id, flavor);
    let symbol = if lowercase {
        atom.element.symbol.to_ascii_lowercase()
    } else {
        atom.element.symbol.to_string()
    };

    let bare_allowed = atom.element.is_organic_subset()
        && atom.formal_charge == 0
        && (!lowercase || atom.element.is_bare_aromatic());
    if bare_allowed {
        let used: u8 = molecule
            .neighbors(atom_id)
            .iter()
            .filter_map(|&(n, b)| {
                let bond = molecule.bond(b)?;
                let both = lowercase && written_aromatic(molecule, n, flavor);
                Some(written_valence(bond, both, flavor))
            })
            .sum();
        let implied = if lowercase {
            let valence = atom.element.valences.first().copied().unwrap_or(0);
            if used < valence {
                valence - used - 1
            } else {
                valence.saturating_sub(used)
            }
        } else {
            atom.element.target_valence(0, used).map_or(0, |v| v - used)
        };
        if implied == atom.implicit_hydrogens {
            return symbol;
        }
    }

    let mut token = format!("[{symbol}");
    match atom.implicit_hydrogens {
        0 => {}
        1 => token.push('H'),
        n => {
            let _ = write!(token, "H{n}");
        }
    }
    match atom.formal_charge {
        0 => {}
        1 => token.push('+'),
        -1 => token.push('-'),
        c if c > 0 => {
            let _ = write!(token, "+{c}");
        }
        c => {
            let _ = write!(token, "-{}", -c);
        }
    }
    token.push(']');
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse;
    use crate::core::perception::aromaticity::{AromaticityModel, perceive};

    fn canonical(smiles: &str) -> String {
        let mut mol = parse(smiles).unwrap();
        perceive(&mut mol, &AromaticityModel::default());
        write_canonical(&mol, &SmilesFlavor::default())
    }

    #[test]
    fn equivalent_inputs_give_identical_strings() {
        assert_eq!(canonical("OCC"), canonical("CCO"));
        assert_eq!(canonical("C1=CC=CC=C1"), canonical("c1ccccc1"));
        assert_eq!(
            canonical("O=C1NC=CC(=NC1)c2ccccc2"),
            canonical("c1ccc(cc1)C1=NCC(=O)NC=C1")
        );
        assert_eq!(canonical("n1occc1"), canonical("c1cnoc1"));
    }

    #[test]
    fn different_molecules_give_different_strings() {
        assert_ne!(canonical("CCO"), canonical("COC"));
        assert_ne!(canonical("c1ccncc1"), canonical("c1ccccc1"));
        assert_ne!(canonical("C1CCCCC1"), canonical("C1CCCC1"));
    }

    #[test]
    fn output_parses_back_to_the_same_identity() {
        for smiles in [
            "O=C(NC1C(=O)N2CCSC21)c3conc3-c4ccccc4",
            "CN1C(=O)CN=C(C2=C1C=CC(=C2)Cl)C3=CC=CC=C3",
            "c1cc[nH]c1",
            "[NH4+].[Cl-]",
            "C12C3C4C1C5C2C3C45",
        ] {
            let first = canonical(smiles);
            assert_eq!(canonical(&first), first, "{smiles}");
        }
    }

    #[test]
    fn aromatic_symbols_can_be_disabled() {
        let mut mol = parse("c1ccccc1").unwrap();
        perceive(&mut mol, &AromaticityModel::default());
        let kekule = write_canonical(
            &mol,
            &SmilesFlavor {
                aromatic_symbols: false,
                stereo: false,
            },
        );
        assert!(kekule.chars().all(|c| c != 'c'));
        assert_eq!(kekule.matches('=').count(), 3);
    }

    #[test]
    fn charged_and_hydrogen_bearing_atoms_use_brackets() {
        assert_eq!(canonical("[NH4+]"), "[NH4+]");
        assert_eq!(canonical("[O-]C"), "C[O-]");
        assert!(canonical("c1cc[nH]c1").contains("[nH]"));
    }

    #[test]
    fn empty_molecule_writes_empty_string() {
        assert_eq!(write_canonical(&Molecule::new(), &SmilesFlavor::default()), "");
    }
}
