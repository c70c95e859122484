use phf::{Map, phf_map};
use std::fmt;

/// A chemical element with the data needed for valence bookkeeping.
///
/// Elements are plain `Copy` values backed by a static table, so atoms can carry
/// them by value without lookups during graph manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    /// The element symbol with conventional capitalisation (e.g. "Cl").
    pub symbol: &'static str,
    /// The atomic number.
    pub atomic_number: u8,
    /// Allowed neutral valences in ascending order, used to derive implicit hydrogens.
    pub valences: &'static [u8],
}

pub const HYDROGEN: Element = Element { symbol: "H", atomic_number: 1, valences: &[1] };
pub const BORON: Element = Element { symbol: "B", atomic_number: 5, valences: &[3] };
pub const CARBON: Element = Element { symbol: "C", atomic_number: 6, valences: &[4] };
pub const NITROGEN: Element = Element { symbol: "N", atomic_number: 7, valences: &[3, 5] };
pub const OXYGEN: Element = Element { symbol: "O", atomic_number: 8, valences: &[2] };
pub const FLUORINE: Element = Element { symbol: "F", atomic_number: 9, valences: &[1] };
pub const PHOSPHORUS: Element = Element { symbol: "P", atomic_number: 15, valences: &[3, 5] };
pub const SULFUR: Element = Element { symbol: "S", atomic_number: 16, valences: &[2, 4, 6] };
pub const CHLORINE: Element = Element { symbol: "Cl", atomic_number: 17, valences: &[1] };
pub const SELENIUM: Element = Element { symbol: "Se", atomic_number: 34, valences: &[2, 4, 6] };
pub const BROMINE: Element = Element { symbol: "Br", atomic_number: 35, valences: &[1] };
pub const IODINE: Element = Element { symbol: "I", atomic_number: 53, valences: &[1, 3, 5] };

#[rustfmt::skip]
static ELEMENTS: Map<&'static str, Element> = phf_map! {
    // --- Organic subset ---
    "B"  => BORON,
    "C"  => CARBON,
    "N"  => NITROGEN,
    "O"  => OXYGEN,
    "P"  => PHOSPHORUS,
    "S"  => SULFUR,
    "F"  => FLUORINE,
    "Cl" => CHLORINE,
    "Br" => BROMINE,
    "I"  => IODINE,

    // --- Bracket-only elements ---
    "H"  => HYDROGEN,
    "Se" => SELENIUM,
    "Li" => Element { symbol: "Li", atomic_number: 3,  valences: &[1] },
    "Na" => Element { symbol: "Na", atomic_number: 11, valences: &[1] },
    "Mg" => Element { symbol: "Mg", atomic_number: 12, valences: &[2] },
    "Al" => Element { symbol: "Al", atomic_number: 13, valences: &[3] },
    "Si" => Element { symbol: "Si", atomic_number: 14, valences: &[4] },
    "K"  => Element { symbol: "K",  atomic_number: 19, valences: &[1] },
    "Ca" => Element { symbol: "Ca", atomic_number: 20, valences: &[2] },
    "Fe" => Element { symbol: "Fe", atomic_number: 26, valences: &[2, 3] },
    "Cu" => Element { symbol: "Cu", atomic_number: 29, valences: &[1, 2] },
    "Zn" => Element { symbol: "Zn", atomic_number: 30, valences: &[2] },
    "Ge" => Element { symbol: "Ge", atomic_number: 32, valences: &[4] },
    "As" => Element { symbol: "As", atomic_number: 33, valences: &[3, 5] },
    "Sn" => Element { symbol: "Sn", atomic_number: 50, valences: &[2, 4] },
    "Te" => Element { symbol: "Te", atomic_number: 52, valences: &[2, 4, 6] },
};

static AROMATIC_SYMBOLS: Map<&'static str, &'static str> = phf_map! {
    "b" => "B", "c" => "C", "n" => "N", "o" => "O", "p" => "P", "s" => "S",
    "se" => "Se", "as" => "As", "te" => "Te",
};

impl Element {
    /// Looks up an element by its symbol (case-sensitive, e.g. "Cl").
    pub fn from_symbol(symbol: &str) -> Option<Element> {
        ELEMENTS.get(symbol).copied()
    }

    /// Looks up an element from its lowercase aromatic SMILES symbol (e.g. "n", "se").
    pub fn from_aromatic_symbol(symbol: &str) -> Option<Element> {
        AROMATIC_SYMBOLS
            .get(symbol)
            .and_then(|upper| Self::from_symbol(upper))
    }

    /// Whether the element may be written without brackets in SMILES.
    pub fn is_organic_subset(&self) -> bool {
        matches!(
            self.atomic_number,
            5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53
        )
    }

    /// Whether the element has a lowercase aromatic SMILES symbol.
    pub fn has_aromatic_symbol(&self) -> bool {
        AROMATIC_SYMBOLS.values().any(|upper| *upper == self.symbol)
    }

    /// Whether the element is written as a bare lowercase symbol when aromatic.
    pub fn is_bare_aromatic(&self) -> bool {
        matches!(self.atomic_number, 5 | 6 | 7 | 8 | 15 | 16)
    }

    pub fn is_carbon(&self) -> bool {
        self.atomic_number == 6
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }

    /// Heteroatoms are all elements other than carbon and hydrogen.
    pub fn is_heteroatom(&self) -> bool {
        !self.is_carbon() && !self.is_hydrogen()
    }

    /// Elements of groups 15 and 16, whose valence grows with a positive charge.
    pub fn is_pnictogen_or_chalcogen(&self) -> bool {
        matches!(self.atomic_number, 7 | 8 | 15 | 16 | 33 | 34 | 52)
    }

    /// Returns the smallest allowed valence that can accommodate `used` bond orders
    /// for an atom of this element carrying `charge`.
    ///
    /// Charges shift the neutral valences isoelectronically: N+ behaves like C,
    /// O- like F, B- like C. Carbon-group and remaining elements lose one valence
    /// per unit of charge of either sign.
    pub fn target_valence(&self, charge: i8, used: u8) -> Option<u8> {
        let charge = i16::from(charge);
        self.valences
            .iter()
            .map(|&v| {
                let v = i16::from(v);
                match self.atomic_number {
                    5 | 13 => v - charge,
                    _ if self.is_pnictogen_or_chalcogen() => v + charge,
                    _ => v - charge.abs(),
                }
            })
            .filter(|&v| v >= 0)
            .filter_map(|v| u8::try_from(v).ok())
            .find(|&v| v >= used)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}
