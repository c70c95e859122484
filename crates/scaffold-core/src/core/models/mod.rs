//! # Core Models Module
//!
//! This module contains the data structures used to represent molecules as graphs,
//! providing the foundation for every scaffold operation in the library.
//!
//! ## Overview
//!
//! Molecules are stored as hydrogen-suppressed graphs in Kekulé form. Aromaticity is
//! a perceived property recorded as flags on atoms and bonds, never as a bond order,
//! so that editing operations (ring removal, bond-order reduction) always act on a
//! well-defined valence model.
//!
//! ## Key Components
//!
//! - [`element`] - Static element table with default valences and aromatic symbols
//! - [`atom`] - Atom representation with charge, implicit hydrogens and aromatic flag
//! - [`topology`] - Bond orders and bond connectivity
//! - [`molecule`] - The molecular graph with slot map storage and adjacency cache
//! - [`ids`] - Unique identifier types for atoms and bonds
//!
//! ## Usage
//!
//! ```ignore
//! use scaffoldpp::core::models::{atom::Atom, molecule::Molecule, topology::BondOrder};
//!
//! let mut ethanol = Molecule::new();
//! let c1 = ethanol.add_atom(Atom::carbon(3));
//! let c2 = ethanol.add_atom(Atom::carbon(2));
//! ethanol.add_bond(c1, c2, BondOrder::Single);
//! ```

pub mod atom;
pub mod element;
pub mod ids;
pub mod molecule;
pub mod topology;
