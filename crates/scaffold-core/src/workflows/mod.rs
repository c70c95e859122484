//! # Workflows Module
//!
//! This module provides the high-level entry points that turn sets of molecules into
//! scaffold hierarchies.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. They run the scaffold engine over
//! every input molecule, assemble the results into scaffold graphs, record which
//! molecules each scaffold originates from, and report progress along the way.
//!
//! ## Architecture
//!
//! - **Generator** ([`generator`]) - A configured facade over every scaffold operation
//! - **Scaffold Network** ([`network`]) - All ring-removal scaffolds of all molecules
//!   linked in one network
//! - **Schuffenhauer Trees** ([`tree`]) - Prioritized removal chains merged into trees
//!
//! ## Key Capabilities
//!
//! - **Origin tracking** separating a molecule's own scaffold from derived scaffolds
//! - **Forest assembly** grouping molecules by their root scaffold
//! - **Progress monitoring** through the engine's progress callbacks

pub mod generator;
pub mod network;
pub mod tree;
