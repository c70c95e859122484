//! # Scaffold++ Core Library
//!
//! A library for the rule-based dissection of small molecules into scaffold hierarchies:
//! scaffold trees built with the Schuffenhauer prioritization rules and scaffold networks
//! built by exhaustive ring removal.
//!
//! ## Architectural Philosophy
//!
//! The library follows a layered architecture to keep each concern separate, testable and
//! replaceable.
//!
//! - **[`core`]: The Foundation.** Stateless molecular graph models (`Molecule`), SMILES
//!   input and output, ring and aromaticity perception, canonical identity, and the
//!   structure-editing primitives.
//!
//! - **[`engine`]: The Logic Core.** Scaffold extraction in five abstraction modes, ring
//!   removal with hybridisation restoration, the prioritization rule cascade, and the
//!   enumeration of removal sequences.
//!
//! - **[`graph`]: The Hierarchies.** Arena-backed scaffold trees and networks with
//!   identity-keyed nodes, levels, origins and an adjacency-matrix view.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It ties the
//!   `engine` and `graph` together to build scaffold networks and Schuffenhauer trees from
//!   sets of molecules.

pub mod core;
pub mod engine;
pub mod graph;
pub mod workflows;
