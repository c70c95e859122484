//! # Core Module
//!
//! This module provides the molecular-structure layer the scaffold engine is built on:
//! graph models, SMILES input and output, ring and aromaticity perception, canonical
//! identity, and the editing primitives behind the scaffold abstractions.
//!
//! ## Overview
//!
//! Everything in this module is stateless with respect to the scaffold engine: a
//! [`models::molecule::Molecule`] goes in, a new molecule, a perception result or a
//! string comes out. The [`crate::engine`] layer composes these capabilities into scaffold
//! extraction, ring removal and the prioritization rules.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds and molecules
//! - **File I/O** ([`io`]) - SMILES parsing with kekulization and SMILES files
//! - **Perception** ([`perception`]) - Ring bonds, ring systems, SSSR and aromaticity
//! - **Canonical Identity** ([`canon`]) - Canonical ranking and canonical SMILES
//! - **Editing** ([`editing`]) - Bond-order reduction and atom-type abstraction
//!
//! ## Key Capabilities
//!
//! - **Kekulé-first storage** so that editing never has to reason about delocalised bonds
//! - **Configurable aromaticity** through electron-donation and cycle-set models
//! - **Deterministic canonical SMILES** used as the sole equality key of scaffolds

pub mod canon;
pub mod editing;
pub mod io;
pub mod models;
pub mod perception;
