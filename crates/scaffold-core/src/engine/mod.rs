//! # Engine Module
//!
//! This module implements the scaffold engine: the decomposition of molecules into
//! scaffolds, rings, linkers and side chains, and the stepwise removal of rings that
//! produces the scaffold hierarchies.
//!
//! ## Overview
//!
//! The engine is stateless. Every operation takes an immutable [`config::ScaffoldConfig`]
//! and returns new molecules; inputs are never modified. Scaffolds are compared only
//! through their canonical SMILES, computed with the configured flavor.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scaffold modes, aromaticity and identity options
//! - **Extraction** ([`extraction`]) - Scaffold, ring, linker and side-chain fragments
//! - **Ring Removal** ([`removal`]) - Removal of one ring with hybridisation restoration
//! - **Prioritization** ([`rules`]) - The Schuffenhauer rule cascade
//! - **Enumeration** ([`enumeration`]) - Exhaustive and prioritized removal sequences
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Key Capabilities
//!
//! - **Five abstraction levels** from full scaffolds down to basic wire frames
//! - **Terminal ring detection** so that removals never split a scaffold
//! - **Deterministic prioritization** ending in a tie-break on canonical identity

pub mod config;
pub mod enumeration;
pub mod error;
pub mod extraction;
pub mod progress;
pub mod removal;
pub mod rules;
