//! Structural perception on molecular graphs.
//!
//! - [`rings`] - Cyclic atoms and bonds, ring systems and the SSSR
//! - [`aromaticity`] - Hückel aromaticity under a configurable model
//! - [`kekulize`] - Double-bond assignment for aromatic input

pub mod aromaticity;
pub mod kekulize;
pub mod rings;
