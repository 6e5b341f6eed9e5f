//! # log2com Core Library
//!
//! Turns optimized geometries from quantum-chemistry output files into input
//! decks for the next job.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** The molecular model (`Atom`, `Molecule`),
//!   distance-based bond perception, and the file formats on either side of
//!   the conversion.
//!
//! - **[`workflows`]: The Public API.** End-to-end conversion of one file or a
//!   whole batch, with progress reporting.

pub mod core;
pub mod workflows;
