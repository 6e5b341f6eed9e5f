//! # Core Module
//!
//! The building blocks of log-to-job conversion.
//!
//! - **Molecular Representation** ([`models`]) - Atoms and molecules
//! - **Connectivity** ([`bonding`]) - Covalent-radius bond perception
//! - **File I/O** ([`io`]) - Geometry readers, the extension registry, job settings and the job-deck writer
//!
//! Nothing in [`models`] or [`bonding`] touches the filesystem; all reading
//! and writing goes through [`io`].

pub mod bonding;
pub mod io;
pub mod models;
