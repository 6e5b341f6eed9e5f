//! # Workflows Module
//!
//! End-to-end conversions built on [`crate::core`].
//!
//! - **Conversion Workflow** ([`convert`]) - Reads a geometry, builds a
//!   molecule, perceives its bonds, and writes a job deck; for one file or a
//!   batch with per-file error collection.
//! - **Progress Reporting** ([`progress`]) - Callback hook for front ends
//!   that want to display batch progress.

pub mod convert;
pub mod progress;
