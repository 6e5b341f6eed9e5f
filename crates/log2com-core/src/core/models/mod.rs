//! # Core Models Module
//!
//! In-memory representation of a single molecular geometry.
//!
//! - [`atom`] - Immutable element symbol + position value type
//! - [`molecule`] - Ordered atom collection with a lazily derived bond graph
//!
//! ```
//! use log2com::core::models::{atom::Atom, molecule::Molecule};
//!
//! let atoms = [
//!     Atom::from_record("C", 0.0, 0.0, 0.0),
//!     Atom::from_record("H", 0.0, 0.0, 1.1),
//! ];
//! let mut molecule = Molecule::new("methylidyne", &atoms);
//! let bonds = molecule.compute_bonds()?;
//! assert!(bonds.is_bonded(0, 1));
//! # Ok::<(), log2com::core::models::molecule::MoleculeError>(())
//! ```

pub mod atom;
pub mod molecule;
