//! Distance-based bond perception.
//!
//! Bonds are inferred purely from geometry: two atoms are bonded when they
//! sit no farther apart than the sum of their covalent radii scaled by a
//! tolerance factor. The candidate pairs are supplied by a
//! [`search::NeighborSearch`] strategy, so the exhaustive O(n²) scan can be
//! swapped for a spatial grid without changing the result.

pub mod graph;
pub mod perception;
pub mod radii;
pub mod search;
