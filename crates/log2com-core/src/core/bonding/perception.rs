use super::graph::BondGraph;
use super::radii;
use super::search::SearchStrategy;
use crate::core::models::atom::Atom;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Default multiplicative slack applied to the sum of covalent radii.
pub const DEFAULT_TOLERANCE: f64 = 1.2;

/// How bond perception treats element symbols missing from the radius table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownElementPolicy {
    /// Unknown elements are kept as nodes but never bond.
    #[default]
    Permissive,
    /// Unknown elements abort perception with [`PerceptionError::UnknownElement`].
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PerceptionConfig {
    /// Two atoms bond when their distance is at most `(r1 + r2) * tolerance`.
    pub tolerance: f64,
    pub unknown_elements: UnknownElementPolicy,
    pub search: SearchStrategy,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            unknown_elements: UnknownElementPolicy::default(),
            search: SearchStrategy::default(),
        }
    }
}

impl PerceptionConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn strict(mut self) -> Self {
        self.unknown_elements = UnknownElementPolicy::Strict;
        self
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    fn validate(&self) -> Result<(), PerceptionError> {
        if self.tolerance.is_finite() && self.tolerance > 0.0 {
            Ok(())
        } else {
            Err(PerceptionError::InvalidTolerance(self.tolerance))
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerceptionError {
    #[error("No covalent radius known for element '{symbol}' (atom {index})")]
    UnknownElement { symbol: String, index: usize },

    #[error("Bond tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),
}

/// Largest distance at which two atoms with the given radii still count as bonded.
pub fn bond_threshold(radius_a: f64, radius_b: f64, tolerance: f64) -> f64 {
    (radius_a + radius_b) * tolerance
}

/// Decides whether two atoms are bonded. An atom whose element has no known
/// radius never bonds.
pub fn is_bonded(a: &Atom, b: &Atom, tolerance: f64) -> bool {
    match (a.covalent_radius(), b.covalent_radius()) {
        (Some(ra), Some(rb)) => a.distance_to(b) <= bond_threshold(ra, rb, tolerance),
        _ => false,
    }
}

/// Derives the complete bond graph for `atoms`.
///
/// Every atom becomes a node, whether or not it bonds. The returned graph
/// holds its own copy of the atoms it was built from.
///
/// # Errors
///
/// Returns [`PerceptionError::InvalidTolerance`] for a non-positive or
/// non-finite tolerance, and [`PerceptionError::UnknownElement`] for a symbol
/// without a radius when the policy is [`UnknownElementPolicy::Strict`].
#[instrument(skip_all, fields(atoms = atoms.len()))]
pub fn perceive_bonds(atoms: &[Atom], config: &PerceptionConfig) -> Result<BondGraph, PerceptionError> {
    config.validate()?;

    let radii = resolve_radii(atoms, config.unknown_elements)?;
    let positions: Vec<Point3<f64>> = atoms.iter().map(|a| *a.position()).collect();
    let max_radius = radii.iter().flatten().copied().fold(0.0, f64::max);
    let cutoff = bond_threshold(max_radius, max_radius, config.tolerance);

    let candidates = config.search.candidate_pairs(&positions, cutoff);
    let edges: Vec<(usize, usize)> = candidates
        .into_iter()
        .filter(|&(i, j)| match (radii[i], radii[j]) {
            (Some(ri), Some(rj)) => {
                nalgebra::distance(&positions[i], &positions[j])
                    <= bond_threshold(ri, rj, config.tolerance)
            }
            _ => false,
        })
        .collect();

    debug!(
        bonds = edges.len(),
        search = ?config.search,
        "Perceived bonds from covalent radii."
    );
    Ok(BondGraph::from_edges(atoms.to_vec(), edges))
}

/// Radius per atom; `None` marks an unknown element, which is excluded from bonding.
fn resolve_radii(
    atoms: &[Atom],
    policy: UnknownElementPolicy,
) -> Result<Vec<Option<f64>>, PerceptionError> {
    atoms
        .iter()
        .enumerate()
        .map(|(index, atom)| match radii::covalent_radius(atom.name()) {
            Some(r) => Ok(Some(r)),
            None => match policy {
                UnknownElementPolicy::Permissive => {
                    warn!(
                        "No covalent radius for '{}' (atom {}); it will not bond.",
                        atom.name(),
                        index
                    );
                    Ok(None)
                }
                UnknownElementPolicy::Strict => Err(PerceptionError::UnknownElement {
                    symbol: atom.name().to_string(),
                    index,
                }),
            },
        })
        .collect()
}
