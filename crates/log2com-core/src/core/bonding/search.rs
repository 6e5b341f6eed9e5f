use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Produces the atom pairs that may lie within a cutoff distance of each other.
///
/// Implementations may over-report (the caller re-checks every distance) but
/// must never drop a pair closer than `cutoff`. Pairs are returned as
/// `(i, j)` with `i < j`, sorted ascending.
pub trait NeighborSearch {
    fn candidate_pairs(&self, positions: &[Point3<f64>], cutoff: f64) -> Vec<(usize, usize)>;
}

/// Exhaustive pair enumeration, O(n²).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPairs;

impl NeighborSearch for AllPairs {
    fn candidate_pairs(&self, positions: &[Point3<f64>], _cutoff: f64) -> Vec<(usize, usize)> {
        let n = positions.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect()
    }
}

/// Uniform grid with cells at least `cutoff` wide; only atoms in the same or
/// adjacent cells are paired.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellGrid;

type CellKey = (i64, i64, i64);

impl CellGrid {
    fn cell_of(point: &Point3<f64>, origin: &Point3<f64>, cell_size: f64) -> CellKey {
        let rel = (point - origin) / cell_size;
        (
            rel.x.floor() as i64,
            rel.y.floor() as i64,
            rel.z.floor() as i64,
        )
    }
}

impl NeighborSearch for CellGrid {
    fn candidate_pairs(&self, positions: &[Point3<f64>], cutoff: f64) -> Vec<(usize, usize)> {
        if positions.len() < 2 {
            return Vec::new();
        }
        // A zero cutoff still has to find coincident atoms.
        let cell_size = if cutoff.is_finite() && cutoff > 0.0 {
            cutoff
        } else {
            1.0
        };

        let origin = positions.iter().fold(positions[0], |acc, p| {
            Point3::new(acc.x.min(p.x), acc.y.min(p.y), acc.z.min(p.z))
        });

        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (i, p) in positions.iter().enumerate() {
            cells
                .entry(Self::cell_of(p, &origin, cell_size))
                .or_default()
                .push(i);
        }

        let mut pairs = Vec::new();
        for (i, p) in positions.iter().enumerate() {
            let (cx, cy, cz) = Self::cell_of(p, &origin, cell_size);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(members) = cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                            continue;
                        };
                        pairs.extend(members.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                    }
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

/// Selects which [`NeighborSearch`] implementation bond perception uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    #[default]
    AllPairs,
    CellGrid,
}

impl SearchStrategy {
    pub fn candidate_pairs(&self, positions: &[Point3<f64>], cutoff: f64) -> Vec<(usize, usize)> {
        match self {
            SearchStrategy::AllPairs => AllPairs.candidate_pairs(positions, cutoff),
            SearchStrategy::CellGrid => CellGrid.candidate_pairs(positions, cutoff),
        }
    }
}
