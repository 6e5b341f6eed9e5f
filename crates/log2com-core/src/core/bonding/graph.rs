use crate::core::models::atom::Atom;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Undirected connectivity over a snapshot of a molecule's atoms.
///
/// Nodes are atom indices, so duplicated atoms (same symbol and position)
/// stay distinct nodes instead of collapsing into one. Value-based queries
/// such as [`BondGraph::bonded_to`] resolve an atom to the first index
/// holding that value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BondGraph {
    atoms: Vec<Atom>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl BondGraph {
    /// Builds a graph over `atoms` with the given index pairs as edges.
    ///
    /// Edges are stored in both directions. Self-loops and pairs referring
    /// to indices outside `atoms` are ignored.
    pub fn from_edges(atoms: Vec<Atom>, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut adjacency = vec![BTreeSet::new(); atoms.len()];
        for (i, j) in edges {
            if i == j || i >= atoms.len() || j >= atoms.len() {
                continue;
            }
            adjacency[i].insert(j);
            adjacency[j].insert(i);
        }
        Self { atoms, adjacency }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn node_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Indices bonded to the atom at `index`, or `None` if there is no such node.
    pub fn neighbors_of(&self, index: usize) -> Option<&BTreeSet<usize>> {
        self.adjacency.get(index)
    }

    pub fn is_bonded(&self, i: usize, j: usize) -> bool {
        self.adjacency.get(i).is_some_and(|n| n.contains(&j))
    }

    /// Index of the first node equal to `atom`.
    pub fn index_of(&self, atom: &Atom) -> Option<usize> {
        self.atoms.iter().position(|a| a == atom)
    }

    /// Atoms bonded to `atom`, in index order.
    ///
    /// Returns `None` if `atom` is not a node of this graph. An isolated atom
    /// yields an empty list.
    pub fn bonded_to(&self, atom: &Atom) -> Option<Vec<&Atom>> {
        let index = self.index_of(atom)?;
        Some(self.adjacency[index].iter().map(|&j| &self.atoms[j]).collect())
    }

    /// Iterates over each bond once as `(i, j)` with `i < j`, in ascending order.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&j| j > i)
                .map(move |&j| (i, j))
        })
    }

    /// Value-keyed view of the graph: every atom maps to the set of atoms it
    /// is bonded to.
    ///
    /// Duplicated atoms share one key here, so their neighbor sets are merged.
    pub fn to_map(&self) -> HashMap<Atom, HashSet<Atom>> {
        let mut map: HashMap<Atom, HashSet<Atom>> = HashMap::with_capacity(self.atoms.len());
        for (i, atom) in self.atoms.iter().enumerate() {
            let entry = map.entry(atom.clone()).or_default();
            entry.extend(self.adjacency[i].iter().map(|&j| self.atoms[j].clone()));
        }
        map
    }
}
