use super::atom::Atom;
use crate::core::bonding::graph::BondGraph;
use crate::core::bonding::perception::{self, PerceptionConfig, PerceptionError};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoleculeError {
    #[error("Atom is not well-formed (symbol '{name}', position {position:?})")]
    InvalidAtom { name: String, position: [f64; 3] },

    #[error("Atom {0} is not part of the molecule")]
    AtomNotFound(Atom),

    #[error("Atom index {index} is out of bounds for a molecule of {len} atoms")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Bond perception failed: {0}")]
    Perception(#[from] PerceptionError),
}

/// Whether a molecule's bond graph reflects its current atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BondState<'a> {
    /// The atoms changed (or were just loaded) and no graph has been derived since.
    Stale,
    /// The graph was derived from exactly the current atoms.
    Current(&'a BondGraph),
}

impl BondState<'_> {
    pub fn is_current(&self) -> bool {
        matches!(self, BondState::Current(_))
    }
}

/// An ordered set of atoms plus the bond graph derived from them.
///
/// The index of an atom in [`Molecule::atoms`] is its atom number. Replacing
/// an atom keeps every other number unchanged; removing one shifts the atoms
/// after it down by one. Any change to the atoms marks the bonds stale until
/// [`Molecule::compute_bonds`] is called again.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Option<BondGraph>,
    perception: PerceptionConfig,
}

impl Molecule {
    /// Creates a molecule from a private copy of `atoms`.
    ///
    /// Later changes to the caller's slice have no effect on the molecule.
    /// Atoms are stored as given; validation happens on the mutating
    /// operations.
    pub fn new(name: &str, atoms: &[Atom]) -> Self {
        Self {
            name: name.to_string(),
            atoms: atoms.to_vec(),
            bonds: None,
            perception: PerceptionConfig::default(),
        }
    }

    /// Creates a molecule after checking that every atom is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::InvalidAtom`] for the first malformed atom.
    pub fn from_atoms(name: &str, atoms: &[Atom]) -> Result<Self, MoleculeError> {
        atoms.iter().try_for_each(ensure_well_formed)?;
        Ok(Self::new(name, atoms))
    }

    /// Replaces the bond perception settings. Bonds become stale.
    pub fn with_perception(mut self, config: PerceptionConfig) -> Self {
        self.perception = config;
        self.bonds = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn perception(&self) -> &PerceptionConfig {
        &self.perception
    }

    pub fn bond_state(&self) -> BondState<'_> {
        match &self.bonds {
            Some(graph) => BondState::Current(graph),
            None => BondState::Stale,
        }
    }

    /// The bond graph, or `None` while the bonds are stale.
    pub fn bonds(&self) -> Option<&BondGraph> {
        self.bonds.as_ref()
    }

    pub fn into_atoms(self) -> Vec<Atom> {
        self.atoms
    }

    /// Appends an atom to the end of the molecule.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::InvalidAtom`] if the atom is not well-formed.
    pub fn add_atom(&mut self, atom: Atom) -> Result<(), MoleculeError> {
        ensure_well_formed(&atom)?;
        trace!(atom = %atom, index = self.atoms.len(), "Adding atom.");
        self.atoms.push(atom);
        self.invalidate();
        Ok(())
    }

    /// Removes the first atom equal to `atom` and returns its former index.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::InvalidAtom`] for a malformed atom and
    /// [`MoleculeError::AtomNotFound`] if no atom matches. The molecule is
    /// unchanged on error.
    pub fn remove_atom(&mut self, atom: &Atom) -> Result<usize, MoleculeError> {
        ensure_well_formed(atom)?;
        let index = self
            .atoms
            .iter()
            .position(|a| a == atom)
            .ok_or_else(|| MoleculeError::AtomNotFound(atom.clone()))?;
        self.atoms.remove(index);
        trace!(atom = %atom, index, "Removed atom.");
        self.invalidate();
        Ok(index)
    }

    /// Puts `atom` at `index` and returns the atom it displaced.
    ///
    /// All other atoms keep their indices.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::IndexOutOfBounds`] if `index >= len()` and
    /// [`MoleculeError::InvalidAtom`] for a malformed atom. The molecule is
    /// unchanged on error.
    pub fn replace_atom(&mut self, index: usize, atom: Atom) -> Result<Atom, MoleculeError> {
        let len = self.atoms.len();
        let slot = self
            .atoms
            .get_mut(index)
            .ok_or(MoleculeError::IndexOutOfBounds { index, len })?;
        ensure_well_formed(&atom)?;
        let old = std::mem::replace(slot, atom);
        trace!(index, old = %old, "Replaced atom.");
        self.invalidate();
        Ok(old)
    }

    /// Derives the bond graph from the current atoms and caches it.
    ///
    /// Calling this twice without an intervening mutation yields the same graph.
    ///
    /// # Errors
    ///
    /// Propagates [`PerceptionError`] from the perception step; the bonds
    /// stay stale in that case.
    pub fn compute_bonds(&mut self) -> Result<&BondGraph, MoleculeError> {
        let graph = perception::perceive_bonds(&self.atoms, &self.perception)?;
        debug!(
            molecule = %self.name,
            atoms = graph.node_count(),
            bonds = graph.edge_count(),
            "Bond graph is current."
        );
        Ok(self.bonds.insert(graph))
    }

    fn invalidate(&mut self) {
        self.bonds = None;
    }
}

fn ensure_well_formed(atom: &Atom) -> Result<(), MoleculeError> {
    if atom.is_well_formed() {
        Ok(())
    } else {
        let p = atom.position();
        Err(MoleculeError::InvalidAtom {
            name: atom.name().to_string(),
            position: [p.x, p.y, p.z],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bonding::perception::UnknownElementPolicy;
    use std::collections::HashSet;

    fn ch_pair(h_z: f64) -> Vec<Atom> {
        vec![
            Atom::from_record("C", 0.0, 0.0, 0.0),
            Atom::from_record("H", 0.0, 0.0, h_z),
        ]
    }

    fn water() -> Molecule {
        Molecule::new(
            "water",
            &[
                Atom::from_record("O", 0.0, 0.0, 0.117),
                Atom::from_record("H", 0.0, 0.757, -0.467),
                Atom::from_record("H", 0.0, -0.757, -0.467),
            ],
        )
    }

    #[test]
    fn new_molecule_starts_with_stale_bonds() {
        let molecule = water();
        assert_eq!(molecule.name(), "water");
        assert_eq!(molecule.len(), 3);
        assert!(!molecule.bond_state().is_current());
        assert!(molecule.bonds().is_none());
    }

    #[test]
    fn constructor_copies_caller_atoms() {
        let mut source = ch_pair(1.1);
        let molecule = Molecule::new("ch", &source);
        source[0] = Atom::at_origin("N");
        source.push(Atom::at_origin("O"));
        assert_eq!(molecule.atoms(), ch_pair(1.1).as_slice());
    }

    #[test]
    fn from_atoms_validates_every_atom() {
        assert!(Molecule::from_atoms("ok", &ch_pair(1.1)).is_ok());
        let err = Molecule::from_atoms("bad", &[Atom::at_origin("C"), Atom::at_origin("")])
            .unwrap_err();
        assert!(matches!(err, MoleculeError::InvalidAtom { ref name, .. } if name.is_empty()));
    }

    #[test]
    fn bonded_pair_yields_symmetric_map() {
        let atoms = ch_pair(1.1);
        let mut molecule = Molecule::new("ch", &atoms);
        let map = molecule.compute_bonds().unwrap().to_map();

        let c = &atoms[0];
        let h = &atoms[1];
        assert_eq!(map[c], HashSet::from([h.clone()]));
        assert_eq!(map[h], HashSet::from([c.clone()]));
    }

    #[test]
    fn distant_pair_yields_empty_neighbor_sets() {
        let atoms = ch_pair(5.0);
        let mut molecule = Molecule::new("ch", &atoms);
        let map = molecule.compute_bonds().unwrap().to_map();

        assert_eq!(map.len(), 2);
        assert!(map[&atoms[0]].is_empty());
        assert!(map[&atoms[1]].is_empty());
    }

    #[test]
    fn compute_bonds_is_idempotent() {
        let mut molecule = water();
        let first = molecule.compute_bonds().unwrap().clone();
        let second = molecule.compute_bonds().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.edge_count(), 2);
    }

    #[test]
    fn add_atom_appends_and_invalidates_bonds() {
        let mut molecule = water();
        molecule.compute_bonds().unwrap();
        let extra = Atom::from_record("Ne", 10.0, 0.0, 0.0);
        molecule.add_atom(extra.clone()).unwrap();

        assert_eq!(molecule.atom(3), Some(&extra));
        assert!(molecule.bonds().is_none());
    }

    #[test]
    fn add_atom_rejects_malformed_atom() {
        let mut molecule = water();
        molecule.compute_bonds().unwrap();
        let err = molecule
            .add_atom(Atom::from_record("C", f64::NAN, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, MoleculeError::InvalidAtom { .. }));
        assert_eq!(molecule.len(), 3);
        assert!(molecule.bond_state().is_current());
    }

    #[test]
    fn remove_atom_drops_first_match() {
        let dup = Atom::from_record("H", 1.0, 1.0, 1.0);
        let mut molecule = Molecule::new(
            "dups",
            &[dup.clone(), Atom::at_origin("C"), dup.clone()],
        );
        assert_eq!(molecule.remove_atom(&dup), Ok(0));
        assert_eq!(molecule.atoms(), &[Atom::at_origin("C"), dup]);
    }

    #[test]
    fn remove_missing_atom_leaves_molecule_untouched() {
        let mut molecule = water();
        molecule.compute_bonds().unwrap();
        let before = molecule.atoms().to_vec();

        let missing = Atom::at_origin("Cl");
        let err = molecule.remove_atom(&missing).unwrap_err();

        assert_eq!(err, MoleculeError::AtomNotFound(missing));
        assert_eq!(molecule.atoms(), before.as_slice());
        assert!(molecule.bond_state().is_current());
    }

    #[test]
    fn remove_atom_invalidates_bonds() {
        let mut molecule = water();
        molecule.compute_bonds().unwrap();
        let h = molecule.atom(1).unwrap().clone();
        molecule.remove_atom(&h).unwrap();
        assert!(molecule.bonds().is_none());
        assert_eq!(molecule.len(), 2);
    }

    #[test]
    fn replace_atom_only_changes_target_index() {
        let mut molecule = water();
        let before = molecule.atoms().to_vec();
        let new_atom = Atom::from_record("F", 0.0, 0.9, -0.4);

        let old = molecule.replace_atom(1, new_atom.clone()).unwrap();

        assert_eq!(old, before[1]);
        assert_eq!(molecule.atom(1), Some(&new_atom));
        for i in [0, 2] {
            assert_eq!(molecule.atom(i), Some(&before[i]));
        }
    }

    #[test]
    fn replace_atom_out_of_bounds_fails() {
        let mut molecule = water();
        let err = molecule.replace_atom(3, Atom::at_origin("C")).unwrap_err();
        assert_eq!(err, MoleculeError::IndexOutOfBounds { index: 3, len: 3 });
        assert_eq!(molecule.len(), 3);
    }

    #[test]
    fn replace_atom_invalidates_bonds() {
        let mut molecule = water();
        molecule.compute_bonds().unwrap();
        molecule
            .replace_atom(0, Atom::from_record("S", 0.0, 0.0, 0.1))
            .unwrap();
        assert!(!molecule.bond_state().is_current());
    }

    #[test]
    fn recomputation_reflects_mutation() {
        let atoms = ch_pair(5.0);
        let mut molecule = Molecule::new("ch", &atoms);
        assert_eq!(molecule.compute_bonds().unwrap().edge_count(), 0);

        molecule
            .replace_atom(1, Atom::from_record("H", 0.0, 0.0, 1.1))
            .unwrap();
        assert_eq!(molecule.compute_bonds().unwrap().edge_count(), 1);
    }

    #[test]
    fn strict_perception_error_keeps_bonds_stale() {
        let mut molecule = Molecule::new(
            "ghost",
            &[Atom::at_origin("C"), Atom::from_record("Bq", 0.0, 0.0, 1.0)],
        )
        .with_perception(PerceptionConfig {
            unknown_elements: UnknownElementPolicy::Strict,
            ..PerceptionConfig::default()
        });

        let err = molecule.compute_bonds().unwrap_err();
        assert!(matches!(
            err,
            MoleculeError::Perception(PerceptionError::UnknownElement { index: 1, .. })
        ));
        assert!(molecule.bonds().is_none());
    }

    #[test]
    fn computed_graph_is_the_cached_state() {
        let mut molecule = water();
        let computed = molecule.compute_bonds().unwrap().clone();
        match molecule.bond_state() {
            BondState::Current(cached) => assert_eq!(cached, &computed),
            BondState::Stale => panic!("bonds should be current after compute_bonds"),
        }
        assert_eq!(molecule.bonds(), Some(&computed));
    }

    #[test]
    fn ghost_atom_on_top_of_carbon_stays_unbonded() {
        let mut molecule = Molecule::new(
            "ghost",
            &[Atom::at_origin("C"), Atom::at_origin("Bq")],
        );
        let graph = molecule.compute_bonds().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }
}
