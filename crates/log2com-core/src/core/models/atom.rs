use crate::core::bonding::radii;
use nalgebra::Point3;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An element symbol placed at a point in space.
///
/// Atoms are value types: two atoms with the same symbol and the same
/// coordinates are equal and hash identically, so they can be used
/// interchangeably as map keys. There are no setters; a changed atom is a
/// new atom, and a [`Molecule`](super::molecule::Molecule) swaps it in with
/// `replace_atom` rather than editing in place.
#[derive(Debug, Clone)]
pub struct Atom {
    name: String,
    position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` from an element symbol and a position in Angstroms.
    ///
    /// The symbol is not checked against the periodic table; any short token
    /// is accepted here. Well-formedness is enforced when the atom enters a
    /// molecule.
    ///
    /// # Arguments
    ///
    /// * `name` - The element symbol (e.g., "C", "Cl").
    /// * `position` - The Cartesian coordinates of the atom.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            position,
        }
    }

    /// Creates an atom at the origin.
    pub fn at_origin(name: &str) -> Self {
        Self::new(name, Point3::origin())
    }

    /// Creates an atom from a raw `(symbol, x, y, z)` geometry record.
    pub fn from_record(name: &str, x: f64, y: f64, z: f64) -> Self {
        Self::new(name, Point3::new(x, y, z))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Looks up the covalent radius of this atom's element in Angstroms.
    ///
    /// Returns `None` for symbols missing from the radius table.
    pub fn covalent_radius(&self) -> Option<f64> {
        radii::covalent_radius(&self.name)
    }

    /// Euclidean distance to another atom in Angstroms.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Checks whether the atom can be stored in a molecule.
    ///
    /// A well-formed atom has a non-empty symbol without whitespace and three
    /// finite coordinates. Non-finite coordinates would make equality and
    /// distance checks meaningless.
    pub fn is_well_formed(&self) -> bool {
        !self.name.is_empty()
            && !self.name.chars().any(char::is_whitespace)
            && self.position.iter().all(|c| c.is_finite())
    }

    fn coordinate_bits(&self) -> [u64; 3] {
        // -0.0 and 0.0 must land on the same key.
        let bits = |c: f64| if c == 0.0 { 0u64 } else { c.to_bits() };
        [
            bits(self.position.x),
            bits(self.position.y),
            bits(self.position.z),
        ]
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self::at_origin("X")
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.coordinate_bits() == other.coordinate_bits()
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.coordinate_bits().hash(state);
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<2}{:>14.6}{:>14.6}{:>14.6}",
            self.name, self.position.x, self.position.y, self.position.z
        )
    }
}
