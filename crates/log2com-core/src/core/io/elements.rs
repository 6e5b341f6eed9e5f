/// Element symbols indexed by atomic number minus one.
static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Maps an atomic number as printed in geometry tables to an element symbol.
///
/// Gaussian writes ghost atoms as 0 and dummy atoms as -1; they map to
/// "Bq" and "X" respectively.
pub fn symbol_for_atomic_number(number: i32) -> Option<&'static str> {
    match number {
        -1 => Some("X"),
        0 => Some("Bq"),
        n if n > 0 => SYMBOLS.get(n as usize - 1).copied(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_atomic_numbers() {
        assert_eq!(symbol_for_atomic_number(1), Some("H"));
        assert_eq!(symbol_for_atomic_number(6), Some("C"));
        assert_eq!(symbol_for_atomic_number(17), Some("Cl"));
        assert_eq!(symbol_for_atomic_number(118), Some("Og"));
    }

    #[test]
    fn maps_ghost_and_dummy_centers() {
        assert_eq!(symbol_for_atomic_number(0), Some("Bq"));
        assert_eq!(symbol_for_atomic_number(-1), Some("X"));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        assert_eq!(symbol_for_atomic_number(119), None);
        assert_eq!(symbol_for_atomic_number(-2), None);
    }
}
