use serde::{Deserialize, Serialize};

use crate::chemistry::constants::{
    MASS_CARBON, MASS_HYDROGEN, MASS_NITROGEN, MASS_OXYGEN, MASS_SELENIUM, MASS_SULFUR,
};

/// The elements that occur in amino acid residues
#[derive(
    Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Element {
    /// Carbon
    C,
    /// Hydrogen
    H,
    /// Nitrogen
    N,
    /// Oxygen
    O,
    /// Sulfur
    S,
    /// Selenium
    Se,
}

impl Element {
    /// The monoisotopic mass of the most abundant isotope
    pub const fn monoisotopic_mass(self) -> f64 {
        match self {
            Self::C => MASS_CARBON,
            Self::H => MASS_HYDROGEN,
            Self::N => MASS_NITROGEN,
            Self::O => MASS_OXYGEN,
            Self::S => MASS_SULFUR,
            Self::Se => MASS_SELENIUM,
        }
    }

    /// Get the element from the atom code used in isotopic modification definitions.
    /// Only single letter codes are supported, selenium is never used as an isotopic label.
    pub fn from_atom_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(Self::C),
            'H' => Some(Self::H),
            'N' => Some(Self::N),
            'O' => Some(Self::O),
            'S' => Some(Self::S),
            _ => None,
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The number of atoms per element of a residue or peptide
#[derive(
    Copy, Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
pub struct ElementalComposition {
    /// Carbon count
    pub c: i32,
    /// Hydrogen count
    pub h: i32,
    /// Nitrogen count
    pub n: i32,
    /// Oxygen count
    pub o: i32,
    /// Sulfur count
    pub s: i32,
    /// Selenium count
    pub se: i32,
}

impl ElementalComposition {
    /// Create a new composition without selenium
    pub const fn new(c: i32, h: i32, n: i32, o: i32, s: i32) -> Self {
        Self { c, h, n, o, s, se: 0 }
    }

    /// Get the number of atoms of the given element
    pub const fn count(&self, element: Element) -> i32 {
        match element {
            Element::C => self.c,
            Element::H => self.h,
            Element::N => self.n,
            Element::O => self.o,
            Element::S => self.s,
            Element::Se => self.se,
        }
    }

    /// The monoisotopic mass of this composition
    pub fn monoisotopic_mass(&self) -> f64 {
        [
            Element::C,
            Element::H,
            Element::N,
            Element::O,
            Element::S,
            Element::Se,
        ]
        .into_iter()
        .map(|e| f64::from(self.count(e)) * e.monoisotopic_mass())
        .sum()
    }
}

impl std::ops::Add for ElementalComposition {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            c: self.c + rhs.c,
            h: self.h + rhs.h,
            n: self.n + rhs.n,
            o: self.o + rhs.o,
            s: self.s + rhs.s,
            se: self.se + rhs.se,
        }
    }
}

impl std::ops::AddAssign for ElementalComposition {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for ElementalComposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in [
            Element::C,
            Element::H,
            Element::N,
            Element::O,
            Element::S,
            Element::Se,
        ] {
            match self.count(element) {
                0 => (),
                1 => write!(f, "{element}")?,
                n => write!(f, "{element}{n}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn glycine_residue() {
        let glycine = ElementalComposition::new(2, 3, 1, 1, 0);
        assert!((glycine.monoisotopic_mass() - 57.021_463_72).abs() < 1e-6);
        assert_eq!(glycine.to_string(), "C2H3NO");
    }

    #[test]
    fn atom_codes() {
        assert_eq!(Element::from_atom_code('n'), Some(Element::N));
        assert_eq!(Element::from_atom_code('X'), None);
    }
}
