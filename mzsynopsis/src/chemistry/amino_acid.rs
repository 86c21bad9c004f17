use serde::{Deserialize, Serialize};

use crate::chemistry::ElementalComposition;

/// A single residue that can be used in a peptide sequence
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct AminoAcidResidue {
    /// The one letter code, always uppercase
    pub symbol: char,
    /// The monoisotopic mass of the residue (the amino acid minus water)
    pub mass: f64,
    /// The elemental composition if known, needed to apply isotopic modifications
    pub composition: Option<ElementalComposition>,
}

impl AminoAcidResidue {
    /// Create a residue based on its composition, the mass is derived from the composition
    pub fn from_composition(symbol: char, composition: ElementalComposition) -> Self {
        Self {
            symbol: symbol.to_ascii_uppercase(),
            mass: composition.monoisotopic_mass(),
            composition: Some(composition),
        }
    }
}

/// The residue compositions for all one letter codes that are understood without configuration.
/// B and Z are given the composition of N and Q, J and X that of L.
pub(crate) const STANDARD_RESIDUES: &[(char, ElementalComposition)] = &[
    ('A', ElementalComposition::new(3, 5, 1, 1, 0)),
    ('B', ElementalComposition::new(4, 6, 2, 2, 0)),
    ('C', ElementalComposition::new(3, 5, 1, 1, 1)),
    ('D', ElementalComposition::new(4, 5, 1, 3, 0)),
    ('E', ElementalComposition::new(5, 7, 1, 3, 0)),
    ('F', ElementalComposition::new(9, 9, 1, 1, 0)),
    ('G', ElementalComposition::new(2, 3, 1, 1, 0)),
    ('H', ElementalComposition::new(6, 7, 3, 1, 0)),
    ('I', ElementalComposition::new(6, 11, 1, 1, 0)),
    ('J', ElementalComposition::new(6, 11, 1, 1, 0)),
    ('K', ElementalComposition::new(6, 12, 2, 1, 0)),
    ('L', ElementalComposition::new(6, 11, 1, 1, 0)),
    ('M', ElementalComposition::new(5, 9, 1, 1, 1)),
    ('N', ElementalComposition::new(4, 6, 2, 2, 0)),
    ('O', ElementalComposition::new(5, 10, 2, 1, 0)),
    ('P', ElementalComposition::new(5, 7, 1, 1, 0)),
    ('Q', ElementalComposition::new(5, 8, 2, 2, 0)),
    ('R', ElementalComposition::new(6, 12, 4, 1, 0)),
    ('S', ElementalComposition::new(3, 5, 1, 2, 0)),
    ('T', ElementalComposition::new(4, 7, 1, 2, 0)),
    (
        'U',
        ElementalComposition {
            c: 3,
            h: 5,
            n: 1,
            o: 1,
            s: 0,
            se: 1,
        },
    ),
    ('V', ElementalComposition::new(5, 9, 1, 1, 0)),
    ('W', ElementalComposition::new(11, 10, 2, 1, 0)),
    ('X', ElementalComposition::new(6, 11, 1, 1, 0)),
    ('Y', ElementalComposition::new(9, 9, 1, 2, 0)),
    ('Z', ElementalComposition::new(5, 8, 2, 2, 0)),
];

/// The twenty proteinogenic amino acids
pub const CANONICAL_AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'Y',
];
