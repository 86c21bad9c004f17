use std::collections::BTreeMap;

use context_error::*;
use serde::{Deserialize, Serialize};

use crate::chemistry::{
    AminoAcidResidue, Element, ElementalComposition,
    amino_acid::STANDARD_RESIDUES,
    constants::{MASS_HYDROGEN, MASS_HYDROXYL, MASS_PROTON},
};

/// A mass that has to be added on top of the residue masses of a peptide
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct MassAdjustment {
    /// 1 based location in the peptide, 0 for adjustments that act on the whole peptide
    pub position: usize,
    /// The mass shift, for isotopic adjustments this is the shift per affected atom
    pub mass: f64,
    /// For isotopic adjustments the element that is labelled
    pub affected_atom: Option<Element>,
}

impl MassAdjustment {
    /// A plain mass shift at the given location
    pub const fn new(position: usize, mass: f64) -> Self {
        Self {
            position,
            mass,
            affected_atom: None,
        }
    }

    /// An isotopic label on every atom of the given element
    pub const fn isotopic(mass: f64, element: Element) -> Self {
        Self {
            position: 0,
            mass,
            affected_atom: Some(element),
        }
    }
}

/// Calculates monoisotopic peptide masses from a residue table and the terminal group masses
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PeptideMassCalculator {
    residues: BTreeMap<char, AminoAcidResidue>,
    n_terminus_mass: f64,
    c_terminus_mass: f64,
}

impl Default for PeptideMassCalculator {
    fn default() -> Self {
        Self {
            residues: STANDARD_RESIDUES
                .iter()
                .map(|(symbol, composition)| {
                    (
                        *symbol,
                        AminoAcidResidue::from_composition(*symbol, *composition),
                    )
                })
                .collect(),
            n_terminus_mass: MASS_HYDROGEN,
            c_terminus_mass: MASS_HYDROXYL,
        }
    }
}

impl PeptideMassCalculator {
    /// Create a calculator with the standard residues and a hydrogen/hydroxyl as terminal groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with custom terminal group masses
    #[must_use]
    pub fn with_terminus_masses(mut self, n_terminus: f64, c_terminus: f64) -> Self {
        self.n_terminus_mass = n_terminus;
        self.c_terminus_mass = c_terminus;
        self
    }

    /// The mass added for the N terminal group
    pub const fn n_terminus_mass(&self) -> f64 {
        self.n_terminus_mass
    }

    /// The mass added for the C terminal group
    pub const fn c_terminus_mass(&self) -> f64 {
        self.c_terminus_mass
    }

    /// Register a custom residue or override a standard residue.
    /// # Errors
    /// If the symbol is not an ASCII letter, or the mass is not finite.
    pub fn register_residue(
        &mut self,
        symbol: char,
        mass: f64,
        composition: Option<ElementalComposition>,
    ) -> Result<(), BoxedError<'static, BasicKind>> {
        if !symbol.is_ascii_alphabetic() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid residue symbol",
                format!("A residue has to be denoted by a single letter, '{symbol}' is not a letter"),
                Context::none(),
            ));
        }
        if !mass.is_finite() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid residue mass",
                format!("The mass for residue '{symbol}' has to be a finite number"),
                Context::none(),
            ));
        }
        let symbol = symbol.to_ascii_uppercase();
        self.residues.insert(
            symbol,
            AminoAcidResidue {
                symbol,
                mass,
                composition,
            },
        );
        Ok(())
    }

    /// Get the definition for a residue, case insensitive
    pub fn residue(&self, symbol: char) -> Option<&AminoAcidResidue> {
        self.residues.get(&symbol.to_ascii_uppercase())
    }

    /// Get the monoisotopic mass of a residue, case insensitive
    pub fn residue_mass(&self, symbol: char) -> Option<f64> {
        self.residue(symbol).map(|r| r.mass)
    }

    /// The elemental composition of the full peptide (including the terminal water).
    /// Residues without a known composition do not contribute any atoms.
    pub fn composition(&self, sequence: &str) -> ElementalComposition {
        sequence
            .chars()
            .filter_map(|c| self.residue(c).and_then(|r| r.composition))
            .fold(
                ElementalComposition::new(0, 2, 0, 1, 0),
                |acc, composition| acc + composition,
            )
    }

    /// Compute the neutral monoisotopic mass of the given sequence with the given adjustments.
    /// Unknown residues contribute no mass at all, this allows a single corrupt line to not
    /// stop the processing of a whole file. An empty sequence has a mass of zero.
    pub fn compute_sequence_mass(&self, sequence: &str, adjustments: &[MassAdjustment]) -> f64 {
        if sequence.is_empty() {
            return 0.0;
        }
        let residues: f64 = sequence
            .chars()
            .filter_map(|c| self.residue_mass(c))
            .sum();
        let mut mass = residues + self.n_terminus_mass + self.c_terminus_mass;
        let mut composition = None;
        for adjustment in adjustments {
            if let Some(element) = adjustment.affected_atom {
                let composition = composition.get_or_insert_with(|| self.composition(sequence));
                mass += adjustment.mass * f64::from(composition.count(element));
            } else {
                mass += adjustment.mass;
            }
        }
        mass
    }
}

/// Convert a mass from one charge state to another. A charge of zero denotes the neutral mass,
/// a charge of one the (M+H)+ value and anything above that the m/z.
pub fn convolute_mass(mass: f64, current_charge: i32, new_charge: i32) -> f64 {
    let neutral = if current_charge > 0 {
        f64::from(current_charge).mul_add(mass, -f64::from(current_charge) * MASS_PROTON)
    } else {
        mass
    };
    if new_charge > 0 {
        f64::from(new_charge).mul_add(MASS_PROTON, neutral) / f64::from(new_charge)
    } else {
        neutral
    }
}

/// Express a mass difference in parts per million of the reference mass
pub fn mass_to_ppm(delta_mass: f64, reference_mass: f64) -> f64 {
    if reference_mass.abs() < f64::EPSILON {
        0.0
    } else {
        delta_mass / reference_mass * 1e6
    }
}
