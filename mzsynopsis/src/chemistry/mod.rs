//! Monoisotopic masses of residues and peptides

mod amino_acid;
pub mod constants;
mod element;
mod mass_calculator;

pub use amino_acid::*;
pub use element::*;
pub use mass_calculator::*;
