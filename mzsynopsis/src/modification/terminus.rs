use serde::{Deserialize, Serialize};

/// Target residue symbol for modifications on the N terminus of a peptide
pub const N_TERMINAL_PEPTIDE_SYMBOL: char = '<';
/// Target residue symbol for modifications on the C terminus of a peptide
pub const C_TERMINAL_PEPTIDE_SYMBOL: char = '>';
/// Target residue symbol for modifications on the N terminus of a protein
pub const N_TERMINAL_PROTEIN_SYMBOL: char = '[';
/// Target residue symbol for modifications on the C terminus of a protein
pub const C_TERMINAL_PROTEIN_SYMBOL: char = ']';
/// The flanking residue used by search tools to denote the end of a protein
pub const PROTEIN_TERMINUS_FLANK: char = '-';

/// Where a residue sits relative to the ends of its peptide and protein
#[derive(
    Copy, Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum TerminusState {
    /// An internal residue
    #[default]
    None,
    /// The first residue of the peptide
    PeptideNTerminus,
    /// The last residue of the peptide
    PeptideCTerminus,
    /// The first residue of the protein
    ProteinNTerminus,
    /// The last residue of the protein
    ProteinCTerminus,
    /// A single residue peptide that is neither at the start nor the end of the protein
    PeptideNAndCTerminus,
    /// A single residue peptide at the start of the protein
    ProteinNAndPeptideCTerminus,
    /// A single residue peptide at the end of the protein
    PeptideNAndProteinCTerminus,
    /// A peptide spanning the full protein, only used for single residue peptides
    ProteinNAndCTerminus,
}

impl TerminusState {
    /// Determine the state for the residue at the given 1 based location in a peptide of the
    /// given length, based on the residues flanking the peptide in the protein.
    pub fn determine(position: usize, length: usize, prefix: char, suffix: char) -> Self {
        if length == 0 {
            return Self::None;
        }
        let protein_n = prefix == PROTEIN_TERMINUS_FLANK;
        let protein_c = suffix == PROTEIN_TERMINUS_FLANK;
        match (position == 1, position == length) {
            (true, true) => match (protein_n, protein_c) {
                (true, true) => Self::ProteinNAndCTerminus,
                (true, false) => Self::ProteinNAndPeptideCTerminus,
                (false, true) => Self::PeptideNAndProteinCTerminus,
                (false, false) => Self::PeptideNAndCTerminus,
            },
            (true, false) if protein_n => Self::ProteinNTerminus,
            (true, false) => Self::PeptideNTerminus,
            (false, true) if protein_c => Self::ProteinCTerminus,
            (false, true) => Self::PeptideCTerminus,
            (false, false) => Self::None,
        }
    }

    /// If this residue is at the N terminus of the protein
    pub const fn is_protein_n_terminal(self) -> bool {
        matches!(
            self,
            Self::ProteinNTerminus | Self::ProteinNAndPeptideCTerminus | Self::ProteinNAndCTerminus
        )
    }

    /// If this residue is at the C terminus of the protein
    pub const fn is_protein_c_terminal(self) -> bool {
        matches!(
            self,
            Self::ProteinCTerminus | Self::PeptideNAndProteinCTerminus | Self::ProteinNAndCTerminus
        )
    }

    /// If this residue is at the N terminus of the peptide (protein N terminal residues are always peptide N terminal)
    pub const fn is_peptide_n_terminal(self) -> bool {
        !matches!(self, Self::None | Self::PeptideCTerminus | Self::ProteinCTerminus)
    }

    /// If this residue is at the C terminus of the peptide
    pub const fn is_peptide_c_terminal(self) -> bool {
        !matches!(self, Self::None | Self::PeptideNTerminus | Self::ProteinNTerminus)
    }

    /// Check if a terminus target symbol applies to a residue in this state
    pub const fn matches_symbol(self, symbol: char) -> bool {
        match symbol {
            N_TERMINAL_PEPTIDE_SYMBOL => self.is_peptide_n_terminal(),
            C_TERMINAL_PEPTIDE_SYMBOL => self.is_peptide_c_terminal(),
            N_TERMINAL_PROTEIN_SYMBOL => self.is_protein_n_terminal(),
            C_TERMINAL_PROTEIN_SYMBOL => self.is_protein_c_terminal(),
            _ => false,
        }
    }
}

/// Check if the given target symbol denotes a terminus instead of a residue
pub const fn is_terminus_symbol(symbol: char) -> bool {
    matches!(
        symbol,
        N_TERMINAL_PEPTIDE_SYMBOL
            | C_TERMINAL_PEPTIDE_SYMBOL
            | N_TERMINAL_PROTEIN_SYMBOL
            | C_TERMINAL_PROTEIN_SYMBOL
    )
}

impl std::fmt::Display for TerminusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::None => "internal",
                Self::PeptideNTerminus => "peptide N-terminal",
                Self::PeptideCTerminus => "peptide C-terminal",
                Self::ProteinNTerminus => "protein N-terminal",
                Self::ProteinCTerminus => "protein C-terminal",
                Self::PeptideNAndCTerminus => "peptide N- and C-terminal",
                Self::ProteinNAndPeptideCTerminus => "protein N-terminal and peptide C-terminal",
                Self::PeptideNAndProteinCTerminus => "peptide N-terminal and protein C-terminal",
                Self::ProteinNAndCTerminus => "protein N- and C-terminal",
            }
        )
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn determine() {
        assert_eq!(
            TerminusState::determine(1, 5, 'K', 'A'),
            TerminusState::PeptideNTerminus
        );
        assert_eq!(
            TerminusState::determine(1, 5, '-', 'A'),
            TerminusState::ProteinNTerminus
        );
        assert_eq!(TerminusState::determine(3, 5, '-', '-'), TerminusState::None);
        assert_eq!(
            TerminusState::determine(5, 5, 'K', 'A'),
            TerminusState::PeptideCTerminus
        );
        assert_eq!(
            TerminusState::determine(5, 5, 'K', '-'),
            TerminusState::ProteinCTerminus
        );
        assert_eq!(
            TerminusState::determine(1, 1, '-', '-'),
            TerminusState::ProteinNAndCTerminus
        );
        assert_eq!(TerminusState::determine(1, 0, '-', '-'), TerminusState::None);
    }

    #[test]
    fn single_residue() {
        let cleaved = TerminusState::determine(1, 1, 'K', 'R');
        assert_eq!(cleaved, TerminusState::PeptideNAndCTerminus);
        assert!(cleaved.matches_symbol(N_TERMINAL_PEPTIDE_SYMBOL));
        assert!(cleaved.matches_symbol(C_TERMINAL_PEPTIDE_SYMBOL));
        assert!(!cleaved.matches_symbol(N_TERMINAL_PROTEIN_SYMBOL));
        assert!(!cleaved.matches_symbol(C_TERMINAL_PROTEIN_SYMBOL));

        let start = TerminusState::determine(1, 1, '-', 'R');
        assert!(start.matches_symbol(N_TERMINAL_PROTEIN_SYMBOL));
        assert!(start.matches_symbol(C_TERMINAL_PEPTIDE_SYMBOL));
        assert!(!start.matches_symbol(C_TERMINAL_PROTEIN_SYMBOL));

        let end = TerminusState::determine(1, 1, 'K', '-');
        assert!(end.matches_symbol(N_TERMINAL_PEPTIDE_SYMBOL));
        assert!(end.matches_symbol(C_TERMINAL_PROTEIN_SYMBOL));
        assert!(!end.matches_symbol(N_TERMINAL_PROTEIN_SYMBOL));
    }

    #[test]
    fn symbols() {
        assert!(TerminusState::ProteinNTerminus.matches_symbol(N_TERMINAL_PEPTIDE_SYMBOL));
        assert!(TerminusState::ProteinNTerminus.matches_symbol(N_TERMINAL_PROTEIN_SYMBOL));
        assert!(!TerminusState::PeptideNTerminus.matches_symbol(N_TERMINAL_PROTEIN_SYMBOL));
        assert!(!TerminusState::None.matches_symbol('C'));
    }
}
