use context_error::*;
use serde::{Deserialize, Serialize};
use thin_vec::ThinVec;

use crate::{
    chemistry::Element,
    helper_functions::masses_equal,
    modification::{TerminusState, is_terminus_symbol},
};

/// The maximal length of a mass correction tag
pub const MAX_TAG_LENGTH: usize = 8;

/// The default number of digits after the decimal point used when comparing modification masses
pub const DEFAULT_DIGITS_OF_PRECISION: u8 = 3;

/// The kind of a modification, determines how it is placed on a peptide
#[derive(
    Copy, Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ModificationKind {
    /// Explicitly annotated per residue by the search tool
    Dynamic,
    /// Placed on every occurrence of the target residues
    Static,
    /// Placed on every peptide N or C terminus
    TerminalPeptideStatic,
    /// Replaces the atoms of one element with a heavier isotope throughout the peptide
    Isotopic,
    /// Placed on every protein N or C terminus
    ProteinTerminusStatic,
    /// Not determined yet
    #[default]
    Unknown,
}

impl ModificationKind {
    /// The single character code used in modification summaries
    pub const fn code(self) -> char {
        match self {
            Self::Dynamic => 'D',
            Self::Static => 'S',
            Self::TerminalPeptideStatic => 'T',
            Self::Isotopic => 'I',
            Self::ProteinTerminusStatic => 'P',
            Self::Unknown => '?',
        }
    }

    /// Parse the single character code as used in modification summaries
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'D' | 'd' => Some(Self::Dynamic),
            'S' | 's' => Some(Self::Static),
            'T' | 't' => Some(Self::TerminalPeptideStatic),
            'I' | 'i' => Some(Self::Isotopic),
            'P' | 'p' => Some(Self::ProteinTerminusStatic),
            '?' => Some(Self::Unknown),
            _ => None,
        }
    }

    /// If this kind is applied without being annotated by the search tool
    pub const fn is_static(self) -> bool {
        matches!(
            self,
            Self::Static | Self::TerminalPeptideStatic | Self::ProteinTerminusStatic
        )
    }
}

impl std::fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A modification as known to a search, either read from the search parameters or created when
/// encountering an unknown mass.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModificationDefinition {
    /// Single character used by some tools to annotate this modification
    #[serde(default)]
    pub symbol: Option<char>,
    /// The monoisotopic mass shift, for isotopic modifications the shift per atom
    pub mass: f64,
    /// The residues (or terminus symbols `<>[]`) this modification can be placed on, empty means any residue
    #[serde(default)]
    pub target_residues: ThinVec<char>,
    /// The kind of modification
    #[serde(default)]
    pub kind: ModificationKind,
    /// The short name used in modification descriptions
    pub mass_correction_tag: String,
    /// For isotopic modifications the element that is labelled
    #[serde(default)]
    pub affected_atom: Option<Element>,
    /// The number of times this modification was seen in the current output pass
    #[serde(default, skip_serializing)]
    pub occurrence_count: usize,
}

impl ModificationDefinition {
    /// Create a new definition.
    /// # Errors
    /// If the mass correction tag is invalid, see [`validate_mass_correction_tag`].
    pub fn new(
        mass: f64,
        mass_correction_tag: impl Into<String>,
        kind: ModificationKind,
    ) -> Result<Self, BoxedError<'static, BasicKind>> {
        let mass_correction_tag = mass_correction_tag.into();
        validate_mass_correction_tag(&mass_correction_tag)?;
        Ok(Self {
            symbol: None,
            mass,
            target_residues: ThinVec::new(),
            kind,
            mass_correction_tag,
            affected_atom: None,
            occurrence_count: 0,
        })
    }

    /// Set the target residues (uppercased), terminus symbols are kept as is
    #[must_use]
    pub fn with_targets(mut self, targets: &str) -> Self {
        self.target_residues = targets
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        self
    }

    /// Set the symbol used to annotate this modification
    #[must_use]
    pub const fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Set the affected atom for isotopic modifications
    #[must_use]
    pub const fn with_affected_atom(mut self, element: Element) -> Self {
        self.affected_atom = Some(element);
        self
    }

    /// Check all invariants of this definition.
    /// # Errors
    /// If the tag is invalid, the mass is not finite, or an isotopic modification misses its element.
    pub fn validate(&self) -> Result<(), BoxedError<'static, BasicKind>> {
        validate_mass_correction_tag(&self.mass_correction_tag)?;
        if !self.mass.is_finite() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid modification mass",
                format!(
                    "The mass of modification '{}' has to be a finite number",
                    self.mass_correction_tag
                ),
                Context::none(),
            ));
        }
        if self.kind == ModificationKind::Isotopic && self.affected_atom.is_none() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid isotopic modification",
                format!(
                    "The isotopic modification '{}' needs an affected atom",
                    self.mass_correction_tag
                ),
                Context::none(),
            ));
        }
        Ok(())
    }

    /// If this modification can be placed on any residue
    pub fn targets_any_residue(&self) -> bool {
        self.target_residues.is_empty()
    }

    /// If this modification explicitly lists the given residue or a terminus symbol that applies
    /// to the given terminus state
    pub fn targets(&self, residue: char, terminus: TerminusState) -> bool {
        let residue = residue.to_ascii_uppercase();
        self.target_residues
            .iter()
            .any(|t| *t == residue || (is_terminus_symbol(*t) && terminus.matches_symbol(*t)))
    }

    /// All targets that are residues and not terminus symbols
    pub fn residue_targets(&self) -> impl Iterator<Item = char> + '_ {
        self.target_residues
            .iter()
            .copied()
            .filter(|c| !is_terminus_symbol(*c))
    }

    /// The targets as a string
    pub fn target_residues_string(&self) -> String {
        self.target_residues.iter().collect()
    }

    /// Check if the mass, kind, mass correction tag and affected atom are the same. The mass is
    /// compared at the given number of digits after the decimal point.
    pub fn equivalent_mass_kind_tag_and_atom(&self, other: &Self, digits: u8) -> bool {
        masses_equal(self.mass, other.mass, digits)
            && self.kind == other.kind
            && self.mass_correction_tag == other.mass_correction_tag
            && self.affected_atom == other.affected_atom
    }

    /// The stricter equivalence, in addition to [`Self::equivalent_mass_kind_tag_and_atom`] the
    /// target residues of one have to be a subset of the target residues of the other.
    pub fn equivalent_including_targets(&self, other: &Self, digits: u8) -> bool {
        self.equivalent_mass_kind_tag_and_atom(other, digits)
            && (self.target_residues.iter().all(|t| other.target_residues.contains(t))
                || other
                    .target_residues
                    .iter()
                    .all(|t| self.target_residues.contains(t)))
    }
}

impl std::fmt::Display for ModificationDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:+.5}", self.mass_correction_tag, self.mass)?;
        if !self.target_residues.is_empty() {
            write!(f, " @ {}", self.target_residues_string())?;
        }
        write!(f, ", {})", self.kind)
    }
}

/// Check that a mass correction tag is usable in modification descriptions: not empty, at most
/// eight characters long, and without `:`, `,` or whitespace.
/// # Errors
/// If any of these rules is broken.
pub fn validate_mass_correction_tag(tag: &str) -> Result<(), BoxedError<'static, BasicKind>> {
    if tag.is_empty() {
        Err(BoxedError::new(
            BasicKind::Error,
            "Invalid mass correction tag",
            "A mass correction tag cannot be empty",
            Context::none(),
        ))
    } else if tag.chars().count() > MAX_TAG_LENGTH {
        Err(BoxedError::new(
            BasicKind::Error,
            "Invalid mass correction tag",
            format!("A mass correction tag can be at most {MAX_TAG_LENGTH} characters long"),
            Context::show(tag.to_string()),
        ))
    } else if let Some(position) = tag
        .char_indices()
        .find(|(_, c)| *c == ':' || *c == ',' || c.is_whitespace())
        .map(|(i, _)| i)
    {
        Err(BoxedError::new(
            BasicKind::Error,
            "Invalid mass correction tag",
            "A mass correction tag cannot contain a colon, comma, or whitespace",
            Context::line(None, tag.to_string(), position, 1),
        ))
    } else {
        Ok(())
    }
}
