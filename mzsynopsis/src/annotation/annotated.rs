use serde::{Deserialize, Serialize};

use crate::modification::{ModificationDefinition, ModificationKind, TerminusState};

/// A modification placed on a peptide
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AnnotatedModification {
    /// The modified residue, `None` for modifications that act on the whole peptide (isotopic)
    pub residue: Option<char>,
    /// 1 based location in the peptide, 0 for modifications that act on the whole peptide
    pub position: usize,
    /// The terminus state of the modified residue
    pub terminus: TerminusState,
    /// The index of the definition in the catalog used during annotation
    pub catalog_index: usize,
    /// The definition
    pub definition: ModificationDefinition,
}

impl AnnotatedModification {
    /// The kind of the definition
    pub fn kind(&self) -> ModificationKind {
        self.definition.kind
    }

    /// The mass correction tag of the definition
    pub fn tag(&self) -> &str {
        &self.definition.mass_correction_tag
    }

    /// The key used to order modifications in descriptions
    pub(crate) fn display_key(&self) -> (usize, &str) {
        (self.position, self.tag())
    }
}

impl std::fmt::Display for AnnotatedModification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tag(), self.position)
    }
}
