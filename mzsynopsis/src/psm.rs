//! A single search result (peptide spectrum match) shared by all search tools

use context_error::*;

use crate::{
    annotation::AnnotatedModification,
    chemistry::convolute_mass,
    modification::{ModificationDefinition, ModificationKind, TerminusState},
};

/// A search result as read from a search tool, with the tool specific fields in `extra`.
#[derive(Clone, Debug, Default)]
pub struct SearchResult<Extra> {
    /// The scan number
    pub scan: u32,
    /// The precursor charge
    pub charge: i32,
    /// The residue before the peptide in the protein, `-` for the protein N terminus
    pub prefix: Option<char>,
    /// The residue after the peptide in the protein, `-` for the protein C terminus
    pub suffix: Option<char>,
    /// The peptide with modifications without the flanking residues
    pub peptide_with_mods: String,
    /// The peptide without any modifications
    pub clean_sequence: String,
    /// The protein (accession) this peptide was matched to
    pub protein: String,
    /// All modifications placed on this peptide, filled by the annotator
    pub modifications: Vec<AnnotatedModification>,
    /// The observed neutral monoisotopic precursor mass
    pub precursor_mass: f64,
    /// The monoisotopic mass as calculated by the search tool, 0 if unknown
    pub reported_mass: f64,
    /// The monoisotopic mass as calculated from the annotated peptide
    pub computed_mass: f64,
    /// The isotope corrected mass difference between the observed and calculated mass
    pub delta_mass: f64,
    /// The delta mass in ppm
    pub delta_mass_ppm: f64,
    /// The significance score used for ranking and filtering
    pub score: f64,
    /// The modification description, see [`Self::update_modification_description`]
    pub modification_description: String,
    /// Non fatal problems found while annotating this result
    pub warnings: Vec<BoxedError<'static, BasicKind>>,
    /// Search tool specific fields
    pub extra: Extra,
}

impl<Extra> SearchResult<Extra> {
    /// Create an empty result with the given tool specific fields
    pub fn new(extra: Extra) -> Self {
        Self {
            scan: 0,
            charge: 0,
            prefix: None,
            suffix: None,
            peptide_with_mods: String::new(),
            clean_sequence: String::new(),
            protein: String::new(),
            modifications: Vec::new(),
            precursor_mass: 0.0,
            reported_mass: 0.0,
            computed_mass: 0.0,
            delta_mass: 0.0,
            delta_mass_ppm: 0.0,
            score: 0.0,
            modification_description: String::new(),
            warnings: Vec::new(),
            extra,
        }
    }

    /// Set the peptide, as reported by the search tool, so possibly with flanking residues as in `K.PEPTIDE.R`.
    /// The clean sequence is set to all letters in the peptide, the annotator refines this.
    pub fn set_peptide(&mut self, peptide: &str) {
        let (prefix, peptide, suffix) = split_prefix_and_suffix(peptide.trim());
        self.prefix = prefix;
        self.suffix = suffix;
        self.peptide_with_mods = peptide.to_string();
        self.clean_sequence = peptide
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        self.modifications.clear();
        self.modification_description.clear();
    }

    /// The peptide with modifications and the flanking residues (if known) as in `K.PEPTIDE.R`
    pub fn peptide_with_flanks(&self) -> String {
        match (self.prefix, self.suffix) {
            (None, None) => self.peptide_with_mods.clone(),
            (prefix, suffix) => format!(
                "{}.{}.{}",
                prefix.unwrap_or('-'),
                self.peptide_with_mods,
                suffix.unwrap_or('-')
            ),
        }
    }

    /// The terminus state of the residue at the given 1 based location
    pub fn terminus_state(&self, position: usize) -> TerminusState {
        TerminusState::determine(
            position,
            self.clean_sequence.len(),
            self.prefix.unwrap_or_default(),
            self.suffix.unwrap_or_default(),
        )
    }

    /// The residue at the given 1 based location
    pub fn residue(&self, position: usize) -> Option<char> {
        position
            .checked_sub(1)
            .and_then(|index| self.clean_sequence.as_bytes().get(index))
            .map(|b| char::from(*b))
    }

    /// Place a modification on this peptide.
    /// # Errors
    /// If the location is 0 for a modification that is not isotopic, or if the location is
    /// beyond the end of the peptide.
    pub fn add_modification(
        &mut self,
        definition: &ModificationDefinition,
        catalog_index: usize,
        position: usize,
    ) -> Result<&AnnotatedModification, BoxedError<'static, BasicKind>> {
        let modification = if definition.kind == ModificationKind::Isotopic {
            AnnotatedModification {
                residue: None,
                position: 0,
                terminus: TerminusState::None,
                catalog_index,
                definition: definition.clone(),
            }
        } else {
            if position == 0 {
                return Err(BoxedError::new(
                    BasicKind::Error,
                    "Invalid modification location",
                    format!(
                        "Modification '{}' cannot be placed at location 0 of peptide '{}', only isotopic modifications act on the whole peptide",
                        definition.mass_correction_tag, self.clean_sequence
                    ),
                    Context::none(),
                ));
            }
            let residue = self.residue(position).ok_or_else(|| {
                BoxedError::new(
                    BasicKind::Error,
                    "Invalid modification location",
                    format!(
                        "Modification '{}' cannot be placed at location {position} of peptide '{}' which has only {} residues",
                        definition.mass_correction_tag,
                        self.clean_sequence,
                        self.clean_sequence.len()
                    ),
                    Context::none(),
                )
            })?;
            AnnotatedModification {
                residue: Some(residue),
                position,
                terminus: self.terminus_state(position),
                catalog_index,
                definition: definition.clone(),
            }
        };
        self.modifications.push(modification);
        Ok(&self.modifications[self.modifications.len() - 1])
    }

    /// Build the modification description: `tag:location` pairs sorted by location and then by
    /// tag, separated by commas, as in `MinusH2O:1,Plus1Oxy:4`.
    pub fn update_modification_description(&mut self) {
        let mut modifications: Vec<_> = self.modifications.iter().collect();
        modifications.sort_by(|a, b| a.display_key().cmp(&b.display_key()));
        self.modification_description = modifications
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
    }

    /// The number of modifications
    pub fn modification_count(&self) -> usize {
        self.modifications.len()
    }

    /// The (M+H)+ of the computed mass
    pub fn mh(&self) -> f64 {
        convolute_mass(self.computed_mass, 0, 1)
    }

    /// The observed precursor m/z
    pub fn precursor_mz(&self) -> f64 {
        convolute_mass(self.precursor_mass, 0, self.charge.max(1))
    }
}

/// Split a peptide in the flanking residues and the peptide itself: `K.PEPTIDE.R` gives
/// `(Some('K'), "PEPTIDE", Some('R'))`. Only a single letter or `-` is recognised as prefix or
/// suffix, so trailing masses like `PEPTIDE+15.9` are left intact.
pub fn split_prefix_and_suffix(peptide: &str) -> (Option<char>, &str, Option<char>) {
    let bytes = peptide.as_bytes();
    let mut start = 0;
    let mut end = bytes.len();
    let mut prefix = None;
    let mut suffix = None;
    if bytes.len() >= 4 && bytes[1] == b'.' && is_flank(bytes[0]) {
        prefix = Some(char::from(bytes[0]));
        start = 2;
    }
    if end >= start + 3 && bytes[end - 2] == b'.' && is_flank(bytes[end - 1]) {
        suffix = Some(char::from(bytes[end - 1]));
        end -= 2;
    }
    (prefix, &peptide[start..end], suffix)
}

const fn is_flank(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'-'
}
