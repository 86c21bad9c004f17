use std::collections::HashSet;

use context_error::*;

use crate::{
    annotation::{ModificationDialect, ModificationToken, TokenValue, tokenize_peptide},
    helper_functions::masses_equal,
    modification::{
        C_TERMINAL_PEPTIDE_SYMBOL, C_TERMINAL_PROTEIN_SYMBOL, DEFAULT_DIGITS_OF_PRECISION,
        ModificationCatalog, ModificationKind, N_TERMINAL_PEPTIDE_SYMBOL,
        N_TERMINAL_PROTEIN_SYMBOL, known_modification_by_name,
    },
    psm::SearchResult,
};

/// Places the modifications on search results. Keeps track of the modification names that could
/// not be resolved so that these are only reported once.
#[derive(Clone, Debug)]
pub struct ModificationAnnotator {
    dialect: ModificationDialect,
    digits_of_precision: u8,
    allow_duplicate_terminus_mods: bool,
    unresolved_names: HashSet<String>,
}

impl Default for ModificationAnnotator {
    fn default() -> Self {
        Self::new(ModificationDialect::default())
    }
}

impl ModificationAnnotator {
    /// Create an annotator for the given modification syntax
    pub fn new(dialect: ModificationDialect) -> Self {
        Self {
            dialect,
            digits_of_precision: DEFAULT_DIGITS_OF_PRECISION,
            allow_duplicate_terminus_mods: true,
            unresolved_names: HashSet::new(),
        }
    }

    /// Set the number of digits after the decimal point used to match masses
    #[must_use]
    pub const fn digits_of_precision(mut self, digits: u8) -> Self {
        self.digits_of_precision = digits;
        self
    }

    /// Set if a static terminal modification can be placed on a terminus that already carries a
    /// modification with the same tag or mass
    #[must_use]
    pub const fn allow_duplicate_terminus_mods(mut self, allow: bool) -> Self {
        self.allow_duplicate_terminus_mods = allow;
        self
    }

    /// The modification names that could not be resolved up until now
    pub fn unresolved_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.unresolved_names.iter().map(String::as_str)
    }

    /// Place all modifications on the given result. In order: the isotopic modifications, the
    /// static residue modifications together with the modifications annotated in the peptide,
    /// and lastly the static terminal modifications. Finally the modification description is
    /// updated. Any problem is stored as warning on the result, annotation continues with the
    /// remaining modifications.
    pub fn annotate<Extra>(
        &mut self,
        catalog: &mut ModificationCatalog,
        result: &mut SearchResult<Extra>,
        update_occurrence_counts: bool,
    ) {
        let mut tokenized = tokenize_peptide(&result.peptide_with_mods, self.dialect, |c| {
            catalog.is_dynamic_symbol(c)
        });
        result.clean_sequence = tokenized.clean_sequence;
        result.modifications.clear();

        let isotopic: Vec<usize> = catalog
            .of_kind(ModificationKind::Isotopic)
            .map(|(index, _)| index)
            .collect();
        for index in isotopic {
            Self::place(catalog, result, index, 0);
        }

        let static_mods: Vec<usize> = catalog
            .of_kind(ModificationKind::Static)
            .map(|(index, _)| index)
            .collect();
        tokenized.tokens.sort_by_key(|t| t.position);
        let mut tokens = tokenized.tokens.into_iter().peekable();
        for position in 1..=result.clean_sequence.len() {
            let Some(residue) = result.residue(position) else {
                continue;
            };
            for &index in &static_mods {
                if catalog
                    .get(index)
                    .is_some_and(|d| d.residue_targets().any(|t| t == residue))
                {
                    Self::place(catalog, result, index, position);
                }
            }
            while let Some(token) = tokens.next_if(|t| t.position == position) {
                self.resolve_token(catalog, result, &token, residue);
            }
        }
        for token in tokens {
            result.warnings.push(BoxedError::new(
                BasicKind::Warning,
                "Modification could not be placed",
                format!(
                    "The modification {:?} could not be placed on peptide '{}' as there is no residue at location {}",
                    token.value, result.peptide_with_mods, token.position
                ),
                Context::show(result.peptide_with_mods.clone()),
            ));
        }

        if update_occurrence_counts {
            for modification in &result.modifications {
                catalog.increment_occurrence_count(modification.catalog_index);
            }
        }

        self.add_static_terminus_mods(catalog, result, update_occurrence_counts);
        result.update_modification_description();
    }

    /// Place all static peptide and protein terminal modifications whose terminus matches the
    /// terminus state of the peptide, N terminal modifications on location 1 and C terminal ones
    /// on the last residue.
    pub fn add_static_terminus_mods<Extra>(
        &self,
        catalog: &mut ModificationCatalog,
        result: &mut SearchResult<Extra>,
        update_occurrence_counts: bool,
    ) {
        let length = result.clean_sequence.len();
        if length == 0 {
            return;
        }
        let mut placed = Vec::new();
        for (index, definition) in catalog.iter().enumerate().filter(|(_, d)| {
            matches!(
                d.kind,
                ModificationKind::TerminalPeptideStatic | ModificationKind::ProteinTerminusStatic
            )
        }) {
            for target in &definition.target_residues {
                let position = match *target {
                    N_TERMINAL_PEPTIDE_SYMBOL | N_TERMINAL_PROTEIN_SYMBOL => 1,
                    C_TERMINAL_PEPTIDE_SYMBOL | C_TERMINAL_PROTEIN_SYMBOL => length,
                    _ => continue,
                };
                if !result.terminus_state(position).matches_symbol(*target) {
                    continue;
                }
                let present = result.modifications.iter().any(|m| {
                    m.position == position
                        && (m.catalog_index == index
                            || (!self.allow_duplicate_terminus_mods
                                && (m.tag() == definition.mass_correction_tag
                                    || masses_equal(
                                        m.definition.mass,
                                        definition.mass,
                                        self.digits_of_precision,
                                    ))))
                });
                if present {
                    continue;
                }
                match result.add_modification(definition, index, position) {
                    Ok(_) => placed.push(index),
                    Err(error) => result.warnings.push(error),
                }
            }
        }
        if update_occurrence_counts {
            for index in placed {
                catalog.increment_occurrence_count(index);
            }
        }
    }

    fn place<Extra>(
        catalog: &ModificationCatalog,
        result: &mut SearchResult<Extra>,
        index: usize,
        position: usize,
    ) {
        if let Some(definition) = catalog.get(index)
            && let Err(error) = result.add_modification(definition, index, position)
        {
            result.warnings.push(error);
        }
    }

    fn resolve_token<Extra>(
        &mut self,
        catalog: &mut ModificationCatalog,
        result: &mut SearchResult<Extra>,
        token: &ModificationToken,
        residue: char,
    ) {
        let position = token.position;
        let terminus = result.terminus_state(position);
        let index = match &token.value {
            TokenValue::Mass(mass) => {
                if mass.abs() < f64::EPSILON {
                    return;
                }
                let found = catalog.lookup_by_mass(
                    *mass,
                    residue,
                    terminus,
                    self.digits_of_precision,
                    true,
                );
                if let Some(found) = found
                    && !found.existing
                    && let Some(definition) = catalog.get(found.index)
                {
                    log::info!("Registered new modification {definition}");
                }
                found.map(|f| f.index)
            }
            TokenValue::Name(name) => self.resolve_name(catalog, name, residue, terminus),
            TokenValue::Symbol(symbol) => {
                catalog.lookup_dynamic_by_symbol(*symbol, residue, terminus)
            }
        };
        let Some(index) = index else {
            result.warnings.push(BoxedError::new(
                BasicKind::Warning,
                "Unknown modification",
                format!(
                    "The modification {:?} on residue {residue} at location {position} could not be resolved, it is ignored",
                    token.value
                ),
                Context::show(result.peptide_with_mods.clone()),
            ));
            return;
        };
        // A static modification that is also annotated by the search tool is only placed once
        if catalog.kind(index).is_some_and(ModificationKind::is_static)
            && result
                .modifications
                .iter()
                .any(|m| m.position == position && m.catalog_index == index)
        {
            return;
        }
        Self::place(catalog, result, index, position);
    }

    fn resolve_name(
        &mut self,
        catalog: &mut ModificationCatalog,
        name: &str,
        residue: char,
        terminus: crate::modification::TerminusState,
    ) -> Option<usize> {
        if let Some(index) = catalog.find_by_tag(name) {
            return Some(index);
        }
        if let Some(known) = known_modification_by_name(name) {
            return catalog
                .lookup_by_mass(known.mass, residue, terminus, self.digits_of_precision, true)
                .map(|found| found.index);
        }
        if self.unresolved_names.insert(name.to_string()) {
            log::warn!("Unknown modification name '{name}', modifications with this name are ignored");
        }
        None
    }
}
