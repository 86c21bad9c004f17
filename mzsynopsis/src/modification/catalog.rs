use context_error::*;
use serde::{Deserialize, Serialize};
use thin_vec::thin_vec;

use crate::{
    helper_functions::masses_equal,
    modification::{
        DEFAULT_DIGITS_OF_PRECISION, ModificationDefinition, ModificationKind, TerminusState,
        known_modification_by_mass,
    },
};

/// The result of looking up a modification by mass
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MassLookup {
    /// The index of the definition in the catalog
    pub index: usize,
    /// If the definition was already present before the lookup, false if it was registered by this lookup
    pub existing: bool,
}

/// An ordered collection of all modifications relevant to one processing run
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModificationCatalog {
    definitions: Vec<ModificationDefinition>,
    unknown_count: usize,
    use_known_tags: bool,
}

impl Default for ModificationCatalog {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            unknown_count: 0,
            use_known_tags: true,
        }
    }
}

impl ModificationCatalog {
    /// Create an empty catalog that names newly encountered masses after the built in tags when possible
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from the given definitions.
    /// # Errors
    /// If any of the definitions is invalid.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ModificationDefinition>,
    ) -> Result<Self, BoxedError<'static, BasicKind>> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.add(definition)?;
        }
        Ok(catalog)
    }

    /// Set if auto registered masses are named after the built in tags (default) or always `UnkModNN`
    #[must_use]
    pub const fn use_known_tags(mut self, use_known_tags: bool) -> Self {
        self.use_known_tags = use_known_tags;
        self
    }

    /// Add a definition, if an equivalent definition (including target residues) is already
    /// present the index of that definition is returned instead.
    /// # Errors
    /// If the definition is invalid.
    pub fn add(
        &mut self,
        definition: ModificationDefinition,
    ) -> Result<usize, BoxedError<'static, BasicKind>> {
        definition.validate()?;
        if let Some(index) = self.definitions.iter().position(|d| {
            d.equivalent_including_targets(&definition, DEFAULT_DIGITS_OF_PRECISION)
        }) {
            return Ok(index);
        }
        self.definitions.push(definition);
        Ok(self.definitions.len() - 1)
    }

    /// The number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// If there are no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Get the definition at the given index
    pub fn get(&self, index: usize) -> Option<&ModificationDefinition> {
        self.definitions.get(index)
    }

    /// Get the kind of the definition at the given index
    pub fn kind(&self, index: usize) -> Option<ModificationKind> {
        self.definitions.get(index).map(|d| d.kind)
    }

    /// Iterate over all definitions in order of registration
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ModificationDefinition> + '_ {
        self.definitions.iter()
    }

    /// Iterate over all definitions of the given kind, with their index
    pub fn of_kind(
        &self,
        kind: ModificationKind,
    ) -> impl Iterator<Item = (usize, &ModificationDefinition)> + '_ {
        self.definitions
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.kind == kind)
    }

    /// Find a definition by its mass correction tag (case insensitive)
    pub fn find_by_tag(&self, tag: &str) -> Option<usize> {
        self.definitions
            .iter()
            .position(|d| d.mass_correction_tag.eq_ignore_ascii_case(tag))
    }

    /// Count one more occurrence of the definition at the given index
    pub fn increment_occurrence_count(&mut self, index: usize) {
        if let Some(definition) = self.definitions.get_mut(index) {
            definition.occurrence_count += 1;
        }
    }

    /// Set the occurrence count of all definitions to zero
    pub fn reset_occurrence_counts(&mut self) {
        for definition in &mut self.definitions {
            definition.occurrence_count = 0;
        }
    }

    /// Find the definition for a mass placed on the given residue.
    ///
    /// The search prefers, in order:
    /// 1. the first definition with this mass that explicitly targets the residue (or terminus),
    /// 2. the first definition with this mass that targets any residue,
    /// 3. any other definition with this mass, a copy retargeted at this residue is registered
    ///    (only when auto registering is allowed, otherwise the definition is returned as is),
    /// 4. a new definition, named after a built in tag if the mass is known or `UnkModNN` otherwise
    ///    (only when auto registering is allowed).
    ///
    /// Isotopic modifications are never returned. The mass is compared at the given number of
    /// digits after the decimal point. Returns `None` if nothing matches and auto registering is
    /// not allowed.
    pub fn lookup_by_mass(
        &mut self,
        mass: f64,
        residue: char,
        terminus: TerminusState,
        digits: u8,
        auto_register: bool,
    ) -> Option<MassLookup> {
        let candidates = || {
            self.definitions.iter().enumerate().filter(|(_, d)| {
                d.kind != ModificationKind::Isotopic && masses_equal(d.mass, mass, digits)
            })
        };
        if let Some((index, _)) = candidates().find(|(_, d)| d.targets(residue, terminus)) {
            return Some(MassLookup {
                index,
                existing: true,
            });
        }
        if let Some((index, _)) = candidates().find(|(_, d)| d.targets_any_residue()) {
            return Some(MassLookup {
                index,
                existing: true,
            });
        }
        let any_match = candidates().map(|(index, _)| index).next();
        if let Some(index) = any_match {
            if !auto_register {
                return Some(MassLookup {
                    index,
                    existing: true,
                });
            }
            let mut retargeted = self.definitions[index].clone();
            retargeted.target_residues = thin_vec![residue.to_ascii_uppercase()];
            retargeted.occurrence_count = 0;
            retargeted.symbol = None;
            if retargeted.kind.is_static() {
                retargeted.kind = ModificationKind::Dynamic;
            }
            self.definitions.push(retargeted);
            return Some(MassLookup {
                index: self.definitions.len() - 1,
                existing: false,
            });
        }
        auto_register.then(|| self.register_unknown(mass, residue, digits))
    }

    /// Find a dynamic modification that is annotated with the given symbol on the given residue.
    pub fn lookup_dynamic_by_symbol(
        &self,
        symbol: char,
        residue: char,
        terminus: TerminusState,
    ) -> Option<usize> {
        self.definitions.iter().position(|d| {
            d.kind == ModificationKind::Dynamic
                && d.symbol == Some(symbol)
                && (d.targets_any_residue() || d.targets(residue, terminus))
        })
    }

    /// If the given character is used as symbol by any dynamic modification
    pub fn is_dynamic_symbol(&self, symbol: char) -> bool {
        self.definitions
            .iter()
            .any(|d| d.kind == ModificationKind::Dynamic && d.symbol == Some(symbol))
    }

    fn register_unknown(&mut self, mass: f64, residue: char, digits: u8) -> MassLookup {
        let known_tag = self
            .use_known_tags
            .then(|| known_modification_by_mass(mass, digits))
            .flatten()
            .map(|known| known.tag)
            .filter(|tag| {
                // A tag can only be reused for the same mass
                self.definitions
                    .iter()
                    .filter(|d| d.mass_correction_tag == *tag)
                    .all(|d| masses_equal(d.mass, mass, digits))
            });
        let (tag, kind) = if let Some(tag) = known_tag {
            (tag.to_string(), ModificationKind::Dynamic)
        } else {
            self.unknown_count += 1;
            (
                format!("UnkMod{:02}", self.unknown_count),
                ModificationKind::Unknown,
            )
        };
        self.definitions.push(ModificationDefinition {
            symbol: None,
            mass,
            target_residues: thin_vec![residue.to_ascii_uppercase()],
            kind,
            mass_correction_tag: tag,
            affected_atom: None,
            occurrence_count: 0,
        });
        MassLookup {
            index: self.definitions.len() - 1,
            existing: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn catalog() -> ModificationCatalog {
        ModificationCatalog::from_definitions([
            ModificationDefinition::new(57.021_464, "IodoAcet", ModificationKind::Static)
                .unwrap()
                .with_targets("C"),
            ModificationDefinition::new(15.994_915, "Plus1Oxy", ModificationKind::Dynamic)
                .unwrap()
                .with_targets("M")
                .with_symbol('*'),
            ModificationDefinition::new(79.966_331, "Phosph", ModificationKind::Dynamic)
                .unwrap(),
            ModificationDefinition::new(79.966_331, "PhosphST", ModificationKind::Dynamic)
                .unwrap()
                .with_targets("ST")
                .with_symbol('#'),
            ModificationDefinition::new(42.010_565, "Acetyl", ModificationKind::Dynamic)
                .unwrap()
                .with_targets("<"),
        ])
        .unwrap()
    }

    #[test]
    fn add_deduplicates() {
        let mut catalog = catalog();
        let len = catalog.len();
        let index = catalog
            .add(
                ModificationDefinition::new(57.0215, "IodoAcet", ModificationKind::Static)
                    .unwrap()
                    .with_targets("C"),
            )
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(catalog.len(), len);
    }

    #[test]
    fn residue_specific_beats_any() {
        let mut catalog = catalog();
        let found = catalog
            .lookup_by_mass(79.9663, 'S', TerminusState::None, 3, true)
            .unwrap();
        assert_eq!(catalog.get(found.index).unwrap().mass_correction_tag, "PhosphST");
        assert!(found.existing);
        let found = catalog
            .lookup_by_mass(79.9663, 'Y', TerminusState::None, 3, true)
            .unwrap();
        assert_eq!(catalog.get(found.index).unwrap().mass_correction_tag, "Phosph");
        assert!(found.existing);
    }

    #[test]
    fn terminus_targets() {
        let mut catalog = catalog();
        let found = catalog
            .lookup_by_mass(42.0106, 'A', TerminusState::ProteinNTerminus, 3, false)
            .unwrap();
        assert_eq!(catalog.get(found.index).unwrap().mass_correction_tag, "Acetyl");
        assert!(found.existing);
    }

    #[test]
    fn retarget() {
        let mut catalog = catalog();
        let len = catalog.len();
        let found = catalog
            .lookup_by_mass(15.9949, 'W', TerminusState::None, 3, true)
            .unwrap();
        assert!(!found.existing);
        assert_eq!(catalog.len(), len + 1);
        let definition = catalog.get(found.index).unwrap();
        assert_eq!(definition.mass_correction_tag, "Plus1Oxy");
        assert_eq!(definition.target_residues_string(), "W");
        // Second time it is found directly
        let again = catalog
            .lookup_by_mass(15.9949, 'W', TerminusState::None, 3, true)
            .unwrap();
        assert_eq!(again.index, found.index);
        assert!(again.existing);
    }

    #[test]
    fn unknown_masses() {
        let mut catalog = catalog();
        assert!(
            catalog
                .lookup_by_mass(123.456, 'K', TerminusState::None, 3, false)
                .is_none()
        );
        let found = catalog
            .lookup_by_mass(123.456, 'K', TerminusState::None, 3, true)
            .unwrap();
        assert!(!found.existing);
        assert_eq!(catalog.get(found.index).unwrap().mass_correction_tag, "UnkMod01");
        assert_eq!(catalog.kind(found.index), Some(ModificationKind::Unknown));
        let second = catalog
            .lookup_by_mass(-3.21, 'K', TerminusState::None, 3, true)
            .unwrap();
        assert_eq!(catalog.get(second.index).unwrap().mass_correction_tag, "UnkMod02");
        let known = catalog
            .lookup_by_mass(-18.0106, 'E', TerminusState::None, 3, true)
            .unwrap();
        assert_eq!(catalog.get(known.index).unwrap().mass_correction_tag, "MinusH2O");
    }

    #[test]
    fn unknown_masses_without_known_tags() {
        let mut catalog = ModificationCatalog::new().use_known_tags(false);
        let found = catalog
            .lookup_by_mass(-18.0106, 'E', TerminusState::None, 3, true)
            .unwrap();
        assert_eq!(catalog.get(found.index).unwrap().mass_correction_tag, "UnkMod01");
    }

    #[test]
    fn symbols() {
        let catalog = catalog();
        assert_eq!(
            catalog.lookup_dynamic_by_symbol('*', 'M', TerminusState::None),
            Some(1)
        );
        assert_eq!(
            catalog.lookup_dynamic_by_symbol('*', 'K', TerminusState::None),
            None
        );
        assert_eq!(
            catalog.lookup_dynamic_by_symbol('#', 'T', TerminusState::None),
            Some(3)
        );
        assert!(catalog.is_dynamic_symbol('#'));
        assert!(!catalog.is_dynamic_symbol('@'));
    }

    #[test]
    fn occurrence_counts() {
        let mut catalog = catalog();
        catalog.increment_occurrence_count(1);
        catalog.increment_occurrence_count(1);
        catalog.increment_occurrence_count(100);
        assert_eq!(catalog.get(1).unwrap().occurrence_count, 2);
        catalog.reset_occurrence_counts();
        assert!(catalog.iter().all(|d| d.occurrence_count == 0));
    }
}
