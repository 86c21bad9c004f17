//! The parameters for a processing run, loadable from JSON

use std::{any::type_name, path::Path};

use context_error::*;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    annotation::ModificationAnnotator,
    chemistry::{
        PeptideMassCalculator,
        constants::{MASS_HYDROGEN, MASS_HYDROXYL},
    },
    fdr::DEFAULT_DECOY_PREFIXES,
    formats::SearchTool,
    modification::{DEFAULT_DIGITS_OF_PRECISION, ModificationCatalog, ModificationDefinition},
};

/// Parse JSON into a structure, with validation on top of what serde checks
pub trait ParseJson: Sized {
    /// Parse a JSON value element into this structure
    /// # Errors
    /// If the JSON is not valid to the format
    fn from_json_value(value: Value) -> Result<Self, BoxedError<'static, BasicKind>>;

    /// Parse a string containing JSON into this structure
    /// # Errors
    /// If the JSON is not valid to the format
    fn from_json(value: &str) -> Result<Self, BoxedError<'static, BasicKind>> {
        let value = serde_json::from_str::<Value>(value).map_err(|err| {
            BoxedError::new(
                BasicKind::Error,
                format!("Invalid JSON (for {})", type_name::<Self>()),
                err.to_string(),
                Context::show(value.to_string()),
            )
        })?;
        Self::from_json_value(value)
    }

    /// Read a JSON file into this structure
    /// # Errors
    /// If the file could not be read or the JSON is not valid to the format
    fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BoxedError<'static, BasicKind>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            BoxedError::new(
                BasicKind::Error,
                "Could not read parameter file",
                err.to_string(),
                Context::show(path.to_string_lossy().to_string()),
            )
        })?;
        Self::from_json(&text)
    }
}

/// Parse a JSON value element into this structure using the serde JSON parser
/// # Errors
/// If the JSON is not valid to the format
#[expect(clippy::needless_pass_by_value)]
pub fn use_serde<T: DeserializeOwned>(value: Value) -> Result<T, BoxedError<'static, BasicKind>> {
    serde_json::from_value(value.clone()).map_err(|err| {
        BoxedError::new(
            BasicKind::Error,
            format!("Could not parse JSON into {}", type_name::<T>()),
            err.to_string(),
            Context::show(value.to_string()),
        )
    })
}

/// All settings for converting one search result file into synopsis files
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SynopsisParameters {
    /// The modifications as defined in the search parameters
    pub modifications: Vec<ModificationDefinition>,
    /// The number of digits after the decimal point used to match modification masses
    pub digits_of_precision: u8,
    /// Allow a static terminal modification to be placed when a modification with the same tag
    /// or mass is already present on that residue
    pub allow_duplicate_terminus_mods: bool,
    /// Correct the delta mass for selecting a heavier isotope as precursor
    pub adjust_precursor_for_c13: bool,
    /// The mass of the default peptide N terminus
    pub n_terminus_mass: f64,
    /// The mass of the default peptide C terminus
    pub c_terminus_mass: f64,
    /// The protein prefixes marking decoy proteins (case insensitive)
    pub decoy_prefixes: Vec<String>,
    /// The significance threshold for synopsis rows, the search tool default if not set
    pub significance_threshold: Option<f64>,
    /// The maximal number of characters kept in the error log
    pub max_error_log_chars: usize,
    /// Name newly encountered modification masses after the built in mass correction tags
    pub use_known_mass_correction_tags: bool,
}

impl Default for SynopsisParameters {
    fn default() -> Self {
        Self {
            modifications: Vec::new(),
            digits_of_precision: DEFAULT_DIGITS_OF_PRECISION,
            allow_duplicate_terminus_mods: true,
            adjust_precursor_for_c13: true,
            n_terminus_mass: MASS_HYDROGEN,
            c_terminus_mass: MASS_HYDROXYL,
            decoy_prefixes: DEFAULT_DECOY_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            significance_threshold: None,
            max_error_log_chars: 4096,
            use_known_mass_correction_tags: true,
        }
    }
}

impl ParseJson for SynopsisParameters {
    fn from_json_value(value: Value) -> Result<Self, BoxedError<'static, BasicKind>> {
        let parameters: Self = use_serde(value)?;
        parameters.validate()?;
        Ok(parameters)
    }
}

impl SynopsisParameters {
    /// Check that all modifications are valid.
    /// # Errors
    /// If any modification is invalid, the error names the offending modification.
    pub fn validate(&self) -> Result<(), BoxedError<'static, BasicKind>> {
        let errors: Vec<_> = self
            .modifications
            .iter()
            .filter_map(|m| m.validate().err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BoxedError::new(
                BasicKind::Error,
                "Invalid parameters",
                format!("{} of the modifications are invalid", errors.len()),
                Context::none(),
            )
            .add_underlying_errors(errors))
        }
    }

    /// Build a fresh modification catalog with all configured modifications.
    /// # Errors
    /// If any modification is invalid.
    pub fn catalog(&self) -> Result<ModificationCatalog, BoxedError<'static, BasicKind>> {
        Ok(ModificationCatalog::from_definitions(self.modifications.iter().cloned())?
            .use_known_tags(self.use_known_mass_correction_tags))
    }

    /// Build the mass calculator with the configured terminus masses
    pub fn mass_calculator(&self) -> PeptideMassCalculator {
        PeptideMassCalculator::new().with_terminus_masses(self.n_terminus_mass, self.c_terminus_mass)
    }

    /// Build the modification annotator for the given search tool
    pub fn annotator<T: SearchTool>(&self) -> ModificationAnnotator {
        ModificationAnnotator::new(T::DIALECT)
            .digits_of_precision(self.digits_of_precision)
            .allow_duplicate_terminus_mods(self.allow_duplicate_terminus_mods)
    }

    /// The significance threshold for the given search tool
    pub fn threshold<T: SearchTool>(&self) -> f64 {
        self.significance_threshold.unwrap_or(T::DEFAULT_THRESHOLD)
    }
}
