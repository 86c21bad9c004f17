//! The synopsis file and its companion files: the unique sequences, the map from results to
//! unique sequences, and the summary of all modifications.

use std::io::Write;

use context_error::*;
use serde::{Deserialize, Serialize};

use crate::{
    csv::write_csv, formats::SearchTool, modification::ModificationCatalog, psm::SearchResult,
    rank::RankedResult,
};

/// The columns of the synopsis file before the search tool specific columns
pub const SYNOPSIS_LEADING_COLUMNS: &[&str] = &[
    "ResultID",
    "Scan",
    "Charge",
    "PrecursorMZ",
    "DelM",
    "DelM_PPM",
    "MH",
    "Peptide",
    "Protein",
];
/// The columns of the synopsis file after the search tool specific columns
pub const SYNOPSIS_TRAILING_COLUMNS: &[&str] = &["Rank", "QValue"];
/// The columns of the sequence info file
pub const SEQUENCE_INFO_COLUMNS: &[&str] = &[
    "Unique_Seq_ID",
    "Mod_Count",
    "Mod_Description",
    "Monoisotopic_Mass",
];
/// The columns of the result to sequence map file
pub const RESULT_TO_SEQUENCE_MAP_COLUMNS: &[&str] = &["ResultID", "Unique_Seq_ID"];
/// The columns of the modification summary file
pub const MODIFICATION_SUMMARY_COLUMNS: &[&str] = &[
    "Modification_Symbol",
    "Modification_Mass",
    "Target_Residues",
    "Modification_Type",
    "Mass_Correction_Tag",
    "Occurrence_Count",
];

/// A single row in the synopsis file
#[derive(Clone, Debug)]
pub struct SynopsisEntry<Extra> {
    /// 1 based sequential identifier of this row
    pub result_id: usize,
    /// The identifier of the combination of clean sequence and modifications
    pub unique_sequence_id: usize,
    /// The result with its rank and Q-value
    pub ranked: RankedResult<SearchResult<Extra>>,
}

impl<Extra> SynopsisEntry<Extra> {
    /// The values for this row in the order of [`synopsis_header`]
    pub fn values<T: SearchTool<Extra = Extra>>(&self) -> Vec<String> {
        let result = &self.ranked.result;
        let mut values = vec![
            self.result_id.to_string(),
            result.scan.to_string(),
            result.charge.to_string(),
            format!("{:.5}", result.precursor_mz()),
            format!("{:.5}", result.delta_mass),
            format!("{:.4}", result.delta_mass_ppm),
            format!("{:.6}", result.mh()),
            result.peptide_with_flanks(),
            result.protein.clone(),
        ];
        values.extend(T::score_values(result));
        values.push(self.ranked.rank.to_string());
        values.push(format!("{:.5}", self.ranked.q_value));
        values
    }
}

/// A unique combination of a clean sequence and its modifications
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SequenceInfo {
    /// The identifier as assigned by the unique sequence registry
    pub unique_sequence_id: usize,
    /// The number of modifications
    pub modification_count: usize,
    /// The modification description
    pub modification_description: String,
    /// The monoisotopic mass of the modified peptide
    pub monoisotopic_mass: f64,
}

impl SequenceInfo {
    /// Get the sequence info for an annotated result
    pub fn from_result<Extra>(unique_sequence_id: usize, result: &SearchResult<Extra>) -> Self {
        Self {
            unique_sequence_id,
            modification_count: result.modification_count(),
            modification_description: result.modification_description.clone(),
            monoisotopic_mass: result.computed_mass,
        }
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.unique_sequence_id.to_string(),
            self.modification_count.to_string(),
            self.modification_description.clone(),
            format!("{:.6}", self.monoisotopic_mass),
        ]
    }
}

/// A single row of the modification summary
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModificationSummary {
    /// The symbol, `-` if the modification has no symbol
    pub symbol: char,
    /// The mass
    pub mass: f64,
    /// The target residues and terminus symbols
    pub target_residues: String,
    /// The modification kind code
    pub kind: char,
    /// The mass correction tag
    pub mass_correction_tag: String,
    /// The number of times this modification was placed
    pub occurrence_count: usize,
}

impl ModificationSummary {
    /// Summarise all modifications in the catalog that were placed at least once, or that were
    /// defined in the search parameters as static modification.
    pub fn from_catalog(catalog: &ModificationCatalog) -> Vec<Self> {
        catalog
            .iter()
            .filter(|d| d.occurrence_count > 0 || d.kind.is_static())
            .map(|d| Self {
                symbol: d.symbol.unwrap_or('-'),
                mass: d.mass,
                target_residues: d.target_residues_string(),
                kind: d.kind.code(),
                mass_correction_tag: d.mass_correction_tag.clone(),
                occurrence_count: d.occurrence_count,
            })
            .collect()
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.symbol.to_string(),
            format!("{:.6}", self.mass),
            self.target_residues.clone(),
            self.kind.to_string(),
            self.mass_correction_tag.clone(),
            self.occurrence_count.to_string(),
        ]
    }
}

/// All synopsis rows for a single input file together with the companion tables
#[derive(Clone, Debug)]
pub struct Synopsis<Extra> {
    /// The synopsis rows, in order of their result identifier
    pub entries: Vec<SynopsisEntry<Extra>>,
    /// The unique sequences, in order of their identifier
    pub sequences: Vec<SequenceInfo>,
    /// The modification summary
    pub modifications: Vec<ModificationSummary>,
}

impl<Extra> Default for Synopsis<Extra> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            sequences: Vec::new(),
            modifications: Vec::new(),
        }
    }
}

/// The full header of the synopsis file for the given search tool
pub fn synopsis_header<T: SearchTool>() -> Vec<&'static str> {
    SYNOPSIS_LEADING_COLUMNS
        .iter()
        .chain(T::SCORE_COLUMNS)
        .chain(SYNOPSIS_TRAILING_COLUMNS)
        .copied()
        .collect()
}

fn write_error(file: &str, error: &std::io::Error) -> BoxedError<'static, BasicKind> {
    BoxedError::new(
        BasicKind::Error,
        "Could not write file",
        format!("The {file} could not be written: {error}"),
        Context::none(),
    )
}

impl<Extra> Synopsis<Extra> {
    /// Write the synopsis file.
    /// # Errors
    /// If writing fails.
    pub fn write_synopsis<T: SearchTool<Extra = Extra>>(
        &self,
        writer: impl Write,
    ) -> Result<(), BoxedError<'static, BasicKind>> {
        write_csv(
            writer,
            &synopsis_header::<T>(),
            self.entries.iter().map(SynopsisEntry::values::<T>),
            '\t',
        )
        .map_err(|e| write_error("synopsis file", &e))
    }

    /// Write the unique sequences.
    /// # Errors
    /// If writing fails.
    pub fn write_sequence_info(
        &self,
        writer: impl Write,
    ) -> Result<(), BoxedError<'static, BasicKind>> {
        write_csv(
            writer,
            SEQUENCE_INFO_COLUMNS,
            self.sequences.iter().map(SequenceInfo::values),
            '\t',
        )
        .map_err(|e| write_error("sequence info file", &e))
    }

    /// Write the map from result identifier to unique sequence identifier.
    /// # Errors
    /// If writing fails.
    pub fn write_result_to_sequence_map(
        &self,
        writer: impl Write,
    ) -> Result<(), BoxedError<'static, BasicKind>> {
        write_csv(
            writer,
            RESULT_TO_SEQUENCE_MAP_COLUMNS,
            self.entries.iter().map(|e| {
                vec![
                    e.result_id.to_string(),
                    e.unique_sequence_id.to_string(),
                ]
            }),
            '\t',
        )
        .map_err(|e| write_error("result to sequence map file", &e))
    }

    /// Write the modification summary.
    /// # Errors
    /// If writing fails.
    pub fn write_modification_summary(
        &self,
        writer: impl Write,
    ) -> Result<(), BoxedError<'static, BasicKind>> {
        write_csv(
            writer,
            MODIFICATION_SUMMARY_COLUMNS,
            self.modifications.iter().map(ModificationSummary::values),
            '\t',
        )
        .map_err(|e| write_error("modification summary file", &e))
    }
}
