//! The search tools that can be read, each with its column names and row parser

mod moda;
mod toppic;

pub use moda::*;
pub use toppic::*;

use context_error::*;

use crate::{
    annotation::ModificationDialect, csv::CsvLine, psm::SearchResult, rank::ScoreOrientation,
};

/// A search tool whose result files can be converted to synopsis files
pub trait SearchTool {
    /// The tool specific fields of a search result
    type Extra: Clone + std::fmt::Debug + Default;

    /// The name of the tool, used in log messages
    const NAME: &'static str;
    /// The column separator
    const SEPARATOR: u8 = b'\t';
    /// The columns in order, used for files without a header line
    const DEFAULT_COLUMNS: &'static [&'static str];
    /// The syntax used for modifications in peptides
    const DIALECT: ModificationDialect;
    /// The direction in which the significance score improves
    const ORIENTATION: ScoreOrientation;
    /// The default significance score threshold for synopsis files
    const DEFAULT_THRESHOLD: f64;
    /// The headers of the tool specific score columns in synopsis files
    const SCORE_COLUMNS: &'static [&'static str];

    /// Parse a single line into a search result. The peptide is split in flanking residues and
    /// the modified peptide but is not annotated.
    /// # Errors
    /// If a required column is missing or could not be parsed.
    fn parse_line(line: &CsvLine) -> Result<SearchResult<Self::Extra>, BoxedError<'static, BasicKind>>;

    /// The values of the tool specific score columns, in the order of [`Self::SCORE_COLUMNS`]
    fn score_values(result: &SearchResult<Self::Extra>) -> Vec<String>;
}
