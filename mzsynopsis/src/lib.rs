#![doc = include_str!("../README.md")]

mod helper_functions;

/// Annotating peptides with the modifications written in the peptide and the static modifications from the catalog
pub mod annotation;
/// Residue masses and peptide mass calculation
pub mod chemistry;
/// Parse CSV files while keeping track of all necessary info to generate great error messages
pub mod csv;
pub mod fdr;
pub mod formats;
/// Modification definitions, the catalog, and the built in mass correction tags
pub mod modification;
pub mod parameters;
pub mod processor;
pub mod psm;
pub mod rank;
pub mod reconcile;
pub mod synopsis;
pub mod unique_sequence;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::annotation::{ModificationAnnotator, ModificationDialect};
    pub use crate::chemistry::PeptideMassCalculator;
    pub use crate::formats::{MODa, SearchTool, TopPIC};
    pub use crate::modification::{
        ModificationCatalog, ModificationDefinition, ModificationKind, TerminusState,
    };
    pub use crate::parameters::{ParseJson, SynopsisParameters};
    pub use crate::processor::{process_file, process_reader, write_outputs};
    pub use crate::psm::SearchResult;
    pub use crate::rank::{RankedResult, ScoreOrientation};
    pub use crate::unique_sequence::UniqueSequenceRegistry;
}
