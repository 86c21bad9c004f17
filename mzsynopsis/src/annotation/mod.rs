//! Placing modifications on peptides: the peptide tokenizer and the annotator

mod annotated;
mod annotator;
mod tokenizer;

pub use annotated::*;
pub use annotator::*;
pub use tokenizer::*;
