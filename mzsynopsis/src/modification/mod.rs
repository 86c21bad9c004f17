//! Modification definitions and the catalog used to look them up during annotation

mod catalog;
mod definition;
mod known;
mod terminus;

pub use catalog::*;
pub use definition::*;
pub use known::*;
pub use terminus::*;
