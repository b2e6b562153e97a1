//! Identity document field extraction.

mod extractor;
pub mod rules;
mod scanner;

pub use extractor::FieldExtractor;
pub use scanner::DocumentScanner;
