pub mod extractor;
pub mod properties;

pub use extractor::{MetadataExtractor, extract};
