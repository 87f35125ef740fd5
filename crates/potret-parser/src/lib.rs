pub mod lexicon;
pub mod revision;

pub use revision::RevisionParser;
