//! Company-registry CSV ingestion: cell normalization, metric derivation,
//! key-field extraction, and delimited-file read/write.

pub mod classify;
pub mod extract;
pub mod normalize;
pub mod parser;
pub mod reader;
