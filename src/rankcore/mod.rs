pub mod tokenizer;
pub mod error;
pub mod cfg;
pub mod index;
pub mod meta;
pub mod stats;
pub mod ranking;
pub mod engine;

pub type DocId = i64;
pub type Term = String;

pub const SERVICE_NAME: &str = "ranker";
