//! Link integrity resolution for markdown corpora.
//!
//! Scans a tree of text documents, extracts every link-like token
//! regardless of syntax, tries to resolve each one under a fixed list of
//! root-rewriting rules, and reports which links are valid and which are
//! broken.

pub mod candidates;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod index;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod types;

pub use config::Config;
pub use engine::{analyze, analyze_path};
pub use error::Error;
pub use report::Report;
pub use scanner::Corpus;
pub use types::{LinkOccurrence, LinkRecord, LinkType, ResolutionResult};
