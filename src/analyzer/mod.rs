//! Analysis engine for determining the increment a history warrants

pub mod version_analyzer;

pub use version_analyzer::{Analysis, VersionAnalyzer};
