//! nsv - next semantic version
//!
//! Calculates the next semantic version of a repository, or of individual
//! projects within a monorepo, from conventional commits and `nsv:` commit
//! footers.

pub mod analyzer;
pub mod boundary;
pub mod ci;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod directive;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod resolver;
pub mod ui;
pub mod version;

pub use error::{NsvError, Result};
