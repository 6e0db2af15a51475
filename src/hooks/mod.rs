//! User-defined hooks
//!
//! A hook is a shell command run after the next version is resolved and
//! before the repository is tagged. It receives the resolved versions
//! through NSV_* environment variables.

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::HookContext;
