use crate::resolver::ResolvedNext;
use std::collections::HashMap;

/// Context information passed to a hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    /// Next tag about to be created
    pub next_tag: String,
    /// Latest existing release, or the assumed first version
    pub prev_tag: String,
    /// Path relative to the repository root; empty outside a monorepo
    pub working_directory: String,
}

impl HookContext {
    /// Convert context to environment variables for the hook command
    ///
    /// Maps context fields to NSV_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("NSV_NEXT_TAG".to_string(), self.next_tag.clone());
        env.insert("NSV_PREV_TAG".to_string(), self.prev_tag.clone());
        env.insert(
            "NSV_WORKING_DIRECTORY".to_string(),
            self.working_directory.clone(),
        );

        env
    }
}

impl From<&ResolvedNext> for HookContext {
    fn from(next: &ResolvedNext) -> Self {
        HookContext {
            next_tag: next.tag.clone(),
            prev_tag: next.prev_tag.clone(),
            working_directory: next.log_dir.clone(),
        }
    }
}
