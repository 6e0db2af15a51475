//! Continuous integration platform detection
//!
//! Patch commits carry a marker in their message so the CI platform does not
//! start another build for them. Most platforms accept `[skip ci]`; a few
//! only understand their own spelling.

use std::env;

/// Marker understood by most CI platforms
pub const DEFAULT_SKIP_PIPELINE_TAG: &str = "[skip ci]";

/// Skip marker for the CI platform found in the environment
pub fn skip_pipeline_tag() -> &'static str {
    skip_pipeline_tag_from(|name| env::var(name).ok())
}

/// Skip marker for the platform described by `var`
pub fn skip_pipeline_tag_from<F>(var: F) -> &'static str
where
    F: Fn(&str) -> Option<String>,
{
    if var("DRONE").as_deref() == Some("true") {
        return "[CI SKIP]";
    }

    if var("JENKINS_URL").is_some_and(|url| !url.is_empty()) {
        return "[ci skip]";
    }

    DEFAULT_SKIP_PIPELINE_TAG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn detect(vars: &[(&str, &str)]) -> &'static str {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        skip_pipeline_tag_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_marker() {
        assert_eq!(detect(&[]), "[skip ci]");
        assert_eq!(detect(&[("GITHUB_ACTIONS", "true")]), "[skip ci]");
    }

    #[test]
    fn test_drone() {
        assert_eq!(detect(&[("DRONE", "true")]), "[CI SKIP]");
        assert_eq!(detect(&[("DRONE", "false")]), "[skip ci]");
    }

    #[test]
    fn test_jenkins() {
        assert_eq!(
            detect(&[("JENKINS_URL", "https://ci.example.com/")]),
            "[ci skip]"
        );
        assert_eq!(detect(&[("JENKINS_URL", "")]), "[skip ci]");
    }
}
