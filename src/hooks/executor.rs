use crate::error::{NsvError, Result};
use crate::hooks::HookContext;
use std::process::Command;
use tracing::{debug, instrument};

const SHELL: &str = "sh";

/// Executes user-defined hook commands
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook command with the given context
    ///
    /// The command is run through `sh -c` with the context exported as
    /// environment variables. If the command exits with code 0, the hook
    /// succeeds. Any non-zero exit code is treated as a failure.
    ///
    /// # Arguments
    /// * `command` - Shell command line to run
    /// * `context` - Hook context with environment variables
    ///
    /// # Returns
    /// * `Ok(())` if hook succeeds (exit code 0)
    /// * `Err` if the shell cannot be started or the command fails
    #[instrument(skip(context))]
    pub fn execute(command: &str, context: &HookContext) -> Result<()> {
        if command.trim().is_empty() {
            return Err(NsvError::hook("Hook command is empty"));
        }

        let output = Command::new(SHELL)
            .arg("-c")
            .arg(command)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| NsvError::hook(format!("Failed to execute hook '{}': {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(NsvError::hook(format!(
                "Hook '{}' failed with exit code {}\nStdout: {}\nStderr: {}",
                command,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        debug!(
            stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
            "hook succeeded"
        );
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn context() -> HookContext {
        HookContext {
            next_tag: "0.2.0".to_string(),
            prev_tag: "0.1.0".to_string(),
            working_directory: String::new(),
        }
    }

    #[test]
    fn test_successful_hook() {
        assert!(HookExecutor::execute("true", &context()).is_ok());
    }

    #[test]
    fn test_failing_hook_reports_exit_code_and_output() {
        let err = HookExecutor::execute("echo broken >&2; exit 3", &context()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exit code 3"), "got: {}", msg);
        assert!(msg.contains("broken"), "got: {}", msg);
    }

    #[test]
    fn test_empty_hook_fails() {
        assert!(HookExecutor::execute("  ", &context()).is_err());
    }

    #[test]
    fn test_hook_sees_context() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("env.txt");
        let command = format!(
            "echo \"$NSV_PREV_TAG -> $NSV_NEXT_TAG\" > '{}'",
            out.display()
        );

        HookExecutor::execute(&command, &context()).unwrap();

        let written = fs::read_to_string(out).unwrap();
        assert_eq!(written.trim(), "0.1.0 -> 0.2.0");
    }
}
