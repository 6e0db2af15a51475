//! User interface module - output and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to stdout and stderr
//!
//! Computed tags are the only thing written to stdout so the output can be
//! captured by scripts. Everything else goes to stderr.

use crate::boundary::BoundaryWarning;
use crate::resolver::ResolvedNext;
use console::Style;

pub mod formatter;

pub use formatter::{render_summary, Pretty, SummaryOptions};

/// Whether stderr output should be styled
pub fn use_color(no_color: bool) -> bool {
    !no_color && console::colors_enabled_stderr()
}

/// Print tags to stdout as a comma separated list. Nothing is printed when
/// there are no tags.
pub fn print_tags(tags: &[String]) {
    if !tags.is_empty() {
        println!("{}", tags.join(","));
    }
}

/// Print resolved versions to stdout as JSON
pub fn print_json(results: &[ResolvedNext]) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

/// Print a summary of resolved versions to stderr
pub fn print_summary(results: &[ResolvedNext], opts: &SummaryOptions) {
    if !results.is_empty() {
        eprint!("{}", render_summary(results, opts));
    }
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning, color: bool) {
    let style = Style::new().yellow().force_styling(color);
    eprintln!("{} {}", style.apply_to("⚠ WARNING:"), warning);
}

/// Format and print an error message in red.
pub fn display_error(message: &str, color: bool) {
    let style = Style::new().red().force_styling(color);
    eprintln!("{} {}", style.apply_to("ERROR:"), message);
}
