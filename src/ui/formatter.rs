//! Pure formatting functions for UI output.
//!
//! Everything here builds strings; printing happens in the parent module.

use crate::domain::{CommitRecord, MatchPosition};
use crate::resolver::ResolvedNext;
use console::Style;
use std::fmt;
use std::str::FromStr;

const MATCH_MARKER: &str = "✓";
const BUMP_MARKER: &str = "↑↑";
const MESSAGE_INDENT: &str = "          ";

/// Layout of the summary printed with `--show`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pretty {
    /// Every scanned commit
    #[default]
    Full,
    /// Only the commit that decided the increment
    Compact,
}

impl FromStr for Pretty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Pretty::Full),
            "compact" => Ok(Pretty::Compact),
            other => Err(format!(
                "pretty format '{}' is not supported, must be one of either: full, compact",
                other
            )),
        }
    }
}

impl fmt::Display for Pretty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pretty::Full => write!(f, "full"),
            Pretty::Compact => write!(f, "compact"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    pub pretty: Pretty,
    pub color: bool,
}

struct Palette {
    tag: Style,
    prev_tag: Style,
    hash: Style,
    marker: Style,
    highlight: Style,
    color: bool,
}

impl Palette {
    fn new(color: bool) -> Self {
        Palette {
            tag: Style::new().green().bold().force_styling(color),
            prev_tag: Style::new().dim().force_styling(color),
            hash: Style::new().yellow().force_styling(color),
            marker: Style::new().green().force_styling(color),
            highlight: Style::new().green().bold().underlined().force_styling(color),
            color,
        }
    }

    fn highlight(&self, span: &str) -> String {
        if self.color {
            self.highlight.apply_to(span).to_string()
        } else {
            format!(">>{}<<", span)
        }
    }
}

/// Render a summary of resolved versions, one block per result separated by
/// a blank line.
pub fn render_summary(results: &[ResolvedNext], opts: &SummaryOptions) -> String {
    let palette = Palette::new(opts.color);

    results
        .iter()
        .map(|next| render_one(next, opts.pretty, &palette))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_one(next: &ResolvedNext, pretty: Pretty, palette: &Palette) -> String {
    let mut out = format!(
        "{} {} {}\n",
        palette.tag.apply_to(&next.tag),
        BUMP_MARKER,
        palette.prev_tag.apply_to(&next.prev_tag)
    );

    if !next.log_dir.is_empty() {
        out.push_str(&format!("(dir: {})\n", next.log_dir));
    }
    out.push('\n');

    for (index, commit) in next.log.iter().enumerate() {
        let matched = index == next.position.index;
        if pretty == Pretty::Compact && !matched {
            continue;
        }
        out.push_str(&render_commit(
            commit,
            matched.then_some(&next.position),
            palette,
        ));
    }

    out
}

fn render_commit(
    commit: &CommitRecord,
    position: Option<&MatchPosition>,
    palette: &Palette,
) -> String {
    let hash = palette.hash.apply_to(&commit.abbrev_hash);

    let Some(position) = position else {
        return format!("  {} {}\n", hash, commit.header());
    };

    let message = highlight_span(&commit.message, position, palette);
    let mut lines = message.lines();
    let mut out = format!(
        "{} {} {}\n",
        palette.marker.apply_to(MATCH_MARKER),
        hash,
        lines.next().unwrap_or_default()
    );
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{}{}\n", MESSAGE_INDENT, line));
        }
    }
    out
}

/// Highlight the matched span of a message. Spans that do not fall on
/// character boundaries leave the message untouched.
fn highlight_span(message: &str, position: &MatchPosition, palette: &Palette) -> String {
    match position.slice(message) {
        Some(span) if !span.is_empty() => format!(
            "{}{}{}",
            &message[..position.start],
            palette.highlight(span),
            &message[position.end..]
        ),
        _ => message.to_string(),
    }
}
