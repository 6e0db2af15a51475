//! Field templates for tag names and tag messages
//!
//! A template is literal text interleaved with `{{.Field}}` actions. Only
//! plain field actions are understood, and each kind of template accepts a
//! fixed set of fields, so an unknown field is rejected at parse time rather
//! than rendering an invalid version.

use crate::domain::tag::Tag;
use crate::error::{NsvError, Result};
use regex::Regex;

/// Fields a tag template may reference
pub const TAG_FIELDS: &[&str] = &["Prefix", "SemVer", "Version", "Raw", "Pre", "Metadata"];

/// Fields a tag message template may reference
pub const MESSAGE_FIELDS: &[&str] = &["Tag", "PrevTag"];

/// Renders the tag exactly as the bump produced it
pub const DEFAULT_TAG_TEMPLATE: &str = "{{.Raw}}";

pub const DEFAULT_TAG_MESSAGE: &str = "chore: tagged release {{.Tag}}";

/// Fields a patch commit message template may reference
pub const COMMIT_FIELDS: &[&str] = &["Tag", "PrevTag", "SkipPipelineTag"];

pub const DEFAULT_COMMIT_MESSAGE: &str =
    "chore: patched files for release {{.Tag}} {{.SkipPipelineTag}}";

const ACTION_PATTERN: &str = r"(?s)\{\{(.*?)\}\}";
const FIELD_PATTERN: &str = r"^\.([A-Za-z_][A-Za-z0-9_]*)$";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A validated template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, accepting only the given field names
    pub fn parse(source: &str, fields: &[&str]) -> Result<Self> {
        let action = Regex::new(ACTION_PATTERN).map_err(|e| NsvError::template(e.to_string()))?;
        let field = Regex::new(FIELD_PATTERN).map_err(|e| NsvError::template(e.to_string()))?;

        let mut segments = Vec::new();
        let mut last = 0;

        for captures in action.captures_iter(source) {
            let (Some(whole), Some(body)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            push_literal(&mut segments, &source[last..whole.start()])?;
            last = whole.end();

            let body = body.as_str().trim();
            let name = field
                .captures(body)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .ok_or_else(|| {
                    NsvError::template(format!("unsupported action '{{{{{}}}}}'", body))
                })?;

            if !fields.contains(&name) {
                return Err(NsvError::UnsupportedField {
                    field: name.to_string(),
                });
            }

            segments.push(Segment::Field(name.to_string()));
        }

        push_literal(&mut segments, &source[last..])?;

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    /// Render the template, resolving each field through `resolve`
    pub fn render<'a, F>(&self, resolve: F) -> String
    where
        F: Fn(&str) -> &'a str,
    {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Field(name) => resolve(name),
            })
            .collect()
    }

    /// The template as written
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) -> Result<()> {
    if text.contains("{{") {
        return Err(NsvError::template(format!("unclosed action in '{}'", text)));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

/// Template used to format the next tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTemplate(Template);

impl TagTemplate {
    /// Parse a tag template; an empty string selects the default
    pub fn parse(source: &str) -> Result<Self> {
        let source = if source.is_empty() {
            DEFAULT_TAG_TEMPLATE
        } else {
            source
        };
        Template::parse(source, TAG_FIELDS).map(TagTemplate)
    }

    pub fn render(&self, tag: &Tag) -> String {
        self.0.render(|field| match field {
            "Prefix" => tag.prefix.as_str(),
            "SemVer" => tag.semver.as_str(),
            "Version" => tag.version.as_str(),
            "Raw" => tag.raw.as_str(),
            "Pre" => tag.pre.as_str(),
            "Metadata" => tag.metadata.as_str(),
            _ => "",
        })
    }

    pub fn source(&self) -> &str {
        self.0.source()
    }
}

impl Default for TagTemplate {
    fn default() -> Self {
        TagTemplate(Template {
            source: DEFAULT_TAG_TEMPLATE.to_string(),
            segments: vec![Segment::Field("Raw".to_string())],
        })
    }
}

/// Template used for the annotation of a created tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate(Template);

impl MessageTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let source = if source.is_empty() {
            DEFAULT_TAG_MESSAGE
        } else {
            source
        };
        Template::parse(source, MESSAGE_FIELDS).map(MessageTemplate)
    }

    pub fn render(&self, tag: &str, prev_tag: &str) -> String {
        self.0.render(|field| match field {
            "Tag" => tag,
            "PrevTag" => prev_tag,
            _ => "",
        })
    }
}

/// Template used for the commit message of patched files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTemplate(Template);

impl CommitTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let source = if source.is_empty() {
            DEFAULT_COMMIT_MESSAGE
        } else {
            source
        };
        Template::parse(source, COMMIT_FIELDS).map(CommitTemplate)
    }

    pub fn render(&self, tag: &str, prev_tag: &str, skip_pipeline_tag: &str) -> String {
        self.0.render(|field| match field {
            "Tag" => tag,
            "PrevTag" => prev_tag,
            "SkipPipelineTag" => skip_pipeline_tag,
            _ => "",
        })
    }
}
