//! CLI definition
//!
//! Every option can also be set through the environment variable named in
//! its help text.

pub mod orchestration;

use crate::config::ConventionalStrategy;
use crate::domain::template::{DEFAULT_COMMIT_MESSAGE, DEFAULT_TAG_MESSAGE};
use crate::domain::{CommitTemplate, MessageTemplate, TagTemplate};
use crate::error::Result;
use crate::ui::{Pretty, SummaryOptions};
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};

/// nsv - next semantic version, calculated from conventional commits
#[derive(Debug, Parser)]
#[command(name = "nsv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Logging level: debug, info, warn or error
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Disable all log output
    #[arg(long, global = true, env = "NO_LOG", value_parser = FalseyValueParser::new())]
    pub no_log: bool,

    /// Disable coloured output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Calculate the next semantic version
    Next(NextCommand),

    /// Tag the repository with the next semantic version
    Tag(TagCommand),

    /// Patch files with the next semantic version and commit them
    Patch(PatchCommand),

    /// Render a tag through a format template
    Format(FormatCommand),
}

/// Options shared by every command that resolves a next version
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Paths relative to the current directory; defaults to the current
    /// directory
    pub paths: Vec<String>,

    /// Template used to format the next tag
    #[arg(short, long, env = "NSV_FORMAT", default_value = "")]
    pub format: String,

    /// Comma separated prefixes that trigger a major increment
    #[arg(long, env = "NSV_MAJOR_PREFIXES", value_delimiter = ',')]
    pub major_prefixes: Vec<String>,

    /// Comma separated prefixes that trigger a minor increment
    #[arg(long, env = "NSV_MINOR_PREFIXES", value_delimiter = ',')]
    pub minor_prefixes: Vec<String>,

    /// Comma separated prefixes that trigger a patch increment
    #[arg(long, env = "NSV_PATCH_PREFIXES", value_delimiter = ',')]
    pub patch_prefixes: Vec<String>,

    /// Show how the next version was calculated
    #[arg(short, long, env = "NSV_SHOW", value_parser = FalseyValueParser::new())]
    pub show: bool,

    /// Summary layout used by --show: full or compact
    #[arg(short, long, env = "NSV_PRETTY", default_value = "full")]
    pub pretty: Pretty,

    /// Print the calculation as JSON instead of plain tags
    #[arg(long)]
    pub json: bool,
}

impl ResolveArgs {
    pub fn strategy(&self) -> ConventionalStrategy {
        ConventionalStrategy::with_overrides(
            &self.major_prefixes,
            &self.minor_prefixes,
            &self.patch_prefixes,
        )
    }

    pub fn template(&self) -> Result<TagTemplate> {
        TagTemplate::parse(&self.format)
    }

    pub fn summary(&self, color: bool) -> SummaryOptions {
        SummaryOptions {
            pretty: self.pretty,
            color,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct NextCommand {
    #[command(flatten)]
    pub resolve: ResolveArgs,
}

#[derive(Debug, Clone, Args)]
pub struct TagCommand {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Template for the annotation of each created tag
    #[arg(short, long, env = "NSV_TAG_MESSAGE", default_value = DEFAULT_TAG_MESSAGE)]
    pub message: String,

    /// Shell command run before each tag is created
    #[arg(long, env = "NSV_HOOK")]
    pub hook: Option<String>,

    /// Calculate the tags without running the hook or tagging
    #[arg(long, env = "NSV_DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

impl TagCommand {
    pub fn message_template(&self) -> Result<MessageTemplate> {
        MessageTemplate::parse(&self.message)
    }
}

#[derive(Debug, Clone, Args)]
pub struct PatchCommand {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Template for the message of each patch commit
    #[arg(
        short = 'M',
        long,
        env = "NSV_COMMIT_MESSAGE",
        default_value = DEFAULT_COMMIT_MESSAGE
    )]
    pub commit_message: String,

    /// Shell command that patches files with the next version
    #[arg(long, env = "NSV_HOOK")]
    pub hook: String,

    /// Run the hook, then discard its changes instead of committing them
    #[arg(long, env = "NSV_DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

impl PatchCommand {
    pub fn commit_template(&self) -> Result<CommitTemplate> {
        CommitTemplate::parse(&self.commit_message)
    }
}

#[derive(Debug, Clone, Args)]
pub struct FormatCommand {
    /// Tag to render
    pub tag: String,

    /// Template used to format the tag
    #[arg(short, long, env = "NSV_FORMAT", default_value = "")]
    pub format: String,
}
