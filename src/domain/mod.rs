//! Domain logic - pure versioning rules independent of git operations

pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod template;
pub mod version;

pub use commit::{CommitRecord, MatchPosition};
pub use prerelease::{PreRelease, PreReleaseLabel};
pub use tag::Tag;
pub use template::{CommitTemplate, MessageTemplate, TagTemplate};
pub use version::Increment;
