use serde::Serialize;

/// A single commit from the scanned history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    /// Abbreviated hash used for display
    pub abbrev_hash: String,
    /// Full commit message with trailing newlines removed
    pub message: String,
}

impl CommitRecord {
    /// Create a record, deriving the abbreviated hash
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        let hash = hash.into();
        let abbrev_hash = hash.chars().take(7).collect();
        let message = message.into();

        CommitRecord {
            hash,
            abbrev_hash,
            message: message.trim_end_matches(['\n', '\r']).to_string(),
        }
    }

    /// First line of the message
    pub fn header(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Location of the text that triggered a version increment
///
/// `index` is the position of the commit within the scanned history (newest
/// first). `start..end` is a byte range within that commit's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchPosition {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl MatchPosition {
    pub fn new(index: usize, start: usize, end: usize) -> Self {
        MatchPosition { index, start, end }
    }

    /// Matched slice of `message`, if the range falls within it
    pub fn slice<'a>(&self, message: &'a str) -> Option<&'a str> {
        message.get(self.start..self.end)
    }
}
