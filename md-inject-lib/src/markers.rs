//! Builds the HTML comment markers that delimit an injected region.

/// Identifier used when no `--id` is given.
pub const DEFAULT_TAG_ID: &str = "default";

const START_PREFIX: &str = "<!-- START md-inject:";
const END_PREFIX: &str = "<!-- END md-inject:";
const SUFFIX: &str = " -->";

/// The start/end marker pair scoped by an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub start: String,
    pub end: String,
}

/// Where each tag of a [`TagPair`] was found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagPositions {
    /// Byte offset of the first start tag.
    pub start: Option<usize>,
    /// Byte offset of the first end tag.
    pub end: Option<usize>,
    pub start_count: usize,
    pub end_count: usize,
}

impl TagPair {
    /// Formats the marker pair for `id`.
    ///
    /// ```rust
    /// use md_inject_lib::markers::TagPair;
    ///
    /// let tags = TagPair::for_id("usage");
    /// assert_eq!(tags.start, "<!-- START md-inject:usage -->");
    /// assert_eq!(tags.end, "<!-- END md-inject:usage -->");
    /// ```
    pub fn for_id(id: &str) -> Self {
        Self {
            start: format!("{START_PREFIX}{id}{SUFFIX}"),
            end: format!("{END_PREFIX}{id}{SUFFIX}"),
        }
    }

    /// Scans `document` for both tags. Only plain substring matches count.
    pub fn locate(&self, document: &str) -> TagPositions {
        TagPositions {
            start: document.find(&self.start),
            end: document.find(&self.end),
            start_count: document.matches(self.start.as_str()).count(),
            end_count: document.matches(self.end.as_str()).count(),
        }
    }
}

impl Default for TagPair {
    fn default() -> Self {
        Self::for_id(DEFAULT_TAG_ID)
    }
}
