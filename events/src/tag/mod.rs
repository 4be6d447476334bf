//! Hierarchical, dot-delimited tags.
//!
//! A [`Tag`] names an event (`"Game.PlayerDied"`) or a domain (`"Domains.UI"`). The dots
//! form a hierarchy: `"UI.Button"` is an ancestor of `"UI.Button.Clicked"`, and a filter
//! on the ancestor can be set up to accept every descendant.
//!
//! Tags are immutable and share their backing string, so cloning one is a reference count
//! bump. Tags produced by a [`Registry`] are interned, which lets equality short-circuit
//! on pointer identity.
//!
//! # Example
//!
//! ```rust,ignore
//! let clicked = Tag::new("UI.Button.Clicked")?;
//! let button = Tag::new("UI.Button")?;
//!
//! assert!(clicked.is_descendant_of(&button));
//! assert!(clicked.matches(&button));
//! assert!(!button.matches(&clicked));
//! assert_eq!(clicked.parent(), Some(button));
//! ```

mod container;
mod registry;

use std::{fmt, hash, str::FromStr, sync::Arc};

pub use container::TagContainer;
pub use registry::Registry;

/// Separator between the segments of a tag.
pub const SEPARATOR: char = '.';

/// An immutable hierarchical identifier such as `"Game.PlayerDied"`.
#[derive(Clone)]
pub struct Tag(Arc<str>);

impl Tag {
    /// Parse and validate a tag.
    ///
    /// A valid tag is non-empty, has no empty segments (no leading, trailing or doubled
    /// separators), and contains no whitespace.
    pub fn new(name: &str) -> Result<Self, ParseError> {
        validate(name)?;
        Ok(Self(Arc::from(name)))
    }

    /// The full tag text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the segments of the tag, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Number of segments. A root tag has depth 1.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The direct parent of this tag, or `None` for a root tag.
    pub fn parent(&self) -> Option<Tag> {
        self.0
            .rfind(SEPARATOR)
            .map(|index| Tag(Arc::from(&self.0[..index])))
    }

    /// Exact equality.
    #[inline]
    pub fn matches_exact(&self, other: &Tag) -> bool {
        self == other
    }

    /// Determine whether `self` is strictly below `ancestor` in the hierarchy.
    ///
    /// Segment boundaries are respected: `"A.BC"` does not descend from `"A.B"`.
    pub fn is_descendant_of(&self, ancestor: &Tag) -> bool {
        let (name, prefix) = (self.as_str(), ancestor.as_str());
        name.len() > prefix.len()
            && name.starts_with(prefix)
            && name[prefix.len()..].starts_with(SEPARATOR)
    }

    /// Hierarchy-aware containment: `self` equals `other` or descends from it.
    #[inline]
    pub fn matches(&self, other: &Tag) -> bool {
        self.matches_exact(other) || self.is_descendant_of(other)
    }

    /// Build a tag from text that has already been validated.
    fn from_validated(name: Arc<str>) -> Self {
        Self(name)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Tag {}

impl hash::Hash for Tag {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Tag {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The reason a string could not be turned into a [`Tag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The tag text was empty.
    Empty,
    /// The tag had an empty segment at the given segment index.
    EmptySegment { tag: String, index: usize },
    /// The tag contained whitespace.
    Whitespace { tag: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "tag is empty"),
            ParseError::EmptySegment { tag, index } => {
                write!(f, "tag '{tag}' has an empty segment at position {index}")
            }
            ParseError::Whitespace { tag } => write!(f, "tag '{tag}' contains whitespace"),
        }
    }
}

impl std::error::Error for ParseError {}

fn validate(name: &str) -> Result<(), ParseError> {
    if name.is_empty() {
        return Err(ParseError::Empty);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ParseError::Whitespace {
            tag: name.to_owned(),
        });
    }
    if let Some(index) = name.split(SEPARATOR).position(str::is_empty) {
        return Err(ParseError::EmptySegment {
            tag: name.to_owned(),
            index,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn tag(name: &str) -> Tag {
    Tag::new(name).unwrap()
}
