//! Tag filters attached to subscriptions.
//!
//! A [`TagFilter`] is a set of tags plus a [`MatchMode`]. Subscriptions carry one filter
//! for the event tag and one for the domain tag. An empty filter always has mode
//! [`MatchMode::Any`] and accepts everything, including an event with no domain.

use std::fmt;

use crate::tag::{Tag, TagContainer};

/// How a filter compares an incoming tag against its own tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The filter is empty and accepts every tag.
    Any,
    /// The incoming tag must equal one of the filter tags.
    Exact,
    /// The incoming tag must equal or descend from one of the filter tags.
    Hierarchical,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Any => write!(f, "any"),
            MatchMode::Exact => write!(f, "exact"),
            MatchMode::Hierarchical => write!(f, "hierarchical"),
        }
    }
}

/// A set of tags and the mode used to match against them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: TagContainer,
    exact: bool,
}

impl TagFilter {
    /// A filter that accepts every tag.
    pub const fn any() -> Self {
        Self {
            tags: TagContainer::new(),
            exact: false,
        }
    }

    /// A filter that accepts tags equal to one of `tags`.
    pub fn exact(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            exact: true,
        }
    }

    /// A filter that accepts tags equal to or below one of `tags`.
    pub fn hierarchical(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            exact: false,
        }
    }

    /// The effective match mode. Empty filters are always [`MatchMode::Any`].
    pub fn mode(&self) -> MatchMode {
        match (self.tags.is_empty(), self.exact) {
            (true, _) => MatchMode::Any,
            (false, true) => MatchMode::Exact,
            (false, false) => MatchMode::Hierarchical,
        }
    }

    /// The filter tags.
    #[inline]
    pub fn tags(&self) -> &TagContainer {
        &self.tags
    }

    /// Test an incoming tag against the filter.
    ///
    /// A missing tag only passes an empty filter.
    pub fn matches(&self, tag: Option<&Tag>) -> bool {
        match (self.mode(), tag) {
            (MatchMode::Any, _) => true,
            (_, None) => false,
            (MatchMode::Exact, Some(tag)) => self.tags.has_tag_exact(tag),
            (MatchMode::Hierarchical, Some(tag)) => self.tags.has_tag(tag),
        }
    }

    /// `true` if some tag of `tags` equals or descends from a filter tag.
    pub fn intersects(&self, tags: &TagContainer) -> bool {
        tags.has_any(&self.tags)
    }
}

impl From<Tag> for TagFilter {
    /// A single-tag hierarchical filter.
    fn from(tag: Tag) -> Self {
        Self::hierarchical([tag])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::tag;

    // ==================== Mode ====================

    #[test]
    fn empty_filters_are_any() {
        assert_eq!(TagFilter::any().mode(), MatchMode::Any);
        assert_eq!(TagFilter::exact(Vec::<Tag>::new()).mode(), MatchMode::Any);
        assert_eq!(TagFilter::hierarchical(Vec::<Tag>::new()).mode(), MatchMode::Any);
        assert_eq!(TagFilter::exact([tag("A")]).mode(), MatchMode::Exact);
        assert_eq!(
            TagFilter::hierarchical([tag("A")]).mode(),
            MatchMode::Hierarchical
        );
    }

    // ==================== Matching ====================

    #[test]
    fn exact_filter_matches_only_equal_tags() {
        let filter = TagFilter::exact([tag("A.B")]);

        assert!(filter.matches(Some(&tag("A.B"))));
        assert!(!filter.matches(Some(&tag("A.B.C"))));
        assert!(!filter.matches(Some(&tag("A"))));
    }

    #[test]
    fn hierarchical_filter_matches_descendants() {
        let filter = TagFilter::hierarchical([tag("A.B")]);

        assert!(filter.matches(Some(&tag("A.B"))));
        assert!(filter.matches(Some(&tag("A.B.C"))));
        assert!(!filter.matches(Some(&tag("A"))));
        assert!(!filter.matches(Some(&tag("X"))));
    }

    #[test]
    fn any_filter_matches_everything() {
        let filter = TagFilter::any();

        assert!(filter.matches(Some(&tag("A"))));
        assert!(filter.matches(Some(&tag("Z.Y.X"))));
        assert!(filter.matches(None));
    }

    #[test]
    fn non_empty_filter_rejects_missing_tag() {
        assert!(!TagFilter::exact([tag("A")]).matches(None));
        assert!(!TagFilter::hierarchical([tag("A")]).matches(None));
    }

    #[test]
    fn intersects_checks_hierarchically() {
        let filter = TagFilter::exact([tag("Game")]);

        assert!(filter.intersects(&[tag("Game")].into_iter().collect()));
        assert!(filter.intersects(&[tag("Game.PlayerDied")].into_iter().collect()));
        assert!(!filter.intersects(&[tag("UI")].into_iter().collect()));
        assert!(!TagFilter::any().intersects(&[tag("Game")].into_iter().collect()));
    }
}
