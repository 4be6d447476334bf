//! Interning table for known tags.
//!
//! The [`Registry`] plays the role of a project's tag manager: tags are declared once,
//! their ancestors are declared implicitly, and lookups only succeed for declared tags.
//! Every tag handed out by a registry shares its backing string with all other copies of
//! that tag, so comparisons between registry tags are pointer comparisons.
//!
//! # Thread Safety
//!
//! Lookups take only a shard read lock of the underlying `DashMap`. Registration of a new
//! tag takes the write lock of that entry's shard only.

use std::sync::Arc;

use dashmap::DashMap;

use crate::tag::{ParseError, SEPARATOR, Tag, validate};

/// A thread-safe set of declared tags.
#[derive(Debug, Default)]
pub struct Registry {
    tags: DashMap<Arc<str>, Tag>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tags: DashMap::new(),
        }
    }

    /// Declare a tag and all of its ancestors, returning the interned tag.
    ///
    /// Declaring an existing tag returns the instance that is already interned.
    pub fn register(&self, name: &str) -> Result<Tag, ParseError> {
        if let Some(existing) = self.tags.get(name) {
            return Ok(existing.clone());
        }
        validate(name)?;

        // Ancestors first so a partially registered chain is never observable as a gap.
        for (index, _) in name.match_indices(SEPARATOR) {
            self.intern(&name[..index]);
        }
        Ok(self.intern(name))
    }

    /// Look up a declared tag.
    pub fn get(&self, name: &str) -> Option<Tag> {
        self.tags.get(name).map(|entry| entry.value().clone())
    }

    /// `true` if the tag has been declared, directly or as an ancestor.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// The declared tags directly below `parent`, sorted by name.
    pub fn children(&self, parent: &Tag) -> Vec<Tag> {
        let mut children: Vec<Tag> = self
            .tags
            .iter()
            .filter(|entry| entry.value().parent().as_ref() == Some(parent))
            .map(|entry| entry.value().clone())
            .collect();
        children.sort();
        children
    }

    /// Number of declared tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// `true` if nothing has been declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn intern(&self, name: &str) -> Tag {
        let key: Arc<str> = Arc::from(name);
        self.tags
            .entry(Arc::clone(&key))
            .or_insert_with(|| Tag::from_validated(key))
            .value()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn register_declares_ancestors() {
        // Given
        let registry = Registry::new();

        // When
        let tag = registry.register("UI.Button.Clicked").unwrap();

        // Then
        assert_eq!(tag.as_str(), "UI.Button.Clicked");
        assert!(registry.contains("UI"));
        assert!(registry.contains("UI.Button"));
        assert!(registry.contains("UI.Button.Clicked"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn register_returns_interned_instance() {
        let registry = Registry::new();

        let first = registry.register("Game.PlayerDied").unwrap();
        let second = registry.register("Game.PlayerDied").unwrap();

        assert_eq!(first, second);
        assert!(std::ptr::eq(first.as_str(), second.as_str()));
    }

    #[test]
    fn register_rejects_invalid_names() {
        let registry = Registry::new();

        assert_eq!(registry.register(""), Err(ParseError::Empty));
        assert!(registry.register("Game..Died").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn get_only_finds_declared_tags() {
        let registry = Registry::new();
        registry.register("Game.PlayerDied").unwrap();

        assert!(registry.get("Game").is_some());
        assert!(registry.get("Game.PlayerDied").is_some());
        assert!(registry.get("Game.PlayerSpawned").is_none());
    }

    #[test]
    fn children_are_direct_and_sorted() {
        let registry = Registry::new();
        registry.register("Game.PlayerSpawned").unwrap();
        registry.register("Game.PlayerDied.Fall").unwrap();
        registry.register("UI.Button").unwrap();
        let game = registry.get("Game").unwrap();

        let children = registry.children(&game);

        assert_eq!(
            children.iter().map(Tag::as_str).collect::<Vec<_>>(),
            vec!["Game.PlayerDied", "Game.PlayerSpawned"]
        );
    }

    #[test]
    fn concurrent_registration_interns_once() {
        let registry = Arc::new(Registry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.register("Net.Session.Joined").unwrap())
            })
            .collect();
        let tags: Vec<Tag> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.len(), 3);
        assert!(tags.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
