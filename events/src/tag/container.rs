use crate::tag::Tag;

/// An ordered set of tags without duplicates.
///
/// Insertion order is kept so filters report their tags the way they were declared.
/// Containers are small in practice (a handful of tags per subscription), so membership
/// is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagContainer {
    tags: Vec<Tag>,
}

impl TagContainer {
    /// Construct an empty container.
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Add a tag. Returns `false` if the tag was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Number of tags in the container.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// `true` if the container holds no tags.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    /// `true` if `tag` is a member, compared exactly.
    pub fn has_tag_exact(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|member| tag.matches_exact(member))
    }

    /// `true` if `tag` equals or descends from a member.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|member| tag.matches(member))
    }

    /// `true` if some member of `self` equals or descends from some member of `other`.
    ///
    /// An empty container on either side has nothing in common with anything.
    pub fn has_any(&self, other: &TagContainer) -> bool {
        self.tags.iter().any(|tag| other.has_tag(tag))
    }
}

impl Extend<Tag> for TagContainer {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl FromIterator<Tag> for TagContainer {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut container = Self::new();
        container.extend(iter);
        container
    }
}

impl From<Tag> for TagContainer {
    fn from(tag: Tag) -> Self {
        Self { tags: vec![tag] }
    }
}

impl<'a> IntoIterator for &'a TagContainer {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
