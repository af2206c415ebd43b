//! Predicate matching for buckets and objects.
//!
//! Two matchers: [`TagFilter`] selects candidates whose tag set contains
//! every required key-value pair, and [`PrefixSet`] selects candidates by
//! name prefix using the truncation scheme described on the type.

use bucketeer_model::Tag;

use crate::error::{Error, Result};
use crate::tags::{TagSet, pairs_to_tag_set};

// ---------------------------------------------------------------------------
// Tag filter
// ---------------------------------------------------------------------------

/// A tag-containment predicate.
///
/// A candidate matches when every key-value pair in the filter is present
/// with an equal value in the candidate's tag set. The empty filter matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter(TagSet);

impl TagFilter {
    /// Build a filter from a tag mapping.
    #[must_use]
    pub fn new(required: TagSet) -> Self {
        Self(required)
    }

    /// Build a filter from a service-format pair list.
    ///
    /// Duplicate keys resolve last-write-wins, as in
    /// [`pairs_to_tag_set`].
    #[must_use]
    pub fn from_pairs(pairs: &[Tag]) -> Self {
        Self(pairs_to_tag_set(pairs))
    }

    /// Whether this filter requires nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `candidate` contains every required pair.
    ///
    /// Missing keys simply do not satisfy their pair; they are never an
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucketeer_core::filter::TagFilter;
    /// use bucketeer_model::Tag;
    ///
    /// let filter = TagFilter::from_pairs(&[Tag::new("env", "prod")]);
    /// let candidate = bucketeer_core::tags::pairs_to_tag_set(&[
    ///     Tag::new("env", "prod"),
    ///     Tag::new("team", "data"),
    /// ]);
    /// assert!(filter.matches(&candidate));
    /// ```
    #[must_use]
    pub fn matches(&self, candidate: &TagSet) -> bool {
        self.0
            .iter()
            .all(|(key, value)| candidate.get(key) == Some(value))
    }
}

// ---------------------------------------------------------------------------
// Prefix set
// ---------------------------------------------------------------------------

/// A name predicate over one or more key prefixes.
///
/// Matching truncates the candidate name to the length of the *longest*
/// prefix in the set and tests set membership of the truncated name. With a
/// single prefix this is ordinary starts-with matching. With prefixes of
/// different lengths it produces false negatives whenever the longest prefix
/// is not itself a prefix of the candidate: `{"ab", "abc"}` does not match
/// `"abz"`, because the name truncates to `"abz"`, which is in neither.
/// [`PrefixSet::matches`] keeps this scheme so selections stay stable for
/// callers relying on it; use [`PrefixSet::starts_with_any`] for
/// conventional any-prefix semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSet {
    prefixes: Vec<String>,
    max_len: usize,
}

impl PrefixSet {
    /// Build a prefix set.
    ///
    /// An empty prefix matches every name. Duplicates are kept but have no
    /// effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when no prefixes are given.
    pub fn new<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.is_empty() {
            return Err(Error::InvalidArgument {
                message: "at least one prefix is required".to_owned(),
            });
        }
        let max_len = prefixes
            .iter()
            .map(|p| p.chars().count())
            .max()
            .unwrap_or(0);
        Ok(Self { prefixes, max_len })
    }

    /// A set containing a single prefix.
    pub fn single(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let max_len = prefix.chars().count();
        Self {
            prefixes: vec![prefix],
            max_len,
        }
    }

    /// Whether `name`, truncated to the longest prefix length, is a member
    /// of the set.
    ///
    /// Truncation counts characters, not bytes, so multi-byte names are
    /// handled without panicking. Names shorter than the longest prefix are
    /// compared whole.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let truncated = truncate_chars(name, self.max_len);
        self.prefixes.iter().any(|p| p == truncated)
    }

    /// Conventional matching: whether `name` starts with any prefix in the
    /// set.
    #[must_use]
    pub fn starts_with_any(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Truncate `name` to its first `min(len(name), max_chars)` characters.
///
/// Shared by [`PrefixSet::matches`] and the single-prefix name matching in
/// the find operations, which use the same truncation-comparison scheme.
#[must_use]
pub fn truncate_chars(name: &str, max_chars: usize) -> &str {
    match name.char_indices().nth(max_chars) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Whether `name`, truncated to the prefix's length, equals `prefix`.
///
/// The single-prefix truncation comparison used for bucket name filtering.
/// Never indexes past the end of a short name. An empty prefix matches
/// every name.
#[must_use]
pub fn name_has_prefix(prefix: &str, name: &str) -> bool {
    truncate_chars(name, prefix.chars().count()) == prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_set(entries: &[(&str, &str)]) -> TagSet {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Tag filter
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_match_everything_with_empty_filter() {
        let filter = TagFilter::default();
        assert!(filter.matches(&tag_set(&[("a", "1")])));
        assert!(filter.matches(&TagSet::new()));
    }

    #[test]
    fn test_should_match_subset_of_candidate_tags() {
        let filter = TagFilter::new(tag_set(&[("a", "1")]));
        assert!(filter.matches(&tag_set(&[("a", "1"), ("b", "2")])));
    }

    #[test]
    fn test_should_reject_mismatched_value() {
        let filter = TagFilter::new(tag_set(&[("a", "1")]));
        assert!(!filter.matches(&tag_set(&[("a", "2")])));
    }

    #[test]
    fn test_should_reject_missing_key() {
        let filter = TagFilter::new(tag_set(&[("a", "1"), ("c", "3")]));
        assert!(!filter.matches(&tag_set(&[("a", "1")])));
    }

    #[test]
    fn test_should_build_filter_from_pairs() {
        let filter = TagFilter::from_pairs(&[Tag::new("env", "prod")]);
        assert!(filter.matches(&tag_set(&[("env", "prod")])));
        assert!(!filter.matches(&tag_set(&[("env", "dev")])));
    }

    // -----------------------------------------------------------------------
    // Prefix set
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_reject_empty_prefix_set() {
        assert!(PrefixSet::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_should_match_name_truncated_to_longest_prefix() {
        let set = PrefixSet::new(["ab", "abc"]).unwrap();
        // "abcd" truncates to "abc", which is in the set.
        assert!(set.matches("abcd"));
    }

    #[test]
    fn test_should_not_match_short_name_against_longer_prefix() {
        let set = PrefixSet::new(["xyz"]).unwrap();
        // "ab" is compared whole and equals neither prefix.
        assert!(!set.matches("ab"));
    }

    #[test]
    fn test_should_document_mixed_length_false_negative() {
        let set = PrefixSet::new(["ab", "abc"]).unwrap();
        // "abz" starts with "ab", but truncation to 3 yields "abz", a member
        // of neither; the compatible matcher misses it.
        assert!(!set.matches("abz"));
        assert!(set.starts_with_any("abz"));
    }

    #[test]
    fn test_should_match_everything_with_empty_prefix() {
        let set = PrefixSet::single("");
        assert!(set.matches("anything"));
        assert!(set.matches(""));
    }

    #[test]
    fn test_should_truncate_by_characters_not_bytes() {
        let set = PrefixSet::single("héllo");
        assert!(set.matches("héllo-world"));
        assert!(!set.matches("héllp-world"));
    }

    #[test]
    fn test_should_match_single_prefix_names() {
        assert!(name_has_prefix("sim", "sim-results-2024"));
        assert!(!name_has_prefix("sim", "si"));
        assert!(name_has_prefix("", "any-bucket"));
    }
}
