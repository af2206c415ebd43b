//! Tag-set conversion and merging.
//!
//! The service represents a tag set as an ordered list of key-value pairs;
//! callers usually want a plain mapping. The two views convert losslessly in
//! both directions when keys are unique, and the list-to-mapping direction
//! resolves duplicate keys by last-write-wins.

use std::collections::BTreeMap;

use bucketeer_model::Tag;

/// A tag set in its mapping view: keys unique, order-independent.
pub type TagSet = BTreeMap<String, String>;

/// Convert a tag mapping to the service's ordered pair-list representation.
///
/// # Examples
///
/// ```
/// use bucketeer_core::tags::{TagSet, tag_set_to_pairs};
///
/// let mut tags = TagSet::new();
/// tags.insert("env".to_owned(), "prod".to_owned());
/// let pairs = tag_set_to_pairs(&tags);
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].key, "env");
/// ```
#[must_use]
pub fn tag_set_to_pairs(tags: &TagSet) -> Vec<Tag> {
    tags.iter().map(|(k, v)| Tag::new(k, v)).collect()
}

/// Convert a service pair list to the mapping view.
///
/// Duplicate keys resolve last-write-wins: a later entry in the list
/// overrides an earlier one. With unique keys this is the exact inverse of
/// [`tag_set_to_pairs`].
///
/// # Examples
///
/// ```
/// use bucketeer_core::tags::pairs_to_tag_set;
/// use bucketeer_model::Tag;
///
/// let pairs = vec![Tag::new("a", "1"), Tag::new("a", "2")];
/// let tags = pairs_to_tag_set(&pairs);
/// assert_eq!(tags.get("a").map(String::as_str), Some("2"));
/// ```
#[must_use]
pub fn pairs_to_tag_set(pairs: &[Tag]) -> TagSet {
    pairs
        .iter()
        .map(|tag| (tag.key.clone(), tag.value.clone()))
        .collect()
}

/// Combine a new tag list with an existing one for an additive write.
///
/// With `overwrite` false, the result is `new` followed by `existing`, with
/// no deduplication: a key present in both lists appears twice, and the
/// service is expected to reject the write with a tag-conflict error the
/// caller handles. With `overwrite` true, `existing` is discarded entirely.
#[must_use]
pub fn merge_tags(existing: Vec<Tag>, new: Vec<Tag>, overwrite: bool) -> Vec<Tag> {
    if overwrite {
        return new;
    }
    let mut merged = new;
    merged.extend(existing);
    merged
}

/// Encode a tag mapping as a URL query string for put-object tagging.
///
/// # Examples
///
/// ```
/// use bucketeer_core::tags::{TagSet, tagging_header};
///
/// let mut tags = TagSet::new();
/// tags.insert("env".to_owned(), "prod".to_owned());
/// tags.insert("team".to_owned(), "data".to_owned());
/// assert_eq!(tagging_header(&tags), "env=prod&team=data");
/// ```
#[must_use]
pub fn tagging_header(tags: &TagSet) -> String {
    let mut encoder = form_urlencoded::Serializer::new(String::new());
    for (key, value) in tags {
        encoder.append_pair(key, value);
    }
    encoder.finish()
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

    #[test]
    fn test_should_round_trip_unique_keyed_tag_set() {
        let tags = tag_set(&[("creator", "john-doe"), ("content", "simulated-data")]);
        assert_eq!(pairs_to_tag_set(&tag_set_to_pairs(&tags)), tags);
    }

    #[test]
    fn test_should_round_trip_empty_tag_set() {
        let tags = TagSet::new();
        assert_eq!(pairs_to_tag_set(&tag_set_to_pairs(&tags)), tags);
    }

    #[test]
    fn test_should_resolve_duplicate_keys_last_write_wins() {
        let pairs = vec![
            Tag::new("env", "staging"),
            Tag::new("team", "data"),
            Tag::new("env", "prod"),
        ];
        let tags = pairs_to_tag_set(&pairs);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_should_merge_with_new_tags_first() {
        let existing = vec![Tag::new("a", "1")];
        let new = vec![Tag::new("b", "2")];
        let merged = merge_tags(existing, new, false);
        assert_eq!(merged, vec![Tag::new("b", "2"), Tag::new("a", "1")]);
    }

    #[test]
    fn test_should_keep_duplicate_keys_in_merge() {
        let existing = vec![Tag::new("a", "old")];
        let new = vec![Tag::new("a", "new")];
        let merged = merge_tags(existing, new, false);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].value, "new");
        assert_eq!(merged[1].value, "old");
    }

    #[test]
    fn test_should_discard_existing_on_overwrite() {
        let existing = vec![Tag::new("a", "1"), Tag::new("b", "2")];
        let new = vec![Tag::new("c", "3")];
        let merged = merge_tags(existing, new, true);
        assert_eq!(merged, vec![Tag::new("c", "3")]);
    }

    #[test]
    fn test_should_url_encode_tagging_header() {
        let tags = tag_set(&[("path", "a/b"), ("note", "x y")]);
        assert_eq!(tagging_header(&tags), "note=x+y&path=a%2Fb");
    }
}
