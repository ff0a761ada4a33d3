//! Tag universe: every distinct tag across all questions.
//!
//! Built from the unfiltered tag column, never from the current page. The
//! universe behaves as a read-through cache whose invalidation is chosen by
//! [`TagRefreshPolicy`].

use crate::model::StoreError;
use crate::store::RecordStore;
use std::collections::HashSet;

/// When the tag universe is recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagRefreshPolicy {
    /// Only when the list view mounts. Tags added by later edits appear on
    /// the next visit to the list.
    #[default]
    MountOnly,
    /// Also after every successful mutation.
    AfterMutation,
}

impl TagRefreshPolicy {
    /// Parse the config spelling (`"mount"` / `"mutation"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mount" | "mount-only" => Some(Self::MountOnly),
            "mutation" | "after-mutation" => Some(Self::AfterMutation),
            _ => None,
        }
    }
}

/// Distinct tags in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUniverse {
    tags: Vec<String>,
}

impl TagUniverse {
    /// Flatten and de-duplicate tag sets. Missing sets count as empty.
    pub fn from_tag_sets<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = Option<Vec<String>>>,
    {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for tag in sets.into_iter().flatten().flatten() {
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
        Self { tags }
    }

    /// Read every question's tags from the store.
    pub fn load(store: &dyn RecordStore) -> Result<Self, StoreError> {
        Ok(Self::from_tag_sets(store.select_tag_sets()?))
    }

    /// All tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Membership test.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// No tags at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewQuestion;
    use crate::store::MemoryStore;

    fn set(tags: &[&str]) -> Option<Vec<String>> {
        Some(tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn deduplicates_across_questions() {
        let universe = TagUniverse::from_tag_sets(vec![
            set(&["보안", "SOC 2"]),
            set(&["보안", "클라우드"]),
        ]);
        assert_eq!(universe.tags(), &["보안", "SOC 2", "클라우드"]);
    }

    #[test]
    fn missing_tag_sets_are_skipped() {
        let universe = TagUniverse::from_tag_sets(vec![None, set(&["a"]), None]);
        assert_eq!(universe.len(), 1);
        assert!(universe.contains("a"));
    }

    #[test]
    fn empty_store_has_empty_universe() {
        let store = MemoryStore::new();
        assert!(TagUniverse::load(&store).unwrap().is_empty());
    }

    #[test]
    fn load_reads_unfiltered_tags() {
        let store = MemoryStore::new();
        for (title, tags) in [("one", vec!["x"]), ("two", vec!["y", "x"])] {
            let q = NewQuestion::new(
                title,
                "c",
                "a",
                tags.into_iter().map(String::from).collect(),
            )
            .unwrap();
            store.insert_question(q).unwrap();
        }
        let universe = TagUniverse::load(&store).unwrap();
        assert_eq!(universe.len(), 2);
        assert!(universe.contains("x") && universe.contains("y"));
    }

    #[test]
    fn policy_parses_config_spellings() {
        assert_eq!(TagRefreshPolicy::parse("mount"), Some(TagRefreshPolicy::MountOnly));
        assert_eq!(
            TagRefreshPolicy::parse("Mutation"),
            Some(TagRefreshPolicy::AfterMutation)
        );
        assert_eq!(TagRefreshPolicy::parse("never"), None);
        assert_eq!(TagRefreshPolicy::default(), TagRefreshPolicy::MountOnly);
    }
}
