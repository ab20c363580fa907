//! Typed tag filtering.
//!
//! Tags are compared as whole strings. A filter for `"RPG"` never matches an
//! item tagged `"Action RPG"`.

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a set of selected tags is matched against an item's tags.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// The item must carry at least one selected tag.
    #[default]
    Any,
    /// The item must carry every selected tag.
    All,
}

/// A set of required tags plus the rule used to match them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    /// Selected tags.
    pub tags: BTreeSet<String>,
    /// Matching rule.
    pub mode: TagMatch,
}

impl TagFilter {
    /// Create a filter that matches every item.
    pub fn none() -> Self {
        Self::default()
    }

    /// Create a filter from selected tags and a matching rule.
    pub fn new<I, S>(tags: I, mode: TagMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// Filter requiring at least one of `tags`.
    pub fn any<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tags, TagMatch::Any)
    }

    /// Filter requiring all of `tags`.
    pub fn all<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tags, TagMatch::All)
    }

    /// Same tags, different matching rule.
    pub fn with_mode(mut self, mode: TagMatch) -> Self {
        self.mode = mode;
        self
    }

    /// True when no tags are selected.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Check an item's tag set against this filter.
    ///
    /// An empty filter matches everything, including untagged items.
    pub fn matches(&self, item_tags: &BTreeSet<String>) -> bool {
        if self.tags.is_empty() {
            return true;
        }

        match self.mode {
            TagMatch::Any => self.tags.iter().any(|tag| item_tags.contains(tag)),
            TagMatch::All => self.tags.is_subset(item_tags),
        }
    }
}
