//! Immutable in-memory catalog of games.
//!
//! The catalog is loaded once and never mutated. Load order is kept and
//! used as the deterministic tie-breaker everywhere results are ranked.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{GameRecError, Result};
use crate::tags::TagFilter;

/// Catalog item identifier (the store's app id).
pub type ItemId = u64;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item id.
    pub id: ItemId,
    /// Display title.
    pub title: String,
    /// Category labels. Empty when the source had none.
    pub tags: BTreeSet<String>,
    /// Free-form description.
    pub description: String,
}

impl Item {
    /// Create an item without tags or description.
    pub fn new<S: Into<String>>(id: ItemId, title: S) -> Self {
        Self {
            id,
            title: title.into(),
            tags: BTreeSet::new(),
            description: String::new(),
        }
    }

    /// Attach tags.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }
}

/// Read-only table of items in load order.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Vec<Item>,
    positions: HashMap<ItemId, usize>,
    tag_universe: BTreeSet<String>,
}

impl CatalogStore {
    /// Build a catalog from items in load order.
    ///
    /// Fails when two items share an id.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(items.len());
        let mut tag_universe = BTreeSet::new();

        for (position, item) in items.iter().enumerate() {
            if positions.insert(item.id, position).is_some() {
                return Err(GameRecError::DuplicateItem {
                    id: item.id,
                    position,
                });
            }
            tag_universe.extend(item.tags.iter().cloned());
        }

        Ok(Self {
            items,
            positions,
            tag_universe,
        })
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Result<&Item> {
        self.positions
            .get(&id)
            .map(|&position| &self.items[position])
            .ok_or_else(|| GameRecError::not_found(format!("item {id} is not in the catalog")))
    }

    /// All items in load order.
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    /// All item ids in load order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Union of every item's tags, computed once at construction.
    pub fn tag_universe(&self) -> &BTreeSet<String> {
        &self.tag_universe
    }

    /// Load-order index of an item.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Whether the id is in the catalog.
    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for an empty catalog.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Search titles and filter by tags, preserving load order.
    ///
    /// The title query is a case-insensitive substring match; `None` or an
    /// empty query matches every title.
    pub fn browse(&self, query: Option<&str>, filter: &TagFilter) -> Vec<&Item> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.items
            .iter()
            .filter(|item| match &needle {
                Some(needle) => item.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .filter(|item| filter.matches(&item.tags))
            .collect()
    }
}
