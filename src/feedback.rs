//! Binary user feedback.
//!
//! The ledger keeps at most one rating per `(user, item)` pair. A second
//! rating for the same pair replaces the first.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, ItemId};

/// User identifier.
pub type UserId = u64;

/// A binary judgement on one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// The user does not recommend the item.
    NotRecommended,
    /// The user recommends the item.
    Recommended,
}

impl Label {
    /// Label from an `is_recommended` flag.
    pub fn from_recommended(is_recommended: bool) -> Self {
        if is_recommended {
            Label::Recommended
        } else {
            Label::NotRecommended
        }
    }

    /// Whether the label is positive.
    pub fn is_recommended(self) -> bool {
        matches!(self, Label::Recommended)
    }

    /// 1 for recommended, 0 otherwise.
    pub fn as_u8(self) -> u8 {
        self.is_recommended() as u8
    }
}

/// One observation: `user` judged `item` with `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub label: Label,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, label: Label) -> Self {
        Self {
            user_id,
            item_id,
            label,
        }
    }
}

/// A row of a user's review listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReview {
    pub app_id: ItemId,
    /// `None` when the item is not in the catalog.
    pub title: Option<String>,
    pub is_recommended: bool,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    label: Label,
    seq: u64,
}

/// Mutable set of ratings, scoped by user.
#[derive(Debug, Clone, Default)]
pub struct FeedbackLedger {
    entries: HashMap<UserId, HashMap<ItemId, Entry>>,
    next_seq: u64,
    revision: u64,
    len: usize,
}

impl FeedbackLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from ratings. Later ratings for a pair win.
    pub fn from_ratings<I: IntoIterator<Item = Rating>>(ratings: I) -> Self {
        let mut ledger = Self::new();
        for rating in ratings {
            ledger.upsert(rating.user_id, rating.item_id, rating.label);
        }
        ledger
    }

    /// Record a rating, replacing any previous rating for the pair.
    ///
    /// Returns the replaced label.
    pub fn upsert(&mut self, user_id: UserId, item_id: ItemId, label: Label) -> Option<Label> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.revision += 1;

        let previous = self
            .entries
            .entry(user_id)
            .or_default()
            .insert(item_id, Entry { label, seq })
            .map(|entry| entry.label);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove a rating. Absent ratings are a no-op.
    pub fn remove(&mut self, user_id: UserId, item_id: ItemId) -> Option<Label> {
        let items = self.entries.get_mut(&user_id)?;
        let removed = items.remove(&item_id)?;
        if items.is_empty() {
            self.entries.remove(&user_id);
        }
        self.len -= 1;
        self.revision += 1;
        Some(removed.label)
    }

    /// Every item the user has rated, with any label.
    pub fn ratings_for(&self, user_id: UserId) -> BTreeSet<ItemId> {
        self.entries
            .get(&user_id)
            .map(|items| items.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Items the user rated with the given label.
    pub fn items_with_label(&self, user_id: UserId, label: Label) -> BTreeSet<ItemId> {
        self.entries
            .get(&user_id)
            .map(|items| {
                items
                    .iter()
                    .filter(|(_, entry)| entry.label == label)
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The user's label for an item, `None` when unrated.
    pub fn rating_of(&self, user_id: UserId, item_id: ItemId) -> Option<Label> {
        self.entries
            .get(&user_id)?
            .get(&item_id)
            .map(|entry| entry.label)
    }

    /// Whether the user has any rating.
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.entries.contains_key(&user_id)
    }

    /// Every rating, oldest write first.
    pub fn snapshot(&self) -> Vec<Rating> {
        let mut rows: Vec<(u64, Rating)> = self
            .entries
            .iter()
            .flat_map(|(&user_id, items)| {
                items.iter().map(move |(&item_id, entry)| {
                    (entry.seq, Rating::new(user_id, item_id, entry.label))
                })
            })
            .collect();
        rows.sort_unstable_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, rating)| rating).collect()
    }

    /// The user's reviews joined with catalog titles, oldest write first.
    pub fn reviews_for(&self, user_id: UserId, catalog: &CatalogStore) -> Vec<UserReview> {
        let Some(items) = self.entries.get(&user_id) else {
            return Vec::new();
        };

        let mut rows: Vec<(u64, ItemId, Label)> = items
            .iter()
            .map(|(&item_id, entry)| (entry.seq, item_id, entry.label))
            .collect();
        rows.sort_unstable_by_key(|(seq, _, _)| *seq);

        rows.into_iter()
            .map(|(_, app_id, label)| UserReview {
                app_id,
                title: catalog.get(app_id).ok().map(|item| item.title.clone()),
                is_recommended: label.is_recommended(),
            })
            .collect()
    }

    /// Counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of ratings.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the ledger has no ratings.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
