//! Item-to-item similarity index.
//!
//! Rows are keyed by source item and map each other item to its score, so
//! inserting or replacing a score is constant time. The index is read-only
//! once built and can be shared across sessions.

use std::cmp::Ordering;

use ahash::AHashMap;

use crate::catalog::{CatalogStore, Item, ItemId};
use crate::error::{GameRecError, Result};

/// Precomputed similarity rows over the catalog.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    rows: AHashMap<ItemId, AHashMap<ItemId, f64>>,
}

impl SimilarityIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score of `other` in the row of `item`, replacing any previous one.
    pub fn insert(&mut self, item: ItemId, other: ItemId, score: f64) -> Result<()> {
        if !score.is_finite() {
            return Err(GameRecError::invalid_argument(format!(
                "similarity between {item} and {other} is not finite"
            )));
        }

        self.rows.entry(item).or_default().insert(other, score);
        Ok(())
    }

    /// Insert a score in both directions.
    pub fn insert_symmetric(&mut self, a: ItemId, b: ItemId, score: f64) -> Result<()> {
        self.insert(a, b, score)?;
        if a != b {
            self.insert(b, a, score)?;
        }
        Ok(())
    }

    /// Build an index from a dense square matrix whose rows and columns follow `ids`.
    pub fn from_dense(ids: &[ItemId], matrix: &[Vec<f64>]) -> Result<Self> {
        if matrix.len() != ids.len() || matrix.iter().any(|row| row.len() != ids.len()) {
            return Err(GameRecError::invalid_argument(format!(
                "similarity matrix must be {0}x{0}",
                ids.len()
            )));
        }

        let mut index = Self::new();
        for (row_id, row) in ids.iter().zip(matrix) {
            let entries = index.rows.entry(*row_id).or_default();
            entries.reserve(row.len());
            for (col_id, &score) in ids.iter().zip(row) {
                if !score.is_finite() {
                    return Err(GameRecError::invalid_argument(format!(
                        "similarity between {row_id} and {col_id} is not finite"
                    )));
                }
                entries.insert(*col_id, score);
            }
        }
        Ok(index)
    }

    /// Build rows from the cosine similarity of binary tag vectors.
    ///
    /// Pairs scoring below `min_score` and items without tags are left out.
    pub fn from_tag_cosine(catalog: &CatalogStore, min_score: f64) -> Self {
        let mut index = Self::new();
        let items = catalog.all();

        for (i, a) in items.iter().enumerate() {
            if a.tags.is_empty() {
                continue;
            }
            for b in &items[i + 1..] {
                if b.tags.is_empty() {
                    continue;
                }
                let shared = a.tags.intersection(&b.tags).count() as f64;
                let score = shared / ((a.tags.len() as f64).sqrt() * (b.tags.len() as f64).sqrt());
                if score > 0.0 && score >= min_score {
                    index.rows.entry(a.id).or_default().insert(b.id, score);
                    index.rows.entry(b.id).or_default().insert(a.id, score);
                }
            }
        }

        index
    }

    /// Whether the item has a similarity row.
    pub fn contains(&self, item: ItemId) -> bool {
        self.rows.contains_key(&item)
    }

    /// Raw row for an item, in no particular order.
    pub fn row(&self, item: ItemId) -> Option<&AHashMap<ItemId, f64>> {
        self.rows.get(&item)
    }

    /// Score of `other` in the row of `item`.
    pub fn score(&self, item: ItemId, other: ItemId) -> Option<f64> {
        self.rows.get(&item)?.get(&other).copied()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Nearest neighbours of an item, best first.
    ///
    /// The item itself is never returned. Neighbours missing from the catalog
    /// are skipped. Ties keep catalog load order. An item without a row, or
    /// `top_n == 0`, yields an empty result.
    pub fn neighbors<'a>(
        &self,
        catalog: &'a CatalogStore,
        item: ItemId,
        top_n: usize,
    ) -> Vec<(&'a Item, f64)> {
        if top_n == 0 {
            return Vec::new();
        }
        let Some(row) = self.rows.get(&item) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, &'a Item, f64)> = row
            .iter()
            .filter(|&(&other, _)| other != item)
            .filter_map(|(&other, &score)| {
                let position = catalog.position(other)?;
                Some((position, &catalog.all()[position], score))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(top_n);

        ranked
            .into_iter()
            .map(|(_, item, score)| (item, score))
            .collect()
    }
}
