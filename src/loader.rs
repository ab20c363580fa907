//! Loading the external tables the engine starts from.
//!
//! - Catalog: JSON Lines, one object per line:
//!   ```jsonl
//!   {"app_id": 10, "title": "Counter-Strike", "tags": ["Action", "FPS"], "description": "..."}
//!   {"app_id": 20, "title": "Team Fortress Classic", "tags": null, "description": "..."}
//!   ```
//! - Similarity: CSV with header `app_id,other_app_id,similarity`.
//! - Seed feedback: CSV with header `user_id,app_id,is_recommended`, where
//!   the flag is `0`/`1` or `false`/`true`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use log::info;
use serde::{Deserialize, Deserializer};

use crate::catalog::{CatalogStore, Item, ItemId};
use crate::error::{GameRecError, Result};
use crate::feedback::{FeedbackLedger, Label, UserId};
use crate::similarity::SimilarityIndex;

/// One catalog line.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub app_id: ItemId,
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub description: String,
}

impl From<CatalogRecord> for Item {
    fn from(record: CatalogRecord) -> Self {
        Item::new(record.app_id, record.title)
            .with_tags(record.tags.unwrap_or_default())
            .with_description(record.description)
    }
}

/// One similarity row.
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityRecord {
    pub app_id: ItemId,
    pub other_app_id: ItemId,
    pub similarity: f64,
}

/// One seed feedback row.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRecord {
    pub user_id: UserId,
    pub app_id: ItemId,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_recommended: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected 0, 1, true or false, got {other:?}"
        ))),
    }
}

fn open(path: &Path, what: &str) -> Result<File> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {what} file {}", path.display()))?;
    Ok(file)
}

/// Load the catalog from a JSONL file.
pub fn load_catalog(path: &Path) -> Result<CatalogStore> {
    let file = open(path, "catalog")?;
    let catalog = read_catalog(BufReader::new(file), &path.display().to_string())?;
    info!("loaded {} catalog items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Read a JSONL catalog. `source` names the input in error messages.
///
/// Blank lines are skipped. A malformed line or a repeated `app_id` fails
/// with its line number.
pub fn read_catalog<R: BufRead>(reader: R, source: &str) -> Result<CatalogStore> {
    let mut items: Vec<Item> = Vec::new();
    let mut line_numbers: Vec<usize> = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: CatalogRecord = serde_json::from_str(line).map_err(|e| {
            GameRecError::parse(format!("{source}:{}: invalid catalog record: {e}", line_num + 1))
        })?;
        items.push(record.into());
        line_numbers.push(line_num + 1);
    }

    CatalogStore::new(items).map_err(|e| match e {
        GameRecError::DuplicateItem { id, position } => GameRecError::parse(format!(
            "{source}:{}: duplicate app_id {id}",
            line_numbers[position]
        )),
        other => other,
    })
}

/// Load a similarity table from a CSV file.
pub fn load_similarity(path: &Path, symmetric: bool) -> Result<SimilarityIndex> {
    let file = open(path, "similarity")?;
    let index = read_similarity(file, symmetric)?;
    info!(
        "loaded similarity rows for {} items from {}",
        index.len(),
        path.display()
    );
    Ok(index)
}

/// Read a similarity CSV. With `symmetric`, every entry is mirrored.
pub fn read_similarity<R: Read>(reader: R, symmetric: bool) -> Result<SimilarityIndex> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut index = SimilarityIndex::new();

    for record in csv_reader.deserialize() {
        let record: SimilarityRecord = record?;
        if symmetric {
            index.insert_symmetric(record.app_id, record.other_app_id, record.similarity)?;
        } else {
            index.insert(record.app_id, record.other_app_id, record.similarity)?;
        }
    }

    Ok(index)
}

/// Load seed feedback from a CSV file.
pub fn load_feedback(path: &Path) -> Result<FeedbackLedger> {
    let file = open(path, "feedback")?;
    let ledger = read_feedback(file)?;
    info!("loaded {} ratings from {}", ledger.len(), path.display());
    Ok(ledger)
}

/// Read a feedback CSV. Later rows for the same pair replace earlier ones.
pub fn read_feedback<R: Read>(reader: R) -> Result<FeedbackLedger> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut ledger = FeedbackLedger::new();

    for record in csv_reader.deserialize() {
        let record: FeedbackRecord = record?;
        ledger.upsert(
            record.user_id,
            record.app_id,
            Label::from_recommended(record.is_recommended),
        );
    }

    Ok(ledger)
}
