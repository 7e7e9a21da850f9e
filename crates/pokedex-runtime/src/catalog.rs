//! Card catalog
//!
//! Static mapping from the classifier's class label to the card metadata shown
//! on the detail page. Built once from a JSON snapshot and never mutated.
//!
//! Snapshot layout:
//! ```json
//! {
//!   "025_pikachu": { "name": "Pikachu", "sname": "pikachu", "hp": 60 },
//!   "004_charmander": { "name": "Charmander", "sname": "charmander" }
//! }
//! ```

use crate::error::CatalogError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Metadata for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Class label this record is keyed by (filled in from the snapshot key)
    #[serde(skip)]
    pub label: String,

    /// Display name
    pub name: String,

    /// Short identifier used in `/card/{sname}` URLs
    pub sname: String,

    /// Every other snapshot field, in file order
    #[serde(flatten)]
    pub fields: IndexMap<String, serde_json::Value>,
}

/// Label -> card lookup table
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<String, CardRecord>,
    /// sname -> label, first record wins on duplicates
    slugs: HashMap<String, String>,
}

impl CardCatalog {
    /// Load the snapshot file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(path.to_path_buf(), e))?;
        Self::from_json(&content)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let raw: IndexMap<String, CardRecord> = serde_json::from_str(content)?;
        Ok(Self::from_records(raw.into_iter().map(|(label, mut card)| {
            card.label = label;
            card
        })))
    }

    pub fn from_records(records: impl IntoIterator<Item = CardRecord>) -> Self {
        let mut catalog = Self::default();
        for card in records {
            catalog
                .slugs
                .entry(card.sname.clone())
                .or_insert_with(|| card.label.clone());
            catalog.cards.insert(card.label.clone(), card);
        }
        catalog
    }

    /// Look up a card by class label. Unknown labels are `None`, never an error.
    pub fn get(&self, label: &str) -> Option<&CardRecord> {
        self.cards.get(label)
    }

    /// Resolve a `/card/{slug}` path segment: the slug is tried as a label
    /// first, then matched against `sname`.
    pub fn by_slug(&self, slug: &str) -> Option<&CardRecord> {
        self.get(slug)
            .or_else(|| self.slugs.get(slug).and_then(|label| self.cards.get(label)))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
