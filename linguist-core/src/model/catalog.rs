//! In-memory catalog for one target language.
//!
//! A catalog is built once by the parser and never mutated afterwards, so
//! a shared `Arc<Catalog>` can be read from any thread without locking.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::entry::{EntryStatus, MessageKey, TranslationEntry};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    fingerprint: String,
    entries: Vec<TranslationEntry>,
    index: HashMap<MessageKey, usize>,
}

impl Catalog {
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Language declared by the document itself, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Hex SHA-256 of the document text the catalog was parsed from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn get(&self, key: &MessageKey) -> Option<&TranslationEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn lookup(
        &self,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> Option<&TranslationEntry> {
        self.get(&MessageKey::new(context, source_text, disambiguation))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter()
    }

    /// Distinct context names in document order.
    pub fn contexts(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.context.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.entries.len(),
            ..CatalogStats::default()
        };

        for e in &self.entries {
            match e.status {
                EntryStatus::Finished => stats.finished += 1,
                EntryStatus::Unfinished => stats.unfinished += 1,
                EntryStatus::Vanished => stats.vanished += 1,
                EntryStatus::Obsolete => stats.obsolete += 1,
            }
            if e.status.is_live() && e.translation.is_empty() {
                stats.empty_live += 1;
            }
        }

        let live = stats.finished + stats.unfinished;
        stats.completion = if live == 0 {
            1.0
        } else {
            stats.finished as f64 / live as f64
        };

        stats
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    /// Live entries whose translation text is empty.
    pub empty_live: usize,
    pub completion: f64,
}

/// Accumulates entries while a document is being parsed.
#[derive(Debug, Default)]
pub(crate) struct CatalogBuilder {
    catalog: Catalog,
    duplicates: usize,
}

impl CatalogBuilder {
    pub(crate) fn new(document: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(document.as_bytes());

        CatalogBuilder {
            catalog: Catalog {
                fingerprint: hex::encode(hasher.finalize()),
                ..Catalog::default()
            },
            duplicates: 0,
        }
    }

    pub(crate) fn header(
        &mut self,
        version: Option<&str>,
        language: Option<&str>,
        source_language: Option<&str>,
    ) {
        let owned = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        self.catalog.version = owned(version);
        self.catalog.language = owned(language);
        self.catalog.source_language = owned(source_language);
    }

    /// Later duplicates replace earlier ones but keep the earlier document position.
    pub(crate) fn push(&mut self, entry: TranslationEntry) {
        let key = entry.key();

        match self.catalog.index.get(&key) {
            Some(&i) => {
                tracing::warn!(key = %key, "duplicate message in catalog, keeping the later entry");
                self.catalog.entries[i] = entry;
                self.duplicates += 1;
            }
            None => {
                self.catalog.index.insert(key, self.catalog.entries.len());
                self.catalog.entries.push(entry);
            }
        }
    }

    pub(crate) fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub(crate) fn finish(self) -> Catalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(context: &str, source: &str, translation: &str, status: EntryStatus) -> TranslationEntry {
        TranslationEntry {
            context: context.into(),
            source_text: source.into(),
            translation: translation.into(),
            status,
            disambiguation: None,
            numerus_forms: Vec::new(),
            extra_comment: None,
            translator_comment: None,
            locations: Vec::new(),
        }
    }

    #[test]
    fn duplicate_keeps_last_entry_in_first_position() {
        let mut b = CatalogBuilder::new("doc");
        b.push(entry("About", "Close", "Cerrar", EntryStatus::Finished));
        b.push(entry("About", "Help", "Ayuda", EntryStatus::Finished));
        b.push(entry("About", "Close", "Salir", EntryStatus::Unfinished));
        assert_eq!(b.duplicates(), 1);

        let cat = b.finish();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.lookup("About", "Close", None).unwrap().translation, "Salir");
        let order: Vec<_> = cat.entries().map(|e| e.source_text.as_str()).collect();
        assert_eq!(order, vec!["Close", "Help"]);
    }

    #[test]
    fn stats_count_statuses() {
        let mut b = CatalogBuilder::new("doc");
        b.push(entry("A", "one", "uno", EntryStatus::Finished));
        b.push(entry("A", "two", "", EntryStatus::Unfinished));
        b.push(entry("B", "three", "tres", EntryStatus::Vanished));
        b.push(entry("B", "four", "cuatro", EntryStatus::Obsolete));
        let stats = b.finish().stats();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.finished, 1);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.vanished, 1);
        assert_eq!(stats.obsolete, 1);
        assert_eq!(stats.empty_live, 1);
        assert!((stats.completion - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_catalog_is_complete() {
        let cat = CatalogBuilder::new("").finish();
        assert!(cat.is_empty());
        assert_eq!(cat.stats().completion, 1.0);
        assert_eq!(cat.fingerprint().len(), 64);
    }

    #[test]
    fn contexts_are_distinct_in_order() {
        let mut b = CatalogBuilder::new("doc");
        b.push(entry("Main", "a", "", EntryStatus::Finished));
        b.push(entry("About", "b", "", EntryStatus::Finished));
        b.push(entry("Main", "c", "", EntryStatus::Finished));
        assert_eq!(b.finish().contexts(), vec!["Main", "About"]);
    }
}
