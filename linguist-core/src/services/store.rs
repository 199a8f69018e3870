//! Loaded catalogs, one per language id.
//!
//! Writers (`load*`, `unload`) hold the write lock only to swap a single
//! map slot; parsing happens before the lock is taken. Readers clone an
//! `Arc<Catalog>` snapshot and resolve without holding any lock, so a
//! language switch never blocks on in-flight lookups.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::error::{CatalogError, StoreError};
use crate::model::catalog::Catalog;
use crate::parsers;
use crate::services::encoding;
use crate::services::resolver::Resolver;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoadOutcome {
    pub language_id: String,
    pub entries: usize,
    pub fingerprint: String,
    /// A catalog was already loaded under this id.
    pub replaced: bool,
    /// The replaced catalog came from identical content.
    pub unchanged: bool,
}

#[derive(Debug, Default)]
pub struct CatalogStore {
    catalogs: RwLock<HashMap<String, Arc<Catalog>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `document` and installs it under `language_id`, replacing any
    /// previous catalog. On error nothing is changed.
    pub fn load(&self, language_id: &str, document: &str) -> Result<LoadOutcome, CatalogError> {
        let catalog = parsers::ts::parse(document)?;
        Ok(self.install(language_id, catalog))
    }

    pub fn load_bytes(&self, language_id: &str, bytes: &[u8]) -> Result<LoadOutcome, CatalogError> {
        let text = encoding::decode(bytes)?;
        self.load(language_id, &text)
    }

    pub fn load_file(&self, language_id: &str, path: &Path) -> Result<LoadOutcome, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_bytes(language_id, &bytes)
    }

    /// Loads every `*.ts` file in `dir`. The language id is the document's
    /// `language` attribute, or the file stem after its last `_`.
    pub fn load_dir(
        &self,
        dir: &Path,
    ) -> Result<Vec<(PathBuf, Result<LoadOutcome, CatalogError>)>, CatalogError> {
        let read = fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = read
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("ts"))
            .collect();
        paths.sort();

        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let result = self.load_discovered(&path);
            if let Err(e) = &result {
                tracing::warn!(path = %path.display(), error = %e, "skipping catalog");
            }
            results.push((path, result));
        }

        Ok(results)
    }

    fn load_discovered(&self, path: &Path) -> Result<LoadOutcome, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = encoding::decode(&bytes)?;
        let catalog = parsers::ts::parse(&text)?;

        let language_id = match catalog.language() {
            Some(lang) => lang.to_string(),
            None => language_from_file_name(path).ok_or_else(|| {
                CatalogError::schema(
                    path.display().to_string(),
                    "no language attribute and no _<lang> suffix in the file name",
                )
            })?,
        };

        Ok(self.install(&language_id, catalog))
    }

    fn install(&self, language_id: &str, catalog: Catalog) -> LoadOutcome {
        if let Some(declared) = catalog.language() {
            if declared != language_id {
                tracing::warn!(
                    language = language_id,
                    declared,
                    "catalog declares a different language than it is loaded under"
                );
            }
        }

        let entries = catalog.len();
        let fingerprint = catalog.fingerprint().to_string();

        let previous = self
            .write()
            .insert(language_id.to_string(), Arc::new(catalog));

        let replaced = previous.is_some();
        let unchanged = previous.is_some_and(|p| p.fingerprint() == fingerprint);

        tracing::info!(language = language_id, entries, replaced, unchanged, "catalog loaded");

        LoadOutcome {
            language_id: language_id.to_string(),
            entries,
            fingerprint,
            replaced,
            unchanged,
        }
    }

    pub fn get_catalog(&self, language_id: &str) -> Option<Arc<Catalog>> {
        self.read().get(language_id).cloned()
    }

    /// Returns whether a catalog was actually removed.
    pub fn unload(&self, language_id: &str) -> bool {
        let removed = self.write().remove(language_id).is_some();
        if removed {
            tracing::info!(language = language_id, "catalog unloaded");
        }
        removed
    }

    pub fn list_loaded_languages(&self) -> BTreeSet<String> {
        self.read().keys().cloned().collect()
    }

    pub fn is_loaded(&self, language_id: &str) -> bool {
        self.read().contains_key(language_id)
    }

    pub fn resolve(
        &self,
        resolver: &Resolver,
        language_id: &str,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> Result<String, StoreError> {
        let catalog = self.snapshot(language_id)?;
        Ok(resolver.resolve(&catalog, context, source_text, disambiguation))
    }

    pub fn resolve_plural(
        &self,
        resolver: &Resolver,
        language_id: &str,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
        n: u64,
    ) -> Result<String, StoreError> {
        let catalog = self.snapshot(language_id)?;
        Ok(resolver.resolve_plural(&catalog, language_id, context, source_text, disambiguation, n))
    }

    pub fn snapshot(&self, language_id: &str) -> Result<Arc<Catalog>, StoreError> {
        self.get_catalog(language_id)
            .ok_or_else(|| StoreError::LanguageNotLoaded(language_id.to_string()))
    }

    // Every mutation is a single insert or remove, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Catalog>>> {
        self.catalogs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Catalog>>> {
        self.catalogs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `cppcheck_es.ts` → `es`; an uppercase region keeps its language: `cppcheck_pt_BR.ts` → `pt_BR`.
pub fn language_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let parts: Vec<&str> = stem.split('_').collect();

    match parts.as_slice() {
        [.., lang, region]
            if parts.len() >= 3
                && is_language(lang)
                && region.len() == 2
                && region.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            Some(format!("{lang}_{region}"))
        }
        [_, .., lang] if is_language(lang) => Some(lang.to_string()),
        _ => None,
    }
}

fn is_language(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_lowercase())
}
