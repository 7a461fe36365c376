use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{load_table, LoadError, SheetLayout};
use super::model::{SalesRecord, Table};

/// Identity of a loaded source: the file plus how it was sliced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub layout: SheetLayout,
}

impl SourceKey {
    /// Key on the canonical path so `./a.csv` and `a.csv` share an entry.
    pub fn new(path: &Path, layout: &SheetLayout) -> Self {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        SourceKey {
            path,
            layout: layout.clone(),
        }
    }
}

/// Process-lifetime memo of loaded tables.
///
/// Entries are never invalidated: source files are treated as static for the
/// run. Failed loads are not cached.
pub struct TableCache<R> {
    entries: HashMap<SourceKey, Arc<Table<R>>>,
}

impl<R> Default for TableCache<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<R: SalesRecord> TableCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, reading it on first use only.
    pub fn get_or_load(&mut self, path: &Path, layout: &SheetLayout) -> Result<Arc<Table<R>>, LoadError> {
        let key = SourceKey::new(path, layout);
        self.get_or_try_insert_with(key, || load_table::<R>(path, layout))
    }

    pub fn get_or_try_insert_with<F>(&mut self, key: SourceKey, load: F) -> Result<Arc<Table<R>>, LoadError>
    where
        F: FnOnce() -> Result<Table<R>, LoadError>,
    {
        if let Some(table) = self.entries.get(&key) {
            log::debug!("Table cache hit for {}", key.path.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load()?);
        self.entries.insert(key, Arc::clone(&table));
        log::debug!("Table cache now holds {} source(s)", self.entries.len());
        Ok(table)
    }
}
