use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SourceConfig;
use crate::data::aggregate::Summary;
use crate::data::cache::TableCache;
use crate::data::filter::{apply, DateRange, FilterSpec};
use crate::data::loader::LoadError;
use crate::data::model::{Dimension, SalesRecord, Table};
use crate::pages::PageSpec;

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

/// Everything one dashboard page needs, independent of rendering.
pub struct PageState<R> {
    pub spec: &'static PageSpec,

    /// Where the page reads its data from.
    pub source: SourceConfig,

    cache: TableCache<R>,

    /// Loaded table (None until a load succeeds).
    pub table: Option<Arc<Table<R>>>,

    /// Current sidebar selections.
    pub filters: FilterSpec,

    /// Rows passing the current filters.
    pub visible_rows: usize,

    /// KPIs and chart data for the current view.
    pub summary: Summary,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl<R: SalesRecord> PageState<R> {
    pub fn new(spec: &'static PageSpec, source: SourceConfig) -> Self {
        Self {
            spec,
            source,
            cache: TableCache::new(),
            table: None,
            filters: FilterSpec::default(),
            visible_rows: 0,
            summary: Summary::NoData,
            status_message: None,
        }
    }

    /// Load the configured source through the cache. A failure is kept as the
    /// page's status message and is not retried.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let path = self.source.path.clone();
        self.load_from(&path)
    }

    /// Switch the page to another file (same sheet layout). The page keeps
    /// its current source and table when the new file fails to load.
    pub fn open(&mut self, path: PathBuf) -> Result<(), LoadError> {
        self.load_from(&path)?;
        self.source.path = path;
        Ok(())
    }

    fn load_from(&mut self, path: &Path) -> Result<(), LoadError> {
        match self.cache.get_or_load(path, &self.source.layout) {
            Ok(table) => {
                self.set_table(table);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {} data from {}: {e}", R::DATASET, path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a loaded table and reset the filters to the page defaults.
    pub fn set_table(&mut self, table: Arc<Table<R>>) {
        if table.is_empty() {
            log::warn!("{} source has no usable rows", R::DATASET);
        }
        self.filters = self.spec.default_filters(&table);
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view and its summary after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            self.visible_rows = 0;
            self.summary = Summary::NoData;
            return;
        };
        let view = apply(table, &self.filters);
        self.visible_rows = view.len();
        self.summary = Summary::compute(&view, self.spec.charts);
        log::debug!(
            "{}: {} of {} rows visible",
            R::DATASET,
            self.visible_rows,
            table.len()
        );
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_value(&mut self, dim: Dimension, value: &str) {
        if let Some(table) = &self.table {
            self.filters.toggle(table, dim, value);
            self.refilter();
        }
    }

    /// Select every value of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(all_vals) = self.table.as_ref().and_then(|t| t.domain(dim)) {
            self.filters.set_selection(dim, all_vals.clone());
            self.refilter();
        }
    }

    /// Deselect every value of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.filters.set_selection(dim, BTreeSet::new());
        self.refilter();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.filters.set_date_range(Some(range));
        self.refilter();
    }
}
