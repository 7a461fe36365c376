use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::model::{Dimension, SalesRecord, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per dimension
// ---------------------------------------------------------------------------

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        DateRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Per-dimension accepted values plus an optional date range.
///
/// A dimension absent from the map is unconstrained. A dimension present with
/// an empty set accepts nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    selections: BTreeMap<Dimension, BTreeSet<String>>,
    date_range: Option<DateRange>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        self.selections.get(&dim)
    }

    pub fn set_selection(&mut self, dim: Dimension, values: BTreeSet<String>) {
        self.selections.insert(dim, values);
    }

    /// Flip a single value in a dimension's accepted set. An unconstrained
    /// dimension starts from its whole domain in `table`, so toggling a value
    /// there deselects it.
    pub fn toggle<R: SalesRecord>(&mut self, table: &Table<R>, dim: Dimension, value: &str) {
        let selected = self
            .selections
            .entry(dim)
            .or_insert_with(|| table.domain(dim).cloned().unwrap_or_default());
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
    }

    fn date_ok<R: SalesRecord>(&self, row: &R) -> bool {
        match self.date_range {
            Some(range) => row.date().is_some_and(|d| range.contains(d)),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// Rows of a [`Table`] that pass a [`FilterSpec`], in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a, R> {
    table: &'a Table<R>,
    indices: Vec<usize>,
}

impl<'a, R: SalesRecord> FilteredView<'a, R> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a R> + '_ {
        let rows = self.table.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }
}

/// Narrow `table` to the rows matching every clause of `spec`.
///
/// A row passes a dimension clause when:
/// * The accepted set is empty → nothing selected → fails
/// * The accepted set covers the whole domain → passes (no effective filter)
/// * The row's value is in the accepted set → passes
pub fn apply<'a, R: SalesRecord>(table: &'a Table<R>, spec: &FilterSpec) -> FilteredView<'a, R> {
    if spec.selections.values().any(BTreeSet::is_empty) {
        return FilteredView {
            table,
            indices: Vec::new(),
        };
    }

    // Clauses that select the entire domain cannot reject a row.
    let active: Vec<(Dimension, &BTreeSet<String>)> = spec
        .selections
        .iter()
        .filter(|(dim, selected)| {
            table
                .domain(**dim)
                .map_or(true, |all_vals| !all_vals.is_subset(selected))
        })
        .map(|(&dim, selected)| (dim, selected))
        .collect();

    let indices = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|(dim, selected)| {
                row.dimension(*dim)
                    .is_some_and(|value| selected.contains(value))
            }) && spec.date_ok(*row)
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView { table, indices }
}

#[cfg(test)]
impl FilterSpec {
    /// Every value of every dimension selected, no date restriction.
    pub fn select_all<R: SalesRecord>(table: &Table<R>) -> Self {
        let selections = R::DIMENSIONS
            .iter()
            .filter_map(|&dim| table.domain(dim).map(|values| (dim, values.clone())))
            .collect();
        FilterSpec {
            selections,
            date_range: None,
        }
    }

    pub fn with_selection<I, S>(mut self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_selection(dim, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Row-at-a-time reference for `apply`.
    pub fn matches<R: SalesRecord>(&self, row: &R) -> bool {
        let dims_ok = self.selections.iter().all(|(&dim, selected)| {
            row.dimension(dim)
                .is_some_and(|value| selected.contains(value))
        });
        dims_ok && self.date_ok(row)
    }
}

#[cfg(test)]
impl<'a, R: SalesRecord> FilteredView<'a, R> {
    /// View over the whole table.
    pub fn all(table: &'a Table<R>) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}
