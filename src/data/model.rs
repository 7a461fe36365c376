use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell read from a source file
// ---------------------------------------------------------------------------

/// Text markers that read as a missing value.
pub const NA_MARKERS: &[&str] = &["NA", "N/A"];

/// A dynamically-typed cell as it comes out of a CSV, spreadsheet or Parquet
/// source, before it is bound to a typed row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(dt) => write!(f, "{dt}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Interpret the cell as a finite number. Numeric text is accepted since
    /// spreadsheets often store measures as strings.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Interpret the cell as a categorical label. `None` for nulls and blank text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty() && !NA_MARKERS.contains(&trimmed)).then(|| trimmed.to_string())
            }
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Wrap a text field as a cell, keeping its text. Empty fields and
/// [`NA_MARKERS`] become [`CellValue::Null`]. Numbers stay text until a
/// measure column asks for them through [`CellValue::as_f64`], so labels such
/// as `"007"` survive unchanged.
pub fn text_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || NA_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// RawTable – header + cells, before schema binding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Position of the column whose trimmed header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

// ---------------------------------------------------------------------------
// Dimensions and measures
// ---------------------------------------------------------------------------

/// A categorical column the dashboard can filter or group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    State,
    ShipMode,
    Segment,
    Category,
    Region,
    City,
    CustomerType,
    Gender,
    ProductLine,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::State => "State",
            Dimension::ShipMode => "Ship Mode",
            Dimension::Segment => "Segment",
            Dimension::Category => "Category",
            Dimension::Region => "Region",
            Dimension::City => "City",
            Dimension::CustomerType => "Customer Type",
            Dimension::Gender => "Gender",
            Dimension::ProductLine => "Product Line",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A numeric column that can be summed or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Total,
    Quantity,
    Rating,
}

// ---------------------------------------------------------------------------
// SalesRecord – one typed transaction row
// ---------------------------------------------------------------------------

/// A typed transaction row of one dataset.
///
/// Implementors declare the source columns they need in `COLUMNS`; the loader
/// resolves those once per file and hands each row's cells to [`from_cells`]
/// in the same order.
///
/// [`from_cells`]: SalesRecord::from_cells
pub trait SalesRecord: Sized {
    /// Dataset name used in logs and errors.
    const DATASET: &'static str;
    /// Required source column names, in the order `from_cells` expects.
    const COLUMNS: &'static [&'static str];
    /// Categorical dimensions carried by this row type.
    const DIMENSIONS: &'static [Dimension];

    /// Build a row from its required cells. `None` drops the row
    /// (null key field, unparseable number or malformed timestamp).
    fn from_cells(cells: &[&CellValue]) -> Option<Self>;

    fn dimension(&self, dim: Dimension) -> Option<&str>;
    fn measure(&self, measure: Measure) -> f64;
    /// Hour of day of the transaction, 0–23.
    fn hour(&self) -> u32;
    /// Calendar date of the transaction, when the dataset records one.
    fn date(&self) -> Option<NaiveDate>;
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable, loaded dataset with pre-computed dimension domains.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: Vec<R>,
    domains: BTreeMap<Dimension, BTreeSet<String>>,
    date_bounds: Option<(NaiveDate, NaiveDate)>,
    dropped_rows: usize,
}

impl<R: SalesRecord> Table<R> {
    /// Build domain indices from the typed rows.
    pub fn from_rows(rows: Vec<R>, dropped_rows: usize) -> Self {
        let mut domains: BTreeMap<Dimension, BTreeSet<String>> = R::DIMENSIONS
            .iter()
            .map(|&dim| (dim, BTreeSet::new()))
            .collect();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for row in &rows {
            for (&dim, values) in domains.iter_mut() {
                if let Some(value) = row.dimension(dim) {
                    if !values.contains(value) {
                        values.insert(value.to_string());
                    }
                }
            }
            if let Some(date) = row.date() {
                date_bounds = Some(match date_bounds {
                    Some((lo, hi)) => (lo.min(date), hi.max(date)),
                    None => (date, date),
                });
            }
        }

        Table {
            rows,
            domains,
            date_bounds,
            dropped_rows,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted unique values of `dim`; `None` if this dataset lacks the dimension.
    pub fn domain(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        self.domains.get(&dim)
    }

    /// Earliest and latest row date, if the dataset records dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds
    }

    /// Rows discarded at load time because of null or malformed fields.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}
