use std::collections::BTreeMap;
use std::fmt;

use super::filter::FilteredView;
use super::model::{Dimension, Measure, SalesRecord};

/// Highest star count shown next to the average rating.
pub const MAX_STARS: u8 = 5;

// ---------------------------------------------------------------------------
// Scalar aggregates
// ---------------------------------------------------------------------------

pub fn sum<R: SalesRecord>(view: &FilteredView<'_, R>, measure: Measure) -> f64 {
    view.rows().map(|r| r.measure(measure)).sum()
}

/// Sum of `Total`; 0 for an empty view.
pub fn total_sales<R: SalesRecord>(view: &FilteredView<'_, R>) -> f64 {
    sum(view, Measure::Total)
}

/// Arithmetic mean, `None` for an empty view.
pub fn mean<R: SalesRecord>(view: &FilteredView<'_, R>, measure: Measure) -> Option<f64> {
    if view.is_empty() {
        return None;
    }
    Some(sum(view, measure) / view.len() as f64)
}

/// Mean rating rounded to one decimal.
pub fn average_rating<R: SalesRecord>(view: &FilteredView<'_, R>) -> Option<f64> {
    mean(view, Measure::Rating).map(|m| round_to(m, 1))
}

/// Mean transaction total rounded to cents.
pub fn average_sale_per_transaction<R: SalesRecord>(view: &FilteredView<'_, R>) -> Option<f64> {
    mean(view, Measure::Total).map(|m| round_to(m, 2))
}

/// Round half to even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Number of stars for an average rating, `0..=MAX_STARS`.
pub fn star_rating(average_rating: f64) -> u8 {
    if average_rating.is_nan() {
        return 0;
    }
    average_rating.round_ties_even().clamp(0.0, MAX_STARS as f64) as u8
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest sum first (horizontal bars).
    Ascending,
    /// Largest sum first (ranked share charts).
    Descending,
    /// Group key order (hour of day).
    Key,
}

/// Sum `measure` per group. Rows for which `key` yields `None` are skipped.
/// Groups with equal sums keep key order.
pub fn grouped_sum_by<R, K, F>(
    view: &FilteredView<'_, R>,
    key: F,
    measure: Measure,
    order: SortOrder,
) -> Vec<(K, f64)>
where
    R: SalesRecord,
    K: Ord,
    F: Fn(&R) -> Option<K>,
{
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for row in view.rows() {
        if let Some(k) = key(row) {
            *groups.entry(k).or_insert(0.0) += row.measure(measure);
        }
    }

    let mut out: Vec<(K, f64)> = groups.into_iter().collect();
    match order {
        SortOrder::Ascending => out.sort_by(|a, b| a.1.total_cmp(&b.1)),
        SortOrder::Descending => out.sort_by(|a, b| b.1.total_cmp(&a.1)),
        SortOrder::Key => {}
    }
    out
}

pub fn grouped_sum<R: SalesRecord>(
    view: &FilteredView<'_, R>,
    dim: Dimension,
    measure: Measure,
    order: SortOrder,
) -> Vec<(String, f64)> {
    grouped_sum_by(view, |r| r.dimension(dim).map(str::to_string), measure, order)
}

/// Per-hour sums in hour order.
pub fn hourly_sum<R: SalesRecord>(view: &FilteredView<'_, R>, measure: Measure) -> Vec<(u32, f64)> {
    grouped_sum_by(view, |r| Some(r.hour()), measure, SortOrder::Key)
}

// ---------------------------------------------------------------------------
// Chart-ready report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Dimension(Dimension),
    Hour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    HorizontalBar,
    VerticalBar,
    Donut,
    Pie,
}

/// One chart on a dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub group: GroupBy,
    pub measure: Measure,
    pub kind: ChartKind,
    pub order: SortOrder,
}

/// Label of one group in a chart series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupKey {
    Hour(u32),
    Value(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Hour(h) => write!(f, "{h}"),
            GroupKey::Value(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub spec: ChartSpec,
    pub points: Vec<(GroupKey, f64)>,
}

impl ChartSeries {
    pub fn compute<R: SalesRecord>(view: &FilteredView<'_, R>, spec: ChartSpec) -> Self {
        let points = match spec.group {
            GroupBy::Hour if spec.order == SortOrder::Key => hourly_sum(view, spec.measure)
                .into_iter()
                .map(|(h, v)| (GroupKey::Hour(h), v))
                .collect(),
            GroupBy::Hour => grouped_sum_by(view, |r| Some(r.hour()), spec.measure, spec.order)
                .into_iter()
                .map(|(h, v)| (GroupKey::Hour(h), v))
                .collect(),
            GroupBy::Dimension(dim) => grouped_sum(view, dim, spec.measure, spec.order)
                .into_iter()
                .map(|(k, v)| (GroupKey::Value(k), v))
                .collect(),
        };
        ChartSeries { spec, points }
    }
}

/// Headline KPIs of a non-empty view.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_sales: f64,
    pub average_rating: f64,
    pub star_rating: u8,
    pub average_sale: f64,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub kpis: Kpis,
    pub charts: Vec<ChartSeries>,
}

/// Outcome of aggregating a view: an empty selection is its own state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Summary {
    #[default]
    NoData,
    Ready(Report),
}

impl Summary {
    pub fn compute<R: SalesRecord>(view: &FilteredView<'_, R>, charts: &[ChartSpec]) -> Self {
        let (Some(average_rating), Some(average_sale)) =
            (average_rating(view), average_sale_per_transaction(view))
        else {
            return Summary::NoData;
        };

        let kpis = Kpis {
            total_sales: total_sales(view),
            average_rating,
            star_rating: star_rating(average_rating),
            average_sale,
            transactions: view.len(),
        };
        let charts = charts
            .iter()
            .map(|&spec| ChartSeries::compute(view, spec))
            .collect();
        Summary::Ready(Report { kpis, charts })
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Summary::Ready(report) => Some(report),
            Summary::NoData => None,
        }
    }
}
