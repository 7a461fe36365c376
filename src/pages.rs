use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::aggregate::{ChartKind, ChartSpec, GroupBy, SortOrder};
use crate::data::filter::{DateRange, FilterSpec};
use crate::data::model::{Dimension, Measure, SalesRecord, Table};

/// The dashboard pages, one per dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Superstore,
    Supermarket,
}

/// Initial selection of a sidebar multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSelection {
    All,
    /// Only the first value of the sorted domain.
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterControl {
    pub dimension: Dimension,
    pub prompt: &'static str,
    pub default: DefaultSelection,
}

/// Static description of a page: its filters and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub title: &'static str,
    pub filters: &'static [FilterControl],
    pub date_range: bool,
    pub charts: &'static [ChartSpec],
}

const SALES_BY_HOUR: ChartSpec = ChartSpec {
    title: "Sales by Hour",
    group: GroupBy::Hour,
    measure: Measure::Total,
    kind: ChartKind::VerticalBar,
    order: SortOrder::Key,
};

pub static SUPERSTORE: PageSpec = PageSpec {
    title: "Sales Dashboard Page 1",
    filters: &[
        FilterControl {
            dimension: Dimension::State,
            prompt: "Select the State:",
            default: DefaultSelection::First,
        },
        FilterControl {
            dimension: Dimension::ShipMode,
            prompt: "Select the Ship Mode Type:",
            default: DefaultSelection::All,
        },
        FilterControl {
            dimension: Dimension::Segment,
            prompt: "Select the Segment Type:",
            default: DefaultSelection::All,
        },
    ],
    date_range: false,
    charts: &[
        SALES_BY_HOUR,
        ChartSpec {
            title: "Sales by Category",
            group: GroupBy::Dimension(Dimension::Category),
            measure: Measure::Total,
            kind: ChartKind::HorizontalBar,
            order: SortOrder::Ascending,
        },
        ChartSpec {
            title: "Top Selling Products",
            group: GroupBy::Dimension(Dimension::Category),
            measure: Measure::Quantity,
            kind: ChartKind::Donut,
            order: SortOrder::Descending,
        },
        ChartSpec {
            title: "Top Selling Regions",
            group: GroupBy::Dimension(Dimension::Region),
            measure: Measure::Quantity,
            kind: ChartKind::Pie,
            order: SortOrder::Descending,
        },
    ],
};

pub static SUPERMARKET: PageSpec = PageSpec {
    title: "Sales Dashboard Page 2",
    filters: &[
        FilterControl {
            dimension: Dimension::City,
            prompt: "Select the city:",
            default: DefaultSelection::All,
        },
        FilterControl {
            dimension: Dimension::CustomerType,
            prompt: "Select the Customer Type:",
            default: DefaultSelection::All,
        },
        FilterControl {
            dimension: Dimension::Gender,
            prompt: "Select the Gender Type:",
            default: DefaultSelection::All,
        },
    ],
    date_range: true,
    charts: &[
        SALES_BY_HOUR,
        ChartSpec {
            title: "Sales by Product Line",
            group: GroupBy::Dimension(Dimension::ProductLine),
            measure: Measure::Total,
            kind: ChartKind::HorizontalBar,
            order: SortOrder::Ascending,
        },
        ChartSpec {
            title: "Top Selling Products",
            group: GroupBy::Dimension(Dimension::ProductLine),
            measure: Measure::Quantity,
            kind: ChartKind::Donut,
            order: SortOrder::Descending,
        },
    ],
};

impl Page {
    pub const ALL: [Page; 2] = [Page::Superstore, Page::Supermarket];

    pub fn spec(self) -> &'static PageSpec {
        match self {
            Page::Superstore => &SUPERSTORE,
            Page::Supermarket => &SUPERMARKET,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Superstore => "Superstore",
            Page::Supermarket => "Supermarket",
        }
    }
}

impl PageSpec {
    /// Filters a page starts with once its table is loaded. Only the page's
    /// own controls constrain the view; the date range spans the whole table.
    pub fn default_filters<R: SalesRecord>(&self, table: &Table<R>) -> FilterSpec {
        let mut spec = FilterSpec::new();
        for control in self.filters {
            let domain = table.domain(control.dimension).cloned().unwrap_or_default();
            let selected: BTreeSet<String> = match control.default {
                DefaultSelection::All => domain,
                DefaultSelection::First => domain.into_iter().take(1).collect(),
            };
            spec.set_selection(control.dimension, selected);
        }
        if self.date_range {
            spec.set_date_range(table.date_bounds().map(|(lo, hi)| DateRange::new(lo, hi)));
        }
        spec
    }
}
