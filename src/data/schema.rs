use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use super::model::{CellValue, Dimension, Measure, SalesRecord};

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Convert an Excel 1900-system serial (days since 1899-12-30, fractional
/// part = time of day) into a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = time_on_excel_epoch(NaiveTime::from_hms_opt(0, 0, 0)?)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

/// A bare clock time placed on the Excel epoch day (serial `0.x`), the shape
/// spreadsheets use for time-only cells.
pub fn time_on_excel_epoch(time: NaiveTime) -> Option<NaiveDateTime> {
    Some(NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(time))
}

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parse a clock time from text, a date-time cell or an Excel day fraction.
pub fn parse_time(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::String(s) => {
            let s = s.trim();
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
                .or_else(|| parse_datetime_text(s).map(|dt| dt.time()))
        }
        CellValue::DateTime(dt) => Some(dt.time()),
        CellValue::Float(f) => excel_serial_to_datetime(*f).map(|dt| dt.time()),
        _ => None,
    }
}

/// Parse a calendar date from text, a date-time cell or an Excel serial.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::String(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| parse_datetime_text(s).map(|dt| dt.date()))
        }
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Integer(i) if *i > 0 => excel_serial_to_datetime(*i as f64).map(|dt| dt.date()),
        CellValue::Float(f) if *f >= 1.0 => excel_serial_to_datetime(*f).map(|dt| dt.date()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Superstore dataset
// ---------------------------------------------------------------------------

/// One order line of the Superstore CSV. Only the clock time is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperstoreRow {
    pub state: String,
    pub ship_mode: String,
    pub segment: String,
    pub category: String,
    pub region: String,
    pub time: NaiveTime,
    pub total: f64,
    pub quantity: f64,
    pub rating: f64,
}

impl SalesRecord for SuperstoreRow {
    const DATASET: &'static str = "superstore";
    const COLUMNS: &'static [&'static str] = &[
        "State", "ship_mode", "Segment", "Category", "Region", "Time", "Total", "Quantity", "Rating",
    ];
    const DIMENSIONS: &'static [Dimension] = &[
        Dimension::State,
        Dimension::ShipMode,
        Dimension::Segment,
        Dimension::Category,
        Dimension::Region,
    ];

    fn from_cells(cells: &[&CellValue]) -> Option<Self> {
        let [state, ship_mode, segment, category, region, time, total, quantity, rating] = cells
        else {
            return None;
        };
        Some(SuperstoreRow {
            state: state.as_text()?,
            ship_mode: ship_mode.as_text()?,
            segment: segment.as_text()?,
            category: category.as_text()?,
            region: region.as_text()?,
            time: parse_time(time)?,
            total: total.as_f64()?,
            quantity: quantity.as_f64()?,
            rating: rating.as_f64()?,
        })
    }

    fn dimension(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::State => Some(&self.state),
            Dimension::ShipMode => Some(&self.ship_mode),
            Dimension::Segment => Some(&self.segment),
            Dimension::Category => Some(&self.category),
            Dimension::Region => Some(&self.region),
            _ => None,
        }
    }

    fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Total => self.total,
            Measure::Quantity => self.quantity,
            Measure::Rating => self.rating,
        }
    }

    fn hour(&self) -> u32 {
        self.time.hour()
    }

    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

// ---------------------------------------------------------------------------
// Supermarket dataset
// ---------------------------------------------------------------------------

/// One invoice of the supermarket sales workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SupermarketRow {
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub timestamp: NaiveDateTime,
    pub total: f64,
    pub quantity: f64,
    pub rating: f64,
}

impl SalesRecord for SupermarketRow {
    const DATASET: &'static str = "supermarket";
    const COLUMNS: &'static [&'static str] = &[
        "City",
        "Customer_type",
        "Gender",
        "Product line",
        "Date",
        "Time",
        "Total",
        "Quantity",
        "Rating",
    ];
    const DIMENSIONS: &'static [Dimension] = &[
        Dimension::City,
        Dimension::CustomerType,
        Dimension::Gender,
        Dimension::ProductLine,
    ];

    fn from_cells(cells: &[&CellValue]) -> Option<Self> {
        let [city, customer_type, gender, product_line, date, time, total, quantity, rating] = cells
        else {
            return None;
        };
        Some(SupermarketRow {
            city: city.as_text()?,
            customer_type: customer_type.as_text()?,
            gender: gender.as_text()?,
            product_line: product_line.as_text()?,
            timestamp: parse_date(date)?.and_time(parse_time(time)?),
            total: total.as_f64()?,
            quantity: quantity.as_f64()?,
            rating: rating.as_f64()?,
        })
    }

    fn dimension(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::City => Some(&self.city),
            Dimension::CustomerType => Some(&self.customer_type),
            Dimension::Gender => Some(&self.gender),
            Dimension::ProductLine => Some(&self.product_line),
            _ => None,
        }
    }

    fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Total => self.total,
            Measure::Quantity => self.quantity,
            Measure::Rating => self.rating,
        }
    }

    fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.timestamp.date())
    }
}
