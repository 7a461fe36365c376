use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, Time32MillisecondType, Time32SecondType, Time64MicrosecondType,
    Time64NanosecondType, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt16Type, UInt32Type, UInt8Type,
};
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{text_cell, CellValue, RawTable, SalesRecord, Table};
use super::schema::{excel_serial_to_datetime, time_on_excel_epoch};

// ---------------------------------------------------------------------------
// Errors and layout
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("worksheet '{0}' not found")]
    MissingSheet(String),
    #[error("invalid sheet layout: {0}")]
    InvalidLayout(String),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("{dataset} source is missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        dataset: &'static str,
        missing: Vec<String>,
    },
    #[error("source has no header row")]
    Empty,
}

/// Where the table sits inside a worksheet. Ignored for CSV and Parquet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Worksheet name; the first sheet when absent.
    pub sheet: Option<String>,
    /// Sheet rows above the header row.
    pub skip_rows: u32,
    /// First column letter (e.g. `"B"`); the used range's first column when absent.
    pub first_column: Option<String>,
    /// Last column letter (inclusive); the used range's last column when absent.
    pub last_column: Option<String>,
    /// Maximum number of data rows below the header.
    pub max_rows: Option<usize>,
}

/// Zero-based index of a spreadsheet column letter: `A` → 0, `R` → 17, `AA` → 26.
pub fn column_letter_index(letters: &str) -> Option<u32> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and bind a typed table from a file.
pub fn load_table<R: SalesRecord>(path: &Path, layout: &SheetLayout) -> Result<Table<R>, LoadError> {
    let raw = read_source(path, layout)?;
    let table = table_from_raw::<R>(&raw)?;
    log::info!(
        "Loaded {} {} rows from {} ({} dropped)",
        table.len(),
        R::DATASET,
        path.display(),
        table.dropped_rows()
    );
    Ok(table)
}

/// Read a file into raw cells.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / `.tsv` – header row + delimited fields
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – one worksheet, see [`SheetLayout`]
/// * `.parquet` / `.pq` – flat columns
pub fn read_source(path: &Path, layout: &SheetLayout) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => read_csv(path, b','),
        "tsv" => read_csv(path, b'\t'),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path, layout),
        "parquet" | "pq" => read_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Bind raw cells to `R`'s schema. Missing columns are fatal; rows that `R`
/// rejects are dropped and counted.
pub fn table_from_raw<R: SalesRecord>(raw: &RawTable) -> Result<Table<R>, LoadError> {
    let mut indices = Vec::with_capacity(R::COLUMNS.len());
    let mut missing = Vec::new();
    for &name in R::COLUMNS {
        match raw.column_index(name) {
            Some(i) => indices.push(i),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            dataset: R::DATASET,
            missing,
        });
    }

    let null = CellValue::Null;
    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;
    let mut cells: Vec<&CellValue> = Vec::with_capacity(indices.len());

    for record in &raw.rows {
        cells.clear();
        cells.extend(indices.iter().map(|&i| record.get(i).unwrap_or(&null)));
        match R::from_cells(&cells) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::info!("Dropped {dropped} {} rows with null or malformed fields", R::DATASET);
    }
    Ok(Table::from_rows(rows, dropped))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut cells: Vec<CellValue> = record.iter().map(text_cell).collect();
        if cells.iter().all(CellValue::is_null) {
            continue;
        }
        cells.resize(headers.len(), CellValue::Null);
        rows.push(cells);
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path, layout: &SheetLayout) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    let sheet = match &layout.sheet {
        Some(name) if sheet_names.contains(name) => name.clone(),
        Some(name) => return Err(LoadError::MissingSheet(name.clone())),
        None => sheet_names.first().cloned().ok_or(LoadError::Empty)?,
    };
    let range = workbook.worksheet_range(&sheet)?;

    let (Some((_, used_first_col)), Some((used_last_row, used_last_col))) = (range.start(), range.end())
    else {
        return Err(LoadError::Empty);
    };
    let letter = |letters: &Option<String>, fallback: u32| match letters {
        Some(l) => column_letter_index(l)
            .ok_or_else(|| LoadError::InvalidLayout(format!("bad column letter '{l}'"))),
        None => Ok(fallback),
    };
    let first_col = letter(&layout.first_column, used_first_col)?;
    let last_col = letter(&layout.last_column, used_last_col)?;
    if first_col > last_col {
        return Err(LoadError::InvalidLayout(format!(
            "first column {first_col} is after last column {last_col}"
        )));
    }

    let header_row = layout.skip_rows;
    if header_row > used_last_row {
        return Err(LoadError::Empty);
    }
    let headers: Vec<String> = (first_col..=last_col)
        .map(|c| {
            range
                .get_value((header_row, c))
                .and_then(|d| data_to_cell(d).as_text())
                .unwrap_or_default()
        })
        .collect();

    let max_rows = layout.max_rows.unwrap_or(usize::MAX);
    let mut rows = Vec::new();
    for r in header_row.saturating_add(1)..=used_last_row {
        if rows.len() >= max_rows {
            break;
        }
        let cells: Vec<CellValue> = (first_col..=last_col)
            .map(|c| range.get_value((r, c)).map(data_to_cell).unwrap_or(CellValue::Null))
            .collect();
        if cells.iter().all(CellValue::is_null) {
            continue;
        }
        rows.push(cells);
    }

    log::debug!(
        "Read {} rows from sheet '{sheet}' of {} (header row {header_row})",
        rows.len(),
        path.display()
    );
    Ok(RawTable { headers, rows })
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) => text_cell(s),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(v) => excel_serial_to_datetime(v.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): dictionary-encoded category columns are
/// decoded and `time64` columns read as clock times. Columns of any other
/// type read as null, with one warning per column.
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut unsupported: BTreeSet<usize> = BTreeSet::new();
    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let mut columns: Vec<Vec<CellValue>> = Vec::with_capacity(batch.num_columns());
        for (i, col) in batch.columns().iter().enumerate() {
            let cells = match arrow_column(col)? {
                Some(cells) => cells,
                None => {
                    if unsupported.insert(i) {
                        log::warn!(
                            "Unsupported parquet column type {:?} for '{}', reading as null",
                            col.data_type(),
                            headers.get(i).map_or("", String::as_str)
                        );
                    }
                    vec![CellValue::Null; batch.num_rows()]
                }
            };
            columns.push(cells);
        }
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Convert a whole Arrow column into cells. `None` when the column type has
/// no cell mapping.
fn arrow_column(col: &ArrayRef) -> Result<Option<Vec<CellValue>>, LoadError> {
    if let DataType::Dictionary(_, value_type) = col.data_type() {
        let values = cast(col.as_ref(), value_type)?;
        return arrow_column(&values);
    }
    if !has_cell_mapping(col.data_type()) {
        return Ok(None);
    }
    Ok(Some((0..col.len()).map(|row| arrow_cell(col, row)).collect()))
}

fn has_cell_mapping(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::Float32
            | DataType::Float64
            | DataType::Date32
            | DataType::Date64
            | DataType::Time32(TimeUnit::Second | TimeUnit::Millisecond)
            | DataType::Time64(TimeUnit::Microsecond | TimeUnit::Nanosecond)
            | DataType::Timestamp(_, _)
    )
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let datetime = |dt: Option<chrono::NaiveDateTime>| dt.map(CellValue::DateTime).unwrap_or(CellValue::Null);
    let time = |t: Option<chrono::NaiveTime>| datetime(t.and_then(time_on_excel_epoch));
    match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Date32 => datetime(col.as_primitive::<Date32Type>().value_as_datetime(row)),
        DataType::Date64 => datetime(col.as_primitive::<Date64Type>().value_as_datetime(row)),
        DataType::Time32(TimeUnit::Second) => {
            time(col.as_primitive::<Time32SecondType>().value_as_time(row))
        }
        DataType::Time32(TimeUnit::Millisecond) => {
            time(col.as_primitive::<Time32MillisecondType>().value_as_time(row))
        }
        DataType::Time64(TimeUnit::Microsecond) => {
            time(col.as_primitive::<Time64MicrosecondType>().value_as_time(row))
        }
        DataType::Time64(TimeUnit::Nanosecond) => {
            time(col.as_primitive::<Time64NanosecondType>().value_as_time(row))
        }
        DataType::Timestamp(TimeUnit::Second, _) => {
            datetime(col.as_primitive::<TimestampSecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            datetime(col.as_primitive::<TimestampMillisecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            datetime(col.as_primitive::<TimestampMicrosecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            datetime(col.as_primitive::<TimestampNanosecondType>().value_as_datetime(row))
        }
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dimension, SalesRecord};
    use crate::data::schema::{SupermarketRow, SuperstoreRow};
    use arrow::array::{
        BinaryArray, Date32Array, DictionaryArray, Float64Array, Int64Array, StringArray,
        Time64MicrosecondArray,
    };
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::{Format, Workbook};
    use std::io::Write;
    use std::sync::Arc;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).expect("create fixture");
        file.write_all(contents.as_bytes()).expect("write fixture");
        path
    }

    const SUPERSTORE_CSV: &str = "\
Ship Mode,State,ship_mode,Segment,Category,Region,Time,Total,Quantity,Rating
x,Kentucky,Second Class,Consumer,Furniture,South,13:08,261.96,2,9.1
x,California,Second Class,Corporate,Office Supplies,West,10:29,14.62,2,9.6

x,Florida,Standard Class,Consumer,Furniture,South,NA,957.58,5,7.4
x,Florida,Standard Class,,Technology,South,20:33,22.37,2,8.4
x,Texas,First Class,Home Office,Technology,Central,19:45,not-a-number,3,5.3
x,Texas,First Class,Home Office,Technology,Central,09:05,48.86,7
";

    #[test]
    fn loads_superstore_csv_and_drops_bad_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(&dir, "superstore.csv", SUPERSTORE_CSV);

        let table = load_table::<SuperstoreRow>(&path, &SheetLayout::default()).unwrap();

        // null time, blank segment, bad total and the short row are dropped
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped_rows(), 4);
        let hours: Vec<u32> = table.rows().iter().map(SalesRecord::hour).collect();
        assert_eq!(hours, vec![13, 10]);
        assert_eq!(table.rows()[0].state, "Kentucky");
        assert_eq!(table.rows()[1].total, 14.62);
    }

    #[test]
    fn missing_required_columns_are_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(&dir, "bad.csv", "State,Segment,Total\nTexas,Consumer,1.0\n");

        let err = load_table::<SuperstoreRow>(&path, &SheetLayout::default()).unwrap_err();
        match err {
            LoadError::MissingColumns { dataset, missing } => {
                assert_eq!(dataset, "superstore");
                assert_eq!(
                    missing,
                    vec!["ship_mode", "Category", "Region", "Time", "Quantity", "Rating"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_sources_fail_to_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            read_source(&missing, &SheetLayout::default()),
            Err(LoadError::Io { .. })
        ));

        let unknown = write_file(&dir, "data.json", "[]");
        assert!(matches!(
            read_source(&unknown, &SheetLayout::default()),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "json"
        ));
    }

    #[test]
    fn reads_tab_separated_supermarket_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            &dir,
            "sales.tsv",
            "Invoice ID\tCity\tCustomer_type\tGender\tProduct line\tDate\tTime\tTotal\tQuantity\tRating\n\
             750-67-8428\tYangon\tMember\tFemale\tHealth and beauty\t1/5/2019\t13:08\t548.9715\t7\t9.1\n\
             226-31-3081\tNaypyitaw\tNormal\tFemale\tElectronic accessories\t3/8/2019\t10:29\t80.22\t5\t9.6\n",
        );

        let table = load_table::<SupermarketRow>(&path, &SheetLayout::default()).unwrap();
        assert_eq!(table.len(), 2);
        let cities: Vec<&str> = table
            .domain(Dimension::City)
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(cities, vec!["Naypyitaw", "Yangon"]);
        let (start, end) = table.date_bounds().unwrap();
        assert_eq!(start.to_string(), "2019-01-05");
        assert_eq!(end.to_string(), "2019-03-08");
    }

    #[test]
    fn binds_spreadsheet_style_cells() {
        // Shape produced by the spreadsheet reader: dates and times as serials.
        let raw = RawTable {
            headers: SupermarketRow::COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows: vec![vec![
                CellValue::String("Mandalay".into()),
                CellValue::String("Normal".into()),
                CellValue::String("Male".into()),
                CellValue::String("Sports and travel".into()),
                CellValue::DateTime(excel_serial_to_datetime(43525.0).unwrap()),
                CellValue::Float(0.75),
                CellValue::Float(634.3785),
                CellValue::Integer(10),
                CellValue::Float(4.1),
            ]],
        };

        let table = table_from_raw::<SupermarketRow>(&raw).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.timestamp.to_string(), "2019-03-01 18:00:00");
    }

    #[test]
    fn parses_column_letters() {
        assert_eq!(column_letter_index("A"), Some(0));
        assert_eq!(column_letter_index("b"), Some(1));
        assert_eq!(column_letter_index("R"), Some(17));
        assert_eq!(column_letter_index("AA"), Some(26));
        assert_eq!(column_letter_index(""), None);
        assert_eq!(column_letter_index("B2"), None);
    }

    #[test]
    fn layout_deserializes_with_defaults() {
        let layout: SheetLayout =
            serde_json::from_str(r#"{ "sheet": "Sales", "skip_rows": 3 }"#).unwrap();
        assert_eq!(
            layout,
            SheetLayout {
                sheet: Some("Sales".to_string()),
                skip_rows: 3,
                ..SheetLayout::default()
            }
        );
    }

    #[test]
    fn numeric_looking_labels_keep_their_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_file(
            &dir,
            "codes.csv",
            "State,ship_mode,Segment,Category,Region,Time,Total,Quantity,Rating\n\
             Texas,Same Day,007,Furniture,1.50,13:08,261.96,2,9.1\n",
        );

        let table = load_table::<SuperstoreRow>(&path, &SheetLayout::default()).unwrap();
        assert_eq!(table.rows()[0].segment, "007");
        assert_eq!(table.rows()[0].region, "1.50");
        assert_eq!(table.rows()[0].quantity, 2.0);
    }

    // -- Parquet ------------------------------------------------------------

    const MICROS_PER_HOUR: i64 = 3_600_000_000;

    /// Supermarket columns the way pandas writes them: a categorical
    /// customer type, `datetime.time` values and an extra binary column.
    fn pandas_style_batch() -> RecordBatch {
        let customer_type: DictionaryArray<Int32Type> =
            vec!["Member", "Normal", "Member"].into_iter().collect();
        let schema = Arc::new(Schema::new(vec![
            Field::new("City", DataType::Utf8, false),
            Field::new(
                "Customer_type",
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                false,
            ),
            Field::new("Gender", DataType::Utf8, false),
            Field::new("Product line", DataType::Utf8, false),
            Field::new("Date", DataType::Date32, false),
            Field::new("Time", DataType::Time64(TimeUnit::Microsecond), true),
            Field::new("Total", DataType::Float64, false),
            Field::new("Quantity", DataType::Int64, false),
            Field::new("Rating", DataType::Float64, false),
            Field::new("Payload", DataType::Binary, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["Yangon", "Mandalay", "Yangon"])),
                Arc::new(customer_type),
                Arc::new(StringArray::from(vec!["Female", "Male", "Male"])),
                Arc::new(StringArray::from(vec![
                    "Health and beauty",
                    "Sports and travel",
                    "Food and beverages",
                ])),
                // 2019-01-05, 2019-03-01, 2019-03-02
                Arc::new(Date32Array::from(vec![17901, 17956, 17957])),
                Arc::new(Time64MicrosecondArray::from(vec![
                    Some(13 * MICROS_PER_HOUR),
                    Some(18 * MICROS_PER_HOUR + 30 * 60_000_000),
                    None,
                ])),
                Arc::new(Float64Array::from(vec![548.97, 634.38, 80.22])),
                Arc::new(Int64Array::from(vec![7, 10, 5])),
                Arc::new(Float64Array::from(vec![9.1, 4.1, 9.6])),
                Arc::new(BinaryArray::from(vec![&b"a"[..], &b"b"[..], &b"c"[..]])),
            ],
        )
        .expect("valid batch")
    }

    fn write_parquet(dir: &tempfile::TempDir, name: &str, batch: &RecordBatch) -> PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).expect("create parquet");
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("writer");
        writer.write(batch).expect("write batch");
        writer.close().expect("close writer");
        path
    }

    #[test]
    fn loads_pandas_style_parquet() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_parquet(&dir, "sales.parquet", &pandas_style_batch());

        let table = load_table::<SupermarketRow>(&path, &SheetLayout::default()).unwrap();

        // the row with a null time is the only one dropped
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped_rows(), 1);
        let first = &table.rows()[0];
        assert_eq!(first.customer_type, "Member");
        assert_eq!(first.timestamp.to_string(), "2019-01-05 13:00:00");
        assert_eq!(first.quantity, 7.0);
        assert_eq!(table.rows()[1].timestamp.to_string(), "2019-03-01 18:30:00");
    }

    #[test]
    fn unsupported_parquet_columns_read_as_null() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_parquet(&dir, "sales.pq", &pandas_style_batch());

        let raw = read_source(&path, &SheetLayout::default()).unwrap();
        let payload = raw.column_index("Payload").unwrap();
        assert!(raw.rows.iter().all(|row| row[payload].is_null()));
        let customer_type = raw.column_index("Customer_type").unwrap();
        assert_eq!(raw.rows[1][customer_type], CellValue::String("Normal".into()));
    }

    // -- Spreadsheets -------------------------------------------------------

    const WORKBOOK_HEADERS: [&str; 17] = [
        "Invoice ID",
        "Branch",
        "City",
        "Customer_type",
        "Gender",
        "Product line",
        "Unit price",
        "Quantity",
        "Tax 5%",
        "Total",
        "Date",
        "Time",
        "Payment",
        "cogs",
        "gross margin percentage",
        "gross income",
        "Rating",
    ];

    /// Workbook shaped like the supermarket export: a title block above the
    /// header on sheet row 3, the table in B:R and a stray `City` column in A
    /// that the layout must ignore.
    fn write_sales_workbook(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("supermarkt_sales.xlsx");
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let time_format = Format::new().set_num_format("hh:mm");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sales").unwrap();
        sheet.write_string(0, 1, "Supermarket sales, Q1 2019").unwrap();
        sheet.write_string(1, 1, "All branches").unwrap();

        sheet.write_string(3, 0, "City").unwrap();
        for (i, header) in WORKBOOK_HEADERS.iter().enumerate() {
            sheet.write_string(3, i as u16 + 1, *header).unwrap();
        }

        let day_fraction = |h: f64, m: f64| (h * 60.0 + m) / 1440.0;
        // (sheet row, city, product line, date serial, time of day, total, quantity, rating)
        let invoices = [
            (4, "Yangon", "Health and beauty", 43470.0, day_fraction(13.0, 8.0), 548.97, 7.0, 9.1),
            (5, "Naypyitaw", "Electronic accessories", 43532.0, day_fraction(10.0, 29.0), 80.22, 5.0, 9.6),
            (7, "Mandalay", "Sports and travel", 43525.0, day_fraction(18.0, 0.0), 634.38, 10.0, 4.1),
        ];
        for (row, city, product_line, date, time, total, quantity, rating) in invoices {
            sheet.write_string(row, 0, "stray").unwrap();
            sheet.write_string(row, 1, "750-67-8428").unwrap();
            sheet.write_string(row, 2, "A").unwrap();
            sheet.write_string(row, 3, city).unwrap();
            sheet.write_string(row, 4, "Member").unwrap();
            sheet.write_string(row, 5, "Female").unwrap();
            sheet.write_string(row, 6, product_line).unwrap();
            sheet.write_number(row, 8, quantity).unwrap();
            sheet.write_number(row, 10, total).unwrap();
            sheet.write_number_with_format(row, 11, date, &date_format).unwrap();
            sheet.write_number_with_format(row, 12, time, &time_format).unwrap();
            sheet.write_string(row, 13, "Cash").unwrap();
            sheet.write_number(row, 17, rating).unwrap();
        }
        workbook.save(&path).unwrap();
        path
    }

    fn sales_layout() -> SheetLayout {
        SheetLayout {
            sheet: Some("Sales".to_string()),
            skip_rows: 3,
            first_column: Some("B".to_string()),
            last_column: Some("R".to_string()),
            max_rows: Some(1000),
        }
    }

    #[test]
    fn loads_workbook_table_below_title_block() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_sales_workbook(&dir);

        let raw = read_source(&path, &sales_layout()).unwrap();
        assert_eq!(raw.headers, WORKBOOK_HEADERS.map(String::from).to_vec());
        // the blank sheet row 6 is skipped
        assert_eq!(raw.rows.len(), 3);

        let table = table_from_raw::<SupermarketRow>(&raw).unwrap();
        assert_eq!(table.len(), 3);
        let cities: Vec<&str> = table.rows().iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["Yangon", "Naypyitaw", "Mandalay"]);
        assert_eq!(table.rows()[0].timestamp.to_string(), "2019-01-05 13:08:00");
        assert_eq!(table.rows()[2].timestamp.to_string(), "2019-03-01 18:00:00");
        assert_eq!(table.rows()[1].total, 80.22);
    }

    #[test]
    fn workbook_rows_are_capped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_sales_workbook(&dir);
        let layout = SheetLayout {
            max_rows: Some(2),
            ..sales_layout()
        };

        let table = load_table::<SupermarketRow>(&path, &layout).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn workbook_layout_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_sales_workbook(&dir);

        let missing_sheet = SheetLayout {
            sheet: Some("Nope".to_string()),
            ..sales_layout()
        };
        assert!(matches!(
            read_source(&path, &missing_sheet),
            Err(LoadError::MissingSheet(name)) if name == "Nope"
        ));

        let bad_letter = SheetLayout {
            first_column: Some("B2".to_string()),
            ..sales_layout()
        };
        assert!(matches!(
            read_source(&path, &bad_letter),
            Err(LoadError::InvalidLayout(_))
        ));

        let reversed = SheetLayout {
            first_column: Some("R".to_string()),
            last_column: Some("B".to_string()),
            ..sales_layout()
        };
        assert!(matches!(
            read_source(&path, &reversed),
            Err(LoadError::InvalidLayout(_))
        ));
    }
}
