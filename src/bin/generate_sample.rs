use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Superstore CSV
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SuperstoreRecord {
    #[serde(rename = "State")]
    state: &'static str,
    ship_mode: &'static str,
    #[serde(rename = "Segment")]
    segment: &'static str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Region")]
    region: &'static str,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Total")]
    total: f64,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Rating")]
    rating: f64,
}

fn write_superstore(rng: &mut SimpleRng, rows: usize, path: &str) -> Result<()> {
    let states = [
        ("California", "West"),
        ("Washington", "West"),
        ("Texas", "Central"),
        ("Illinois", "Central"),
        ("New York", "East"),
        ("Ohio", "East"),
        ("Florida", "South"),
        ("Kentucky", "South"),
    ];
    let ship_modes = ["Standard Class", "Second Class", "First Class", "Same Day"];
    let segments = ["Consumer", "Corporate", "Home Office"];
    let categories = ["Furniture", "Office Supplies", "Technology"];

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for _ in 0..rows {
        let (state, region) = states[rng.below(states.len() as u64) as usize];
        let quantity = 1 + rng.below(9) as u32;
        writer.serialize(SuperstoreRecord {
            state,
            ship_mode: rng.pick(&ship_modes),
            segment: rng.pick(&segments),
            category: rng.pick(&categories),
            region,
            time: format!("{:02}:{:02}", 10 + rng.below(11), rng.below(60)),
            total: round2(quantity as f64 * rng.uniform(5.0, 120.0)),
            quantity,
            rating: (rng.uniform(4.0, 10.0) * 10.0).round() / 10.0,
        })?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Supermarket CSV + Parquet
// ---------------------------------------------------------------------------

struct Invoice {
    id: String,
    city: &'static str,
    customer_type: &'static str,
    gender: &'static str,
    product_line: &'static str,
    date: NaiveDate,
    time: String,
    total: f64,
    quantity: i64,
    rating: f64,
}

fn generate_invoices(rng: &mut SimpleRng, rows: usize) -> Result<Vec<Invoice>> {
    let cities = ["Yangon", "Mandalay", "Naypyitaw"];
    let customer_types = ["Member", "Normal"];
    let genders = ["Female", "Male"];
    let product_lines = [
        "Electronic accessories",
        "Fashion accessories",
        "Food and beverages",
        "Health and beauty",
        "Home and lifestyle",
        "Sports and travel",
    ];
    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).context("start date")?;

    let mut invoices = Vec::with_capacity(rows);
    for i in 0..rows {
        let quantity = 1 + rng.below(10) as i64;
        let unit_price = rng.uniform(10.0, 100.0);
        let date = first_day
            .checked_add_days(chrono::Days::new(rng.below(90)))
            .context("date overflow")?;
        invoices.push(Invoice {
            id: format!("{:03}-{:02}-{:04}", 100 + i % 900, rng.below(100), rng.below(10_000)),
            city: rng.pick(&cities),
            customer_type: rng.pick(&customer_types),
            gender: rng.pick(&genders),
            product_line: rng.pick(&product_lines),
            date,
            time: format!("{:02}:{:02}", 10 + rng.below(11), rng.below(60)),
            // 5% tax on top of the line price
            total: round2(unit_price * quantity as f64 * 1.05),
            quantity,
            rating: (rng.uniform(4.0, 10.0) * 10.0).round() / 10.0,
        });
    }
    Ok(invoices)
}

fn write_supermarket_csv(invoices: &[Invoice], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Invoice ID",
        "City",
        "Customer_type",
        "Gender",
        "Product line",
        "Date",
        "Time",
        "Total",
        "Quantity",
        "Rating",
    ])?;
    for inv in invoices {
        writer.write_record([
            inv.id.clone(),
            inv.city.to_string(),
            inv.customer_type.to_string(),
            inv.gender.to_string(),
            inv.product_line.to_string(),
            inv.date.format("%m/%d/%Y").to_string(),
            inv.time.clone(),
            inv.total.to_string(),
            inv.quantity.to_string(),
            inv.rating.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn string_column<'a>(invoices: &'a [Invoice], f: impl Fn(&'a Invoice) -> &'a str) -> StringArray {
    StringArray::from(invoices.iter().map(f).collect::<Vec<&str>>())
}

fn supermarket_batch(invoices: &[Invoice]) -> Result<RecordBatch> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("Invoice ID", DataType::Utf8, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Customer_type", DataType::Utf8, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("Product line", DataType::Utf8, false),
        Field::new("Date", DataType::Date32, false),
        Field::new("Time", DataType::Utf8, false),
        Field::new("Total", DataType::Float64, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("Rating", DataType::Float64, false),
    ]));

    let days: Vec<i32> = invoices
        .iter()
        .map(|inv| inv.date.num_days_from_ce() - epoch.num_days_from_ce())
        .collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(string_column(invoices, |inv| &inv.id)),
            Arc::new(string_column(invoices, |inv| inv.city)),
            Arc::new(string_column(invoices, |inv| inv.customer_type)),
            Arc::new(string_column(invoices, |inv| inv.gender)),
            Arc::new(string_column(invoices, |inv| inv.product_line)),
            Arc::new(Date32Array::from(days)),
            Arc::new(string_column(invoices, |inv| &inv.time)),
            Arc::new(Float64Array::from(invoices.iter().map(|i| i.total).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(invoices.iter().map(|i| i.quantity).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(invoices.iter().map(|i| i.rating).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;
    Ok(batch)
}

fn write_parquet(batch: &RecordBatch, path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    write_superstore(&mut rng, 2000, "SampleSuperstore.csv")?;
    println!("Wrote 2000 orders to SampleSuperstore.csv");

    let invoices = generate_invoices(&mut rng, 1000)?;
    write_supermarket_csv(&invoices, "supermarkt_sales.csv")?;
    let batch = supermarket_batch(&invoices)?;
    write_parquet(&batch, "supermarkt_sales.parquet")?;
    println!(
        "Wrote {} invoices to supermarkt_sales.csv and supermarkt_sales.parquet",
        invoices.len()
    );
    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);

    Ok(())
}
