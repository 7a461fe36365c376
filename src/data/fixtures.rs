//! Row builders shared by unit tests.

use chrono::{NaiveDate, NaiveTime};

use super::schema::{SupermarketRow, SuperstoreRow};

pub fn superstore_row(
    region: &str,
    category: &str,
    hour: u32,
    total: f64,
    quantity: f64,
    rating: f64,
) -> SuperstoreRow {
    SuperstoreRow {
        state: "Texas".to_string(),
        ship_mode: "Standard Class".to_string(),
        segment: "Consumer".to_string(),
        category: category.to_string(),
        region: region.to_string(),
        time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        total,
        quantity,
        rating,
    }
}

pub fn supermarket_row(
    city: &str,
    product_line: &str,
    (y, m, d): (i32, u32, u32),
    hour: u32,
    total: f64,
    quantity: f64,
    rating: f64,
) -> SupermarketRow {
    SupermarketRow {
        city: city.to_string(),
        customer_type: "Member".to_string(),
        gender: "Female".to_string(),
        product_line: product_line.to_string(),
        timestamp: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap(),
        total,
        quantity,
        rating,
    }
}
