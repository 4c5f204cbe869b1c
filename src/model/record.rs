use chrono::{DateTime, Local};
use std::fmt;

/// Format of the human readable capture time column.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A computed report value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Decimal(f64),
    Integer(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Decimal(v) => f.write_str(&format_decimal(*v)),
            FieldValue::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Normalized row for one asset of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// One value per configured derived field, in field set order
    pub derived: Vec<FieldValue>,
    /// Capture time, `%Y-%m-%d %H:%M:%S`
    pub datetime: String,
    /// Capture time as unix epoch seconds
    pub timestamp: i64,
}

impl AssetRecord {
    pub fn new(
        id: i64,
        name: String,
        price: f64,
        derived: Vec<FieldValue>,
        captured_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            name,
            price,
            derived,
            datetime: captured_at.format(DATETIME_FORMAT).to_string(),
            timestamp: captured_at.timestamp(),
        }
    }

    /// Cells in header order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.derived.len() + 5);
        row.push(self.id.to_string());
        row.push(self.name.clone());
        row.push(format_decimal(self.price));
        row.extend(self.derived.iter().map(|v| v.to_string()));
        row.push(self.datetime.clone());
        row.push(self.timestamp.to_string());
        row
    }
}

/// Renders a float with at least one fractional digit, so `10` reads `10.0`.
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Rounds to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
