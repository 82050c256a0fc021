//! Record and field value types.
//!
//! A record is the engine's read-only view of one source-of-truth row:
//! a stable primary key plus a set of named, typed field values. Records
//! are created and mutated only by the external record store.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable primary key of a record.
pub type Pk = u64;

/// A typed field value carried by a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Floating-point number
    Float(f64),
    /// Fixed-point decimal
    Decimal(Decimal),
    /// Calendar date
    Date(NaiveDate),
    /// UTC timestamp
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Render the value as indexable text.
    ///
    /// Dates use ISO-8601, booleans render as "true"/"false".
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
        }
    }
}

/// A source-of-truth row: primary key plus named field values.
///
/// Field order is deterministic (sorted by name) so that the indexed
/// text projection of a record is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable primary key
    pub pk: Pk,

    /// Named field values
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record with the given primary key.
    pub fn new(pk: Pk) -> Self {
        Self {
            pk,
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value, replacing any existing value for the name.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Combined searchable text of all field values, in field-name order.
    pub fn searchable_text(&self) -> String {
        let parts: Vec<String> = self.fields.values().map(FieldValue::render).collect();
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_record() -> Record {
        Record::new(42)
            .with_field("author", FieldValue::Text("david42".to_string()))
            .with_field("boolean", FieldValue::Bool(false))
            .with_field("number", FieldValue::Integer(210))
            .with_field("float_number", FieldValue::Float(13.5))
            .with_field(
                "decimal_number",
                FieldValue::Decimal(Decimal::from_str("22.34").unwrap()),
            )
            .with_field(
                "date",
                FieldValue::Date(NaiveDate::from_ymd_opt(2009, 2, 23).unwrap()),
            )
            .with_field(
                "datetime",
                FieldValue::DateTime(Utc.with_ymd_and_hms(2009, 2, 25, 1, 1, 1).unwrap()),
            )
    }

    #[test]
    fn test_field_access() {
        let record = sample_record();
        assert_eq!(record.pk, 42);
        assert_eq!(
            record.field("author"),
            Some(&FieldValue::Text("david42".to_string()))
        );
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_with_field_replaces() {
        let record = Record::new(1)
            .with_field("author", FieldValue::Text("first".to_string()))
            .with_field("author", FieldValue::Text("second".to_string()));
        assert_eq!(record.fields.len(), 1);
        assert_eq!(
            record.field("author"),
            Some(&FieldValue::Text("second".to_string()))
        );
    }

    #[test]
    fn test_render_values() {
        assert_eq!(FieldValue::Bool(true).render(), "true");
        assert_eq!(FieldValue::Integer(-3).render(), "-3");
        assert_eq!(
            FieldValue::Decimal(Decimal::from_str("22.34").unwrap()).render(),
            "22.34"
        );
        assert_eq!(
            FieldValue::Date(NaiveDate::from_ymd_opt(2009, 2, 23).unwrap()).render(),
            "2009-02-23"
        );
    }

    #[test]
    fn test_searchable_text_is_deterministic() {
        let a = sample_record().searchable_text();
        let b = sample_record().searchable_text();
        assert_eq!(a, b);
        assert!(a.contains("david42"));
        assert!(a.contains("22.34"));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
