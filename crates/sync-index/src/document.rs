//! Document mapping from records to Tantivy documents.

use tantivy::doc;
use tantivy::TantivyDocument;

use sync_types::{FieldValue, Record};

use crate::error::IndexError;
use crate::schema::SyncSchema;

/// Convert a record to a Tantivy document.
///
/// Text field holds the rendered field values in field-name order;
/// the payload field stores the fields as JSON for inspection.
///
/// Non-finite floats are rejected: serde_json would turn NaN and
/// infinity into `null`, corrupting the stored payload silently.
pub fn record_to_doc(schema: &SyncSchema, record: &Record) -> Result<TantivyDocument, IndexError> {
    for (name, value) in &record.fields {
        if let FieldValue::Float(f) = value {
            if !f.is_finite() {
                return Err(IndexError::Conversion(format!(
                    "pk {}: non-finite float in field '{}'",
                    record.pk, name
                )));
            }
        }
    }

    let text = record.searchable_text();
    let payload = serde_json::to_string(&record.fields)
        .map_err(|e| IndexError::Conversion(format!("pk {}: {}", record.pk, e)))?;

    Ok(doc!(
        schema.pk => record.pk,
        schema.text => text,
        schema.payload => payload,
    ))
}
