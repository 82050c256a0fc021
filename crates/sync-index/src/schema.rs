//! Tantivy schema for synchronized record documents.
//!
//! Three fields per document:
//! - pk: the record's primary key, mapped 1:1 to the internal docid
//! - text: catch-all searchable projection of all field values
//! - payload: stored JSON of the original field values

use tantivy::schema::{Field, Schema, FAST, INDEXED, STORED, TEXT};

use crate::error::IndexError;

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct SyncSchema {
    schema: Schema,
    /// Record primary key (INDEXED | STORED | FAST u64)
    pub pk: Field,
    /// Searchable text projection of the record (TEXT)
    pub text: Field,
    /// Stored JSON payload of the record's fields (STORED)
    pub payload: Field,
}

impl SyncSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create a SyncSchema from an existing Tantivy schema.
    pub fn from_schema(schema: Schema) -> Result<Self, IndexError> {
        let pk = schema
            .get_field("pk")
            .map_err(|_| IndexError::SchemaMismatch("missing pk field".into()))?;
        let text = schema
            .get_field("text")
            .map_err(|_| IndexError::SchemaMismatch("missing text field".into()))?;
        let payload = schema
            .get_field("payload")
            .map_err(|_| IndexError::SchemaMismatch("missing payload field".into()))?;

        Ok(Self {
            schema,
            pk,
            text,
            payload,
        })
    }
}

/// Build the synchronization schema.
///
/// The pk field is indexed (for delete-by-term upserts), stored, and fast
/// (for key enumeration during the removal diff pass).
pub fn build_sync_schema() -> SyncSchema {
    let mut schema_builder = Schema::builder();

    let pk = schema_builder.add_u64_field("pk", INDEXED | STORED | FAST);
    let text = schema_builder.add_text_field("text", TEXT);
    let payload = schema_builder.add_text_field("payload", STORED);

    let schema = schema_builder.build();

    SyncSchema {
        schema,
        pk,
        text,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_schema() {
        let schema = build_sync_schema();
        assert_eq!(schema.schema().get_field("pk").unwrap(), schema.pk);
        assert_eq!(schema.schema().get_field("text").unwrap(), schema.text);
    }

    #[test]
    fn test_from_schema_round_trip() {
        let built = build_sync_schema();
        let restored = SyncSchema::from_schema(built.schema().clone()).unwrap();
        assert_eq!(restored.pk, built.pk);
        assert_eq!(restored.text, built.text);
        assert_eq!(restored.payload, built.payload);
    }

    #[test]
    fn test_from_schema_rejects_foreign_schema() {
        let mut builder = Schema::builder();
        builder.add_text_field("other", TEXT);
        let err = SyncSchema::from_schema(builder.build()).unwrap_err();
        assert!(matches!(err, IndexError::SchemaMismatch(_)));
    }
}
