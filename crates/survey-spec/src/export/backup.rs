use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExportError;
use crate::spec::{
    question::QuestionRecord,
    schema::{Schema, SchemaMetadata},
};

/// System-of-record serialization: metadata plus one question list per section.
///
/// Section lists live under their `backup_key`; `metadata.sections` fixes their order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BackupDocument {
    pub metadata: SchemaMetadata,
    #[serde(flatten)]
    pub groupings: BTreeMap<String, Vec<QuestionRecord>>,
}

impl BackupDocument {
    pub fn from_schema(schema: &Schema) -> Result<Self, ExportError> {
        let mut groupings = BTreeMap::new();
        let mut regrouped = Vec::with_capacity(schema.len());
        for section in &schema.metadata.sections {
            let records = schema
                .section(&section.name)
                .cloned()
                .collect::<Vec<_>>();
            regrouped.extend(records.iter().map(|record| record.id.clone()));
            groupings.insert(section.backup_key.clone(), records);
        }
        if !regrouped.iter().map(String::as_str).eq(schema.ids()) {
            return Err(ExportError::InvalidBackup(
                "schema questions are not grouped by the sections listed in metadata".into(),
            ));
        }
        Ok(Self {
            metadata: schema.metadata.clone(),
            groupings,
        })
    }

    /// Reassemble the schema in metadata section order.
    pub fn into_schema(mut self) -> Result<Schema, ExportError> {
        let mut questions = Vec::new();
        for section in &self.metadata.sections {
            let records = self.groupings.remove(&section.backup_key).ok_or_else(|| {
                ExportError::InvalidBackup(format!(
                    "missing question list '{}'",
                    section.backup_key
                ))
            })?;
            if records.len() != section.question_count {
                return Err(ExportError::InvalidBackup(format!(
                    "'{}' holds {} questions, metadata says {}",
                    section.backup_key,
                    records.len(),
                    section.question_count
                )));
            }
            if let Some(stray) = records.iter().find(|record| record.section != section.name) {
                return Err(ExportError::InvalidBackup(format!(
                    "question '{}' in '{}' belongs to section '{}'",
                    stray.id, section.backup_key, stray.section
                )));
            }
            questions.extend(records);
        }
        if let Some(key) = self.groupings.keys().next() {
            return Err(ExportError::InvalidBackup(format!(
                "question list '{key}' is not listed in metadata"
            )));
        }
        let schema = Schema {
            metadata: self.metadata,
            questions,
        };
        if let Some(id) = schema.duplicate_id() {
            return Err(ExportError::InvalidBackup(format!(
                "question id '{id}' appears more than once"
            )));
        }
        Ok(schema)
    }
}

/// Pretty JSON text of the backup document.
pub fn render_backup(document: &BackupDocument) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse backup JSON text back into a schema.
pub fn parse_backup(text: &str) -> Result<Schema, ExportError> {
    let document: BackupDocument = serde_json::from_str(text)?;
    document.into_schema()
}

/// JSON Schema describing the backup document layout.
pub fn backup_json_schema() -> Result<Value, ExportError> {
    Ok(serde_json::to_value(schemars::schema_for!(BackupDocument))?)
}
