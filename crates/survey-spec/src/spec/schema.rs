use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::QuestionRecord;

/// Question count for one generated section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionCount {
    pub name: String,
    /// Top-level key holding this section's questions in the backup document.
    pub backup_key: String,
    pub question_count: usize,
}

/// Metadata attached to a generated schema. Reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaMetadata {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub total_groups: usize,
    pub sections: Vec<SectionCount>,
}

/// Generated questionnaire: records in canonical order plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub metadata: SchemaMetadata,
    pub questions: Vec<QuestionRecord>,
}

impl Schema {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|question| question.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&QuestionRecord> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// First id that appears more than once, in canonical order.
    pub fn duplicate_id(&self) -> Option<&str> {
        first_duplicate_id(&self.questions)
    }

    /// Records of one section, in canonical order.
    pub fn section<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a QuestionRecord> {
        self.questions
            .iter()
            .filter(move |question| question.section == name)
    }
}

pub(crate) fn first_duplicate_id(questions: &[QuestionRecord]) -> Option<&str> {
    let mut seen = HashSet::new();
    questions
        .iter()
        .map(|question| question.id.as_str())
        .find(|id| !seen.insert(*id))
}
