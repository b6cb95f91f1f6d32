use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed set of question kinds understood by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortText,
    Paragraph,
    #[serde(alias = "multiple_choice")]
    SingleChoice,
    Date,
    LinearScale,
}

impl QuestionType {
    /// Label used in the tabular export and the backup document.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortText => "short_text",
            QuestionType::Paragraph => "paragraph",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::Date => "date",
            QuestionType::LinearScale => "linear_scale",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive bounds of a linear scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScaleBounds {
    pub min: u32,
    pub max: u32,
}

impl ScaleBounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// One generated questionnaire item.
///
/// Field names on the wire follow the backup document layout
/// (`question_id`, `question_type`, `question`, `description`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionRecord {
    pub section: String,
    #[serde(rename = "question_id")]
    pub id: String,
    #[serde(rename = "question_type")]
    pub kind: QuestionType,
    #[serde(rename = "question")]
    pub prompt: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleBounds>,
    #[serde(
        default,
        rename = "description",
        skip_serializing_if = "Option::is_none"
    )]
    pub help_text: Option<String>,
}

impl QuestionRecord {
    pub fn is_choice(&self) -> bool {
        matches!(self.kind, QuestionType::SingleChoice)
    }
}
