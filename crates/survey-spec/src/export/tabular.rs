use serde::Serialize;

use crate::error::ExportError;
use crate::spec::{question::QuestionRecord, schema::Schema};

/// Joins the options of a choice question into one cell.
pub const OPTION_DELIMITER: char = '|';

/// Column titles of the tabular export, in order.
pub const TABULAR_HEADER: [&str; 9] = [
    "Section",
    "Question_ID",
    "Question_Type",
    "Question_Text",
    "Required",
    "Options",
    "Scale_Min",
    "Scale_Max",
    "Description",
];

/// One spreadsheet row describing a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabularRow {
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Question_ID")]
    pub question_id: String,
    #[serde(rename = "Question_Type")]
    pub question_type: String,
    #[serde(rename = "Question_Text")]
    pub question_text: String,
    #[serde(rename = "Required")]
    pub required: String,
    #[serde(rename = "Options")]
    pub options: String,
    #[serde(rename = "Scale_Min")]
    pub scale_min: Option<u32>,
    #[serde(rename = "Scale_Max")]
    pub scale_max: Option<u32>,
    #[serde(rename = "Description")]
    pub description: String,
}

impl TabularRow {
    fn from_record(record: &QuestionRecord) -> Result<Self, ExportError> {
        Ok(Self {
            section: record.section.clone(),
            question_id: record.id.clone(),
            question_type: record.kind.as_str().to_string(),
            question_text: record.prompt.clone(),
            required: if record.required { "Yes" } else { "No" }.to_string(),
            options: join_options(record)?,
            scale_min: record.scale.map(|scale| scale.min),
            scale_max: record.scale.map(|scale| scale.max),
            description: record.help_text.clone().unwrap_or_default(),
        })
    }

    pub fn is_required(&self) -> bool {
        self.required == "Yes"
    }
}

fn join_options(record: &QuestionRecord) -> Result<String, ExportError> {
    if let Some(option) = record
        .options
        .iter()
        .find(|option| option.contains(OPTION_DELIMITER))
    {
        return Err(ExportError::DelimiterCollision {
            question_id: record.id.clone(),
            option: option.clone(),
            delimiter: OPTION_DELIMITER,
        });
    }
    let delimiter = OPTION_DELIMITER.to_string();
    Ok(record.options.join(delimiter.as_str()))
}

/// One row per question, canonical order.
pub fn tabular_rows(schema: &Schema) -> Result<Vec<TabularRow>, ExportError> {
    schema.questions.iter().map(TabularRow::from_record).collect()
}

/// Render rows as CSV text with the header line first.
pub fn render_tabular(rows: &[TabularRow]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(TABULAR_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
