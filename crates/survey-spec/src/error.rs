use std::{io, path::PathBuf};

use thiserror::Error;

/// Defects in the static rule tables, detected before or while building.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("group table is empty")]
    NoGroups,
    #[error("skill list is empty")]
    NoSkills,
    #[error("duplicate group code '{0}'")]
    DuplicateGroupCode(String),
    #[error("duplicate group order index {0}")]
    DuplicateOrderIndex(u32),
    #[error("group '{code}' has order index {index} outside 1..={count}")]
    OrderIndexOutOfRange {
        code: String,
        index: u32,
        count: usize,
    },
    #[error("group code '{0}' must be alphanumeric")]
    InvalidGroupCode(String),
    #[error("duplicate skill '{0}'")]
    DuplicateSkill(String),
    #[error("{0} must not be blank")]
    Blank(String),
    #[error("duplicate section '{0}'")]
    DuplicateSection(String),
    #[error("section '{section}': {message}")]
    InvalidSection { section: String, message: String },
    #[error("id width must be between 1 and {max}, got {width}")]
    InvalidIdWidth { width: usize, max: usize },
    #[error("section '{section}' needs sequence number {sequence}, which does not fit in {width} digits")]
    SequenceOverflow {
        section: String,
        sequence: usize,
        width: usize,
    },
    #[error("duplicate question id '{0}'")]
    DuplicateQuestionId(String),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failures resolving a prefill link.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("form '{0}' is not configured")]
    UnknownForm(String),
}

/// Failures of a single export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("option '{option}' of question '{question_id}' contains the '{delimiter}' delimiter")]
    DelimiterCollision {
        question_id: String,
        option: String,
        delimiter: char,
    },
    #[error("csv encode error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("summary template error: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),
    #[error("summary render error: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("tabular output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid backup document: {0}")]
    InvalidBackup(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures loading a survey configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse config: {0}")]
    ParseInline(#[source] serde_json::Error),
    #[error("invalid rules: {0}")]
    Rules(#[from] BuildError),
}
