#![allow(missing_docs)]

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod prefill;
pub mod spec;
pub mod validate;

pub use builder::{build, build_at};
pub use config::SurveyConfig;
pub use error::{BuildError, ConfigError, ExportError, LinkError};
pub use export::{
    ArtifactKind, ArtifactOutcome, BackupDocument, ExportBundle, ExportReport, TabularRow,
    backup_json_schema, export, parse_backup, render_backup, render_summary, render_tabular,
    write_all,
};
pub use prefill::{Answers, FormDescriptor, FormRegistry, build_prefill_link};
pub use spec::{
    GroupDescriptor, IdScheme, OptionSource, QuestionRecord, QuestionType, RuleSet, ScaleBounds,
    Schema, SchemaMetadata, SectionCount, SectionRule, SectionTemplate, SkillDescriptor,
    SkillSection, TemplateQuestion,
};
pub use validate::{DEFAULT_REQUIRED_FIELDS, missing_required, validate_required};
