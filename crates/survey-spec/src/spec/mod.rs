pub mod question;
pub mod rules;
pub mod schema;

pub use question::{QuestionRecord, QuestionType, ScaleBounds};
pub use rules::{
    GroupDescriptor, IdScheme, OptionSource, RuleSet, SKILL_PLACEHOLDER, SectionRule,
    SectionTemplate, SkillDescriptor, SkillSection, TemplateQuestion,
};
pub use schema::{Schema, SchemaMetadata, SectionCount};
