use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};

use crate::error::BuildError;
use crate::spec::{
    question::{QuestionRecord, QuestionType},
    rules::{IdScheme, OptionSource, RuleSet, SectionRule, SectionTemplate, SkillSection},
    schema::{Schema, SchemaMetadata, SectionCount, first_duplicate_id},
};

/// Expand the rule tables into a schema stamped with the current time.
pub fn build(rules: &RuleSet) -> Result<Schema, BuildError> {
    build_at(rules, Utc::now())
}

/// Expand the rule tables into a schema stamped with `generated_at`.
///
/// Question ids and order depend only on `rules`.
pub fn build_at(rules: &RuleSet, generated_at: DateTime<Utc>) -> Result<Schema, BuildError> {
    rules.check()?;

    let mut questions = Vec::new();
    let mut sections = Vec::with_capacity(rules.sections.len());
    for section in &rules.sections {
        let records = match section {
            SectionRule::Template(template) => expand_template(template, rules)?,
            SectionRule::Skills(skills) => expand_skills(skills, rules)?,
        };
        debug!(
            "expanded section '{}' into {} questions",
            section.name(),
            records.len()
        );
        sections.push(SectionCount {
            name: section.name().to_string(),
            backup_key: section.backup_key().to_string(),
            question_count: records.len(),
        });
        questions.extend(records);
    }

    ensure_unique_ids(&questions)?;

    let schema = Schema {
        metadata: SchemaMetadata {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_groups: rules.groups.len(),
            sections,
        },
        questions,
    };
    info!(
        "built schema with {} questions across {} sections",
        schema.len(),
        schema.metadata.sections.len()
    );
    Ok(schema)
}

fn expand_template(
    template: &SectionTemplate,
    rules: &RuleSet,
) -> Result<Vec<QuestionRecord>, BuildError> {
    template
        .questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let id = rules
                .id_scheme
                .format(&template.name, &template.id_prefix, idx + 1, "")?;
            let options = match question.options_from {
                Some(OptionSource::Groups) => group_options(rules),
                None => question.options.clone(),
            };
            Ok(QuestionRecord {
                section: template.name.clone(),
                id,
                kind: question.kind,
                prompt: question.prompt.clone(),
                required: question.required,
                options,
                scale: question.scale,
                help_text: question.help_text.clone(),
            })
        })
        .collect()
}

fn group_options(rules: &RuleSet) -> Vec<String> {
    rules
        .ordered_groups()
        .into_iter()
        .map(|group| group.position_label())
        .collect()
}

fn expand_skills(
    section: &SkillSection,
    rules: &RuleSet,
) -> Result<Vec<QuestionRecord>, BuildError> {
    let scheme: &IdScheme = &rules.id_scheme;
    let mut records = Vec::with_capacity(rules.skills.len() * 2);
    for (idx, skill) in rules.skills.iter().enumerate() {
        let position = idx + 1;
        records.push(QuestionRecord {
            section: section.name.clone(),
            id: scheme.format(&section.name, &section.id_prefix, position, "a")?,
            kind: QuestionType::LinearScale,
            prompt: section.rating_prompt_for(skill),
            required: true,
            options: Vec::new(),
            scale: Some(section.scale),
            help_text: Some(format!("{} {}", skill.description, section.rating_hint)),
        });
        records.push(QuestionRecord {
            section: section.name.clone(),
            id: scheme.format(&section.name, &section.id_prefix, position, "b")?,
            kind: QuestionType::Paragraph,
            prompt: section.evidence_prompt_for(skill),
            required: true,
            options: Vec::new(),
            scale: None,
            help_text: Some(section.evidence_help.clone()),
        });
    }
    Ok(records)
}

fn ensure_unique_ids(questions: &[QuestionRecord]) -> Result<(), BuildError> {
    match first_duplicate_id(questions) {
        Some(id) => Err(BuildError::DuplicateQuestionId(id.to_string())),
        None => Ok(()),
    }
}
