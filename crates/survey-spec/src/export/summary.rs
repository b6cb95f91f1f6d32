use handlebars::Handlebars;
use serde_json::json;

use crate::error::ExportError;
use crate::spec::schema::Schema;

const SUMMARY_TEMPLATE: &str = "\
SKILL SURVEY GENERATION SUMMARY

Generated at: {{generated_at}}
Professional groups: {{total_groups}}

Sections:
{{#each sections}}
- {{name}}: {{question_count}} questions
{{/each}}

Total questions: {{total_questions}}
";

/// Human-readable counts for a schema. Derived only.
pub fn render_summary(schema: &Schema) -> Result<String, ExportError> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry.set_strict_mode(true);
    registry.register_template_string("summary", SUMMARY_TEMPLATE)?;

    let data = json!({
        "generated_at": schema.metadata.generated_at,
        "total_groups": schema.metadata.total_groups,
        "sections": schema.metadata.sections,
        "total_questions": schema.len(),
    });
    Ok(registry.render("summary", &data)?)
}
