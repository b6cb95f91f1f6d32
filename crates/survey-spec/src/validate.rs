use crate::prefill::Answers;

/// Fields every respondent must supply before a prefill link is built.
pub const DEFAULT_REQUIRED_FIELDS: [&str; 3] = ["name", "email", "code"];

/// True when every required field is present with a non-blank value.
pub fn validate_required<I, S>(answers: &Answers, required_fields: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    required_fields
        .into_iter()
        .all(|field| is_filled(answers, field.as_ref()))
}

/// Required fields that are absent or blank, sorted and deduplicated.
pub fn missing_required<I, S>(answers: &Answers, required_fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut missing = required_fields
        .into_iter()
        .map(|field| field.as_ref().to_string())
        .filter(|field| !is_filled(answers, field))
        .collect::<Vec<_>>();
    missing.sort();
    missing.dedup();
    missing
}

fn is_filled(answers: &Answers, field: &str) -> bool {
    answers
        .get(field)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false)
}
