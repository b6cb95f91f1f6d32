use std::collections::BTreeMap;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LinkError;

/// Local field name to submitted value.
pub type Answers = BTreeMap<String, String>;

/// Query marker that switches the hosted form into prefill mode.
pub const PREFILL_MARKER: &str = "usp=pp_url";

/// A hosted third-party form and its opaque entry identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormDescriptor {
    pub base_url: String,
    /// Public short link, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub field_entry_map: BTreeMap<String, String>,
}

impl FormDescriptor {
    pub fn new(base_url: &str, fields: &[(&str, &str)]) -> Self {
        Self {
            base_url: base_url.into(),
            share_url: None,
            field_entry_map: fields
                .iter()
                .map(|(field, entry)| (field.to_string(), entry.to_string()))
                .collect(),
        }
    }

    pub fn entry_id(&self, field: &str) -> Option<&str> {
        self.field_entry_map.get(field).map(String::as_str)
    }
}

/// Build `<base_url>?usp=pp_url&entry.<id>=<value>...` for the recognized answers.
///
/// Unknown answer keys are skipped. Values are percent-encoded; empty values are kept.
pub fn build_prefill_link(form: &FormDescriptor, answers: &Answers) -> String {
    let mut url = format!("{}?{}", form.base_url, PREFILL_MARKER);
    for (field, value) in answers {
        match form.entry_id(field) {
            Some(entry) => {
                url.push_str(&format!("&entry.{}={}", entry, urlencoding::encode(value)));
            }
            None => debug!("skipping field '{}' unknown to the form", field),
        }
    }
    url
}

/// Forms addressable by identifier ("a", "b", ...). Identifiers are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FormRegistry {
    forms: BTreeMap<String, FormDescriptor>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Employee information form (A) and skill survey form (B).
    pub fn standard() -> Self {
        let mut registry = Self::new();

        let mut form_a = FormDescriptor::new(
            "https://docs.google.com/forms/d/e/1FAIpQLSfhk-cfvPrDlpRONfmdDo6L6w1N5UhdgAZecmYLmZNDcXw9HQ/viewform",
            &[
                ("name", "1704172586"),
                ("code", "1184622690"),
                ("position", "1121817413"),
                ("department", "1727774632"),
                ("email", "875025279"),
            ],
        );
        form_a.share_url = Some("https://forms.gle/Y6fYUHbRcMP2jfHH7".into());
        registry.insert("a", form_a);

        let mut form_b = FormDescriptor::new(
            "https://docs.google.com/forms/d/e/1FAIpQLSepXF4C3-dUrmoeBrW4e8v2re4DxsAyiboqc1yI-2VOvjVSiw/viewform",
            &[
                ("name", "1519666825"),
                ("email", "570205598"),
                ("code", "870287758"),
                ("gender", "2096138668"),
                ("dob", "1655662338"),
                ("location", "1894722077"),
                ("education", "712912742"),
                ("department", "1741978684"),
            ],
        );
        form_b.share_url = Some("https://forms.gle/iMUPkrUWnxpdsJHu5".into());
        registry.insert("b", form_b);

        registry
    }

    pub fn insert(&mut self, id: &str, form: FormDescriptor) -> Option<FormDescriptor> {
        self.forms.insert(normalize_id(id), form)
    }

    pub fn get(&self, id: &str) -> Option<&FormDescriptor> {
        self.forms.get(&normalize_id(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    /// Resolve `id` and build its prefill link.
    pub fn prefill_link(&self, id: &str, answers: &Answers) -> Result<String, LinkError> {
        let form = self
            .get(id)
            .ok_or_else(|| LinkError::UnknownForm(id.to_string()))?;
        Ok(build_prefill_link(form, answers))
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}
