use std::{collections::BTreeSet, fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::prefill::FormRegistry;
use crate::spec::rules::RuleSet;
use crate::validate::DEFAULT_REQUIRED_FIELDS;

/// Static data the core reads but never writes.
///
/// Every key is optional in a config file; missing keys fall back to the
/// built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default = "RuleSet::standard")]
    pub rules: RuleSet,
    #[serde(default = "FormRegistry::standard")]
    pub forms: FormRegistry,
    #[serde(default = "default_required_fields")]
    pub required_fields: BTreeSet<String>,
}

fn default_required_fields() -> BTreeSet<String> {
    DEFAULT_REQUIRED_FIELDS
        .iter()
        .map(|field| field.to_string())
        .collect()
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::standard(),
            forms: FormRegistry::standard(),
            required_fields: default_required_fields(),
        }
    }
}

impl SurveyConfig {
    /// Parse a JSON config and check its rule tables.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SurveyConfig =
            serde_json::from_str(contents).map_err(ConfigError::ParseInline)?;
        config.rules.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("loading survey config from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SurveyConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.rules.check()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise use the built-in tables.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
