use duty_roster::{PostAlias, VocabularyTables};
use snafu::ResultExt;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use crate::fairness::{DfResult, OpeningJsonSnafu, ParsingJsonSnafu};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSettings {
    pub folder: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "skipUnreadable")]
    pub skip_unreadable: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    #[serde(rename = "breakdownOrder")]
    pub breakdown_order: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    pub alias: String,
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DfConfig {
    #[serde(rename = "inputSettings")]
    pub input_settings: Option<InputSettings>,
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    pub posts: Option<Vec<PostConfig>>,
    #[serde(rename = "rankTokens")]
    pub rank_tokens: Option<Vec<String>>,
}

impl DfConfig {
    /// The configured vocabulary. Each table missing from the configuration
    /// falls back to the builtin one.
    pub fn vocabulary_tables(&self) -> VocabularyTables {
        let builtin = VocabularyTables::builtin();
        VocabularyTables {
            posts: match &self.posts {
                Some(posts) => posts
                    .iter()
                    .map(|p| PostAlias {
                        alias: p.alias.clone(),
                        name: p.name.clone(),
                    })
                    .collect(),
                None => builtin.posts,
            },
            rank_tokens: self.rank_tokens.clone().unwrap_or(builtin.rank_tokens),
        }
    }
}

pub fn read_config(path: &str) -> DfResult<DfConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn read_summary(path: &str) -> DfResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_builtin_tables() {
        let config: DfConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DfConfig::default());
        assert_eq!(config.vocabulary_tables(), VocabularyTables::builtin());
    }

    #[test]
    fn partial_vocabulary() {
        let config: DfConfig =
            serde_json::from_str(r#"{ "rankTokens": ["RECRUTA"], "outputSettings": {} }"#).unwrap();
        let tables = config.vocabulary_tables();
        assert_eq!(tables.rank_tokens, vec!["RECRUTA".to_string()]);
        assert_eq!(tables.posts, VocabularyTables::builtin().posts);
        assert_eq!(config.output_settings, Some(OutputSettings::default()));
    }
}
