use crate::error::{BundleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic kind of a file within a Transformers bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Config,
    Tokenizer,
    TokenizerConfig,
    Vocabulary,
}

impl Role {
    /// All roles, in assembly order
    pub const ALL: [Role; 4] = [
        Role::Config,
        Role::Tokenizer,
        Role::TokenizerConfig,
        Role::Vocabulary,
    ];

    /// Conventional file name of a file playing this role
    pub fn file_name(self) -> &'static str {
        match self {
            Role::Config => "config.json",
            Role::Tokenizer => "tokenizer.json",
            Role::TokenizerConfig => "tokenizer_config.json",
            Role::Vocabulary => "vocab.json",
        }
    }

    /// Format tag a host attaches to a context of this role
    pub fn format_tag(self) -> &'static str {
        match self {
            Role::Config => "transformers.config",
            Role::Tokenizer => "transformers.tokenizer",
            Role::TokenizerConfig => "transformers.tokenizer.config",
            Role::Vocabulary => "transformers.vocab",
        }
    }

    /// Parse a host format tag
    pub fn from_format_tag(tag: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.format_tag() == tag)
            .ok_or_else(|| BundleError::UnsupportedFormat(tag.to_string()))
    }

    /// Role implied by a conventional file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.file_name() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Config => "config",
            Role::Tokenizer => "tokenizer",
            Role::TokenizerConfig => "tokenizer-config",
            Role::Vocabulary => "vocabulary",
        }
    }

    /// Roles whose files are probed when `self` anchors the bundle
    pub fn siblings(self) -> [Role; 3] {
        match self {
            Role::Config => [Role::Tokenizer, Role::TokenizerConfig, Role::Vocabulary],
            Role::Tokenizer => [Role::Config, Role::TokenizerConfig, Role::Vocabulary],
            Role::TokenizerConfig => [Role::Config, Role::Tokenizer, Role::Vocabulary],
            Role::Vocabulary => [Role::Config, Role::Tokenizer, Role::TokenizerConfig],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .map_or_else(|| Role::from_format_tag(s), Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_format_tag(role.format_tag()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_format_tag() {
        let err = Role::from_format_tag("safetensors.json").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported Transformers format 'safetensors.json'."
        );
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(Role::from_file_name("vocab.json"), Some(Role::Vocabulary));
        assert_eq!(
            Role::from_file_name("tokenizer_config.json"),
            Some(Role::TokenizerConfig)
        );
        assert_eq!(Role::from_file_name("merges.txt"), None);
    }

    #[test]
    fn test_siblings_exclude_self() {
        for role in Role::ALL {
            assert!(!role.siblings().contains(&role));
        }
        assert_eq!(
            Role::Tokenizer.siblings(),
            [Role::Config, Role::TokenizerConfig, Role::Vocabulary]
        );
    }

    #[test]
    fn test_from_str_accepts_names_and_tags() {
        assert_eq!("tokenizer-config".parse::<Role>().unwrap(), Role::TokenizerConfig);
        assert_eq!("transformers.vocab".parse::<Role>().unwrap(), Role::Vocabulary);
        assert!("graph".parse::<Role>().is_err());
    }
}
