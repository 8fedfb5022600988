use crate::classifier::Classifier;
use crate::config::ResolverConfig;
use crate::context::ModelContext;
use crate::resolver::fetch_classified;
use crate::role::Role;

/// Decides whether a classified file may anchor a bundle of its own.
///
/// `config.json` is the designated anchor. Tokenizer, tokenizer config and
/// vocabulary files sitting next to a real config are absorbed by the
/// config-anchored bundle, so reporting them separately would duplicate it.
#[derive(Debug, Clone, Default)]
pub struct BundleFilter {
    classifier: Classifier,
}

impl BundleFilter {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            classifier: Classifier::new(config),
        }
    }

    pub async fn is_independent_bundle(&self, context: &dyn ModelContext, candidate: Role) -> bool {
        if candidate == Role::Config {
            return true;
        }
        match fetch_classified(&self.classifier, context, Role::Config.file_name()).await {
            Ok(config) if config.role == Role::Config => {
                log::debug!(
                    "Suppressing '{}' as {candidate}: absorbed by '{}'",
                    context.identifier(),
                    config.identifier
                );
                false
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MemoryDirectory;
    use serde_json::json;

    fn config() -> serde_json::Value {
        json!({"model_type": "llama", "architectures": ["LlamaForCausalLM"]})
    }

    #[tokio::test]
    async fn test_config_is_always_independent() {
        let directory = MemoryDirectory::new().with_json("config.json", &config());
        let context = directory.open("config.json").unwrap();
        assert!(
            BundleFilter::default()
                .is_independent_bundle(&context, Role::Config)
                .await
        );
    }

    #[tokio::test]
    async fn test_siblings_of_a_config_are_suppressed() {
        let directory = MemoryDirectory::new()
            .with_json("config.json", &config())
            .with_json("tokenizer_config.json", &json!({"tokenizer_class": "LlamaTokenizer"}));
        let context = directory.open("tokenizer_config.json").unwrap();
        let filter = BundleFilter::default();

        for role in [Role::Tokenizer, Role::TokenizerConfig, Role::Vocabulary] {
            assert!(!filter.is_independent_bundle(&context, role).await);
        }
    }

    #[tokio::test]
    async fn test_config_json_without_config_shape_does_not_suppress() {
        let directory = MemoryDirectory::new()
            .with_json("config.json", &json!({"hidden_size": 4096}))
            .with_json("tokenizer_config.json", &json!({"tokenizer_class": "LlamaTokenizer"}));
        let context = directory.open("tokenizer_config.json").unwrap();

        assert!(
            BundleFilter::default()
                .is_independent_bundle(&context, Role::TokenizerConfig)
                .await
        );
    }

    #[tokio::test]
    async fn test_lone_file_is_independent() {
        let directory = MemoryDirectory::new()
            .with_json("tokenizer_config.json", &json!({"tokenizer_class": "LlamaTokenizer"}));
        let context = directory.open("tokenizer_config.json").unwrap();

        assert!(
            BundleFilter::default()
                .is_independent_bundle(&context, Role::TokenizerConfig)
                .await
        );
    }
}
