use crate::config::ResolverConfig;
use crate::context::{ContentFormat, ModelContext};
use crate::role::Role;
use serde_json::{Map, Value};
use std::sync::Arc;

/// `vocab.json` objects at or below this many keys are auxiliary maps
pub const DEFAULT_VOCABULARY_KEY_THRESHOLD: usize = 256;

/// A context whose content has been decoded and assigned a role
#[derive(Debug, Clone, PartialEq)]
pub struct BundleFile {
    pub identifier: String,
    pub role: Role,
    pub value: Arc<Value>,
}

impl BundleFile {
    pub fn new(identifier: impl Into<String>, role: Role, value: Arc<Value>) -> Self {
        Self {
            identifier: identifier.into(),
            role,
            value,
        }
    }
}

/// What a shape predicate gets to look at
struct ShapeProbe<'a> {
    identifier: &'a str,
    object: &'a Map<String, Value>,
    vocabulary_key_threshold: usize,
}

impl ShapeProbe<'_> {
    fn has(&self, key: &str) -> bool {
        self.object.get(key).is_some_and(is_truthy)
    }

    fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.has(key))
    }
}

/// Field presence counts only for values that are not null, false, zero or "".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_config_shape(probe: &ShapeProbe<'_>) -> bool {
    probe.has_all(&["model_type", "architectures"])
}

fn is_tokenizer_shape(probe: &ShapeProbe<'_>) -> bool {
    probe.has_all(&["version", "added_tokens", "model"])
}

fn is_tokenizer_config_shape(probe: &ShapeProbe<'_>) -> bool {
    probe.has("tokenizer_class")
        || probe.has_all(&["bos_token", "eos_token", "unk_token"])
        || probe.has_all(&["pad_token", "additional_special_tokens"])
        || probe.has("special_tokens_map_file")
        || probe.has("full_tokenizer_file")
}

fn is_vocabulary_shape(probe: &ShapeProbe<'_>) -> bool {
    probe.identifier == Role::Vocabulary.file_name()
        && probe.object.len() > probe.vocabulary_key_threshold
}

type ShapePredicate = fn(&ShapeProbe<'_>) -> bool;

/// Evaluated top to bottom; the first match wins because the shapes overlap.
const SHAPE_RULES: [(Role, ShapePredicate); 4] = [
    (Role::Config, is_config_shape),
    (Role::Tokenizer, is_tokenizer_shape),
    (Role::TokenizerConfig, is_tokenizer_config_shape),
    (Role::Vocabulary, is_vocabulary_shape),
];

/// Assigns bundle roles from content shape alone
#[derive(Debug, Clone)]
pub struct Classifier {
    vocabulary_key_threshold: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            vocabulary_key_threshold: DEFAULT_VOCABULARY_KEY_THRESHOLD,
        }
    }
}

impl Classifier {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            vocabulary_key_threshold: config.vocabulary_key_threshold,
        }
    }

    /// Role of a decoded document named `identifier`, if it has a known shape
    pub fn classify(&self, identifier: &str, value: &Value) -> Option<Role> {
        let object = value.as_object()?;
        let probe = ShapeProbe {
            identifier,
            object,
            vocabulary_key_threshold: self.vocabulary_key_threshold,
        };
        SHAPE_RULES
            .iter()
            .find(|(_, matches)| matches(&probe))
            .map(|(role, _)| *role)
    }

    /// Peek `context` as JSON and classify it
    pub async fn classify_context(&self, context: &dyn ModelContext) -> Option<BundleFile> {
        let value = context.peek(ContentFormat::Json).await?;
        let role = self.classify(context.identifier(), &value)?;
        Some(BundleFile::new(context.identifier(), role, value))
    }
}

/// Classify with the default vocabulary threshold
pub fn classify(identifier: &str, value: &Value) -> Option<Role> {
    Classifier::default().classify(identifier, value)
}
