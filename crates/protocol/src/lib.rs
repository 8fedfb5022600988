use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FORMAT_TRANSFORMERS: &str = "Transformers";
pub const FORMAT_TRANSFORMERS_TOKENIZER: &str = "Transformers Tokenizer";
pub const FORMAT_TRANSFORMERS_VOCABULARY: &str = "Transformers Vocabulary";

/// A single metadata entry taken from a config file's top level.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct GraphModule {
    pub name: String,
    #[serde(default)]
    pub metadata: Vec<Argument>,
}

impl GraphModule {
    /// Builds a graph module whose metadata mirrors the config object's own
    /// top-level fields, in document order. Non-object values carry no metadata.
    pub fn from_config(name: impl Into<String>, config: &Value) -> Self {
        let metadata = config
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .map(|(key, value)| Argument::new(key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: name.into(),
            metadata,
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.metadata
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct TokenizerModule {
    pub name: String,
}

impl TokenizerModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct VocabularyModule {
    pub name: String,
}

impl VocabularyModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Graph,
    Tokenizer,
    Vocabulary,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Module {
    Graph(GraphModule),
    Tokenizer(TokenizerModule),
    Vocabulary(VocabularyModule),
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Graph(_) => ModuleKind::Graph,
            Module::Tokenizer(_) => ModuleKind::Tokenizer,
            Module::Vocabulary(_) => ModuleKind::Vocabulary,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Module::Graph(module) => &module.name,
            Module::Tokenizer(module) => &module.name,
            Module::Vocabulary(module) => &module.name,
        }
    }
}

/// One logical model assembled from a bundle of sibling files.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct CompositeModel {
    pub format: String,
    pub modules: Vec<Module>,
    /// Identifiers of every file absorbed into this model, in role order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl CompositeModel {
    pub fn graph(&self) -> Option<&GraphModule> {
        self.modules.iter().find_map(|module| match module {
            Module::Graph(graph) => Some(graph),
            _ => None,
        })
    }

    pub fn tokenizer(&self) -> Option<&TokenizerModule> {
        self.modules.iter().find_map(|module| match module {
            Module::Tokenizer(tokenizer) => Some(tokenizer),
            _ => None,
        })
    }

    pub fn vocabulary(&self) -> Option<&VocabularyModule> {
        self.modules.iter().find_map(|module| match module {
            Module::Vocabulary(vocabulary) => Some(vocabulary),
            _ => None,
        })
    }

    pub fn kinds(&self) -> Vec<ModuleKind> {
        self.modules.iter().map(Module::kind).collect()
    }

    pub fn absorbs(&self, identifier: &str) -> bool {
        self.sources.iter().any(|source| source == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn graph_metadata_keeps_document_order() {
        let config: Value = serde_json::from_str(
            r#"{"vocab_size": 50257, "architectures": ["GPT2LMHeadModel"], "model_type": "gpt2"}"#,
        )
        .unwrap();
        let graph = GraphModule::from_config("config.json", &config);

        let names: Vec<&str> = graph.metadata.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["vocab_size", "architectures", "model_type"]);
        assert_eq!(graph.argument("model_type"), Some(&json!("gpt2")));
    }

    #[test]
    fn graph_from_non_object_has_no_metadata() {
        let graph = GraphModule::from_config("config.json", &json!([1, 2, 3]));
        assert!(graph.metadata.is_empty());
    }

    #[test]
    fn modules_serialize_with_type_tag() {
        let model = CompositeModel {
            format: FORMAT_TRANSFORMERS_TOKENIZER.to_string(),
            modules: vec![Module::Tokenizer(TokenizerModule::new("tokenizer.json"))],
            sources: Vec::new(),
        };
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value,
            json!({
                "format": "Transformers Tokenizer",
                "modules": [{"type": "tokenizer", "name": "tokenizer.json"}]
            })
        );

        let back: CompositeModel = serde_json::from_value(value).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn accessors_find_modules_by_kind() {
        let model = CompositeModel {
            format: FORMAT_TRANSFORMERS.to_string(),
            modules: vec![
                Module::Graph(GraphModule::from_config("config.json", &json!({}))),
                Module::Vocabulary(VocabularyModule::new("vocab.json")),
            ],
            sources: vec!["config.json".to_string(), "vocab.json".to_string()],
        };
        assert_eq!(model.kinds(), vec![ModuleKind::Graph, ModuleKind::Vocabulary]);
        assert!(model.tokenizer().is_none());
        assert_eq!(model.vocabulary().map(|v| v.name.as_str()), Some("vocab.json"));
        assert!(model.absorbs("vocab.json"));
        assert!(!model.absorbs("tokenizer.json"));
    }
}
