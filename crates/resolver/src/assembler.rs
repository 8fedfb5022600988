use crate::classifier::BundleFile;
use crate::error::{BundleError, Result};
use bundle_protocol::{
    CompositeModel, GraphModule, Module, TokenizerModule, VocabularyModule, FORMAT_TRANSFORMERS,
    FORMAT_TRANSFORMERS_TOKENIZER, FORMAT_TRANSFORMERS_VOCABULARY,
};

/// Build the composite model for whichever bundle files were found.
///
/// Modules come out as graph, tokenizer, vocabulary. The format label follows
/// the most authoritative file present.
pub fn assemble(
    config: Option<&BundleFile>,
    tokenizer: Option<&BundleFile>,
    tokenizer_config: Option<&BundleFile>,
    vocabulary: Option<&BundleFile>,
) -> Result<CompositeModel> {
    let format = if config.is_some() {
        FORMAT_TRANSFORMERS
    } else if tokenizer.is_some() || tokenizer_config.is_some() {
        FORMAT_TRANSFORMERS_TOKENIZER
    } else if vocabulary.is_some() {
        FORMAT_TRANSFORMERS_VOCABULARY
    } else {
        return Err(BundleError::EmptyBundle);
    };

    let mut modules = Vec::with_capacity(3);
    if let Some(config) = config {
        modules.push(Module::Graph(GraphModule::from_config(
            &config.identifier,
            &config.value,
        )));
    }
    if let Some(named) = tokenizer.or(tokenizer_config) {
        modules.push(Module::Tokenizer(TokenizerModule::new(&named.identifier)));
    }
    if let Some(vocabulary) = vocabulary {
        modules.push(Module::Vocabulary(VocabularyModule::new(&vocabulary.identifier)));
    }

    let mut sources: Vec<String> = Vec::new();
    for file in [config, tokenizer, tokenizer_config, vocabulary]
        .into_iter()
        .flatten()
    {
        if !sources.contains(&file.identifier) {
            sources.push(file.identifier.clone());
        }
    }

    Ok(CompositeModel {
        format: format.to_string(),
        modules,
        sources,
    })
}
