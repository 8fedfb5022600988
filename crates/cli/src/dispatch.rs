use crate::report::BundleReport;
use crate::scan::DirectoryBatch;
use bundle_resolver::{BundleFilter, BundleResolver, Classifier, CompositeModel, FsContext};

/// Host dispatch loop: visits every candidate file and reports each
/// independent bundle once.
pub struct Dispatcher {
    classifier: Classifier,
    filter: BundleFilter,
    resolver: BundleResolver,
}

impl Dispatcher {
    pub fn new(resolver: BundleResolver) -> Self {
        Self {
            classifier: resolver.classifier().clone(),
            filter: BundleFilter::new(resolver.config()),
            resolver,
        }
    }

    pub async fn dispatch(&self, batches: &[DirectoryBatch]) -> Vec<BundleReport> {
        let mut reports = Vec::new();
        for batch in batches {
            reports.extend(self.dispatch_directory(batch).await);
        }
        log::info!("Resolved {} bundles", reports.len());
        reports
    }

    async fn dispatch_directory(&self, batch: &DirectoryBatch) -> Vec<BundleReport> {
        let mut resolved: Vec<CompositeModel> = Vec::new();
        let mut reports = Vec::new();

        for path in &batch.files {
            let context = FsContext::new(path);
            let Some(anchor) = self.classifier.classify_context(&context).await else {
                log::debug!("Skipping {}: no bundle shape", path.display());
                continue;
            };
            let identifier = anchor.identifier.clone();
            if resolved.iter().any(|model| model.absorbs(&identifier)) {
                log::debug!("Skipping {}: already part of a bundle", path.display());
                continue;
            }
            if !self.filter.is_independent_bundle(&context, anchor.role).await {
                continue;
            }

            let role = anchor.role;
            match self.resolver.resolve_anchor(anchor, &context).await {
                Ok(model) => {
                    reports.push(BundleReport {
                        directory: batch.directory.display().to_string(),
                        anchor: identifier,
                        role: role.to_string(),
                        model: model.clone(),
                    });
                    resolved.push(model);
                }
                Err(err) => log::warn!("Failed to resolve bundle at {}: {err}", path.display()),
            }
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn batch(dir: &std::path::Path, names: &[&str]) -> DirectoryBatch {
        DirectoryBatch {
            directory: dir.to_path_buf(),
            files: names.iter().map(|name| dir.join(name)).collect(),
        }
    }

    #[tokio::test]
    async fn tokenizer_pair_without_config_is_reported_once() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("tokenizer.json"),
            json!({"version": "1.0", "added_tokens": [], "model": {}}).to_string(),
        )
        .unwrap();
        fs::write(
            temp.path().join("tokenizer_config.json"),
            json!({"tokenizer_class": "BertTokenizer"}).to_string(),
        )
        .unwrap();

        let dispatcher = Dispatcher::new(BundleResolver::default());
        let reports = dispatcher
            .dispatch(&[batch(
                temp.path(),
                &["tokenizer.json", "tokenizer_config.json"],
            )])
            .await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].anchor, "tokenizer.json");
        assert_eq!(reports[0].role, "tokenizer");
        assert_eq!(
            reports[0].model.sources,
            vec!["tokenizer.json", "tokenizer_config.json"]
        );
    }

    #[tokio::test]
    async fn config_directory_yields_single_report_in_any_order() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.json"),
            json!({"model_type": "bert", "architectures": ["BertModel"]}).to_string(),
        )
        .unwrap();
        fs::write(
            temp.path().join("tokenizer_config.json"),
            json!({"pad_token": "[PAD]", "additional_special_tokens": []}).to_string(),
        )
        .unwrap();

        let dispatcher = Dispatcher::new(BundleResolver::default());
        for names in [
            ["tokenizer_config.json", "config.json"],
            ["config.json", "tokenizer_config.json"],
        ] {
            let reports = dispatcher.dispatch(&[batch(temp.path(), &names)]).await;
            assert_eq!(reports.len(), 1);
            assert_eq!(reports[0].anchor, "config.json");
            assert_eq!(reports[0].model.format, "Transformers");
        }
    }
}
