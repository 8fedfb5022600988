use crate::error::{BundleError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Encodings a context can be speculatively decoded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    Json,
}

/// Host-provided handle to one file.
///
/// `peek` never fails: content that does not decode in the requested format is
/// reported as `None`. `fetch` resolves a sibling relative to this file's
/// directory and may fail; callers decide whether that failure matters.
#[async_trait]
pub trait ModelContext: Send + Sync {
    /// File name of this context
    fn identifier(&self) -> &str;

    /// Decode the content in `format`, caching the result
    async fn peek(&self, format: ContentFormat) -> Option<Arc<Value>>;

    /// Open a file next to this one
    async fn fetch(&self, name: &str) -> Result<Box<dyn ModelContext>>;
}

/// Sibling names are plain file names; anything that would leave the
/// directory is rejected before touching storage.
fn validate_sibling_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(BundleError::InvalidName(name.to_string())),
    }
}

fn decode_json(identifier: &str, bytes: &[u8]) -> Option<Arc<Value>> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Some(Arc::new(value)),
        Err(err) => {
            log::debug!("'{identifier}' is not JSON: {err}");
            None
        }
    }
}

/// A file on the local file system
pub struct FsContext {
    path: PathBuf,
    identifier: String,
    json: OnceCell<Option<Arc<Value>>>,
}

impl FsContext {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let identifier = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            identifier,
            json: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory siblings are fetched from
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    async fn read_json(&self) -> Option<Arc<Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => decode_json(&self.identifier, &bytes),
            Err(err) => {
                log::debug!("Failed to read {}: {err}", self.path.display());
                None
            }
        }
    }
}

#[async_trait]
impl ModelContext for FsContext {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn peek(&self, format: ContentFormat) -> Option<Arc<Value>> {
        match format {
            ContentFormat::Json => self.json.get_or_init(|| self.read_json()).await.clone(),
        }
    }

    async fn fetch(&self, name: &str) -> Result<Box<dyn ModelContext>> {
        validate_sibling_name(name)?;
        let path = self.directory().join(name);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(BundleError::not_found(path.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        if !metadata.is_file() {
            return Err(BundleError::not_found(path.display().to_string()));
        }
        Ok(Box::new(FsContext::new(path)))
    }
}

/// A flat, in-memory directory of named files, for archive-backed hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    files: Arc<BTreeMap<String, Arc<[u8]>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Arc::make_mut(&mut self.files).insert(name.into(), Arc::from(bytes));
        self
    }

    pub fn with_json(self, name: impl Into<String>, value: &Value) -> Self {
        self.with_file(name, value.to_string())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn open(&self, name: &str) -> Result<MemoryContext> {
        let bytes = self
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| BundleError::not_found(name))?;
        Ok(MemoryContext {
            directory: self.clone(),
            identifier: name.to_string(),
            bytes,
            json: OnceCell::new(),
        })
    }
}

/// One file of a [`MemoryDirectory`]
pub struct MemoryContext {
    directory: MemoryDirectory,
    identifier: String,
    bytes: Arc<[u8]>,
    json: OnceCell<Option<Arc<Value>>>,
}

#[async_trait]
impl ModelContext for MemoryContext {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn peek(&self, format: ContentFormat) -> Option<Arc<Value>> {
        match format {
            ContentFormat::Json => self
                .json
                .get_or_init(|| async { decode_json(&self.identifier, &self.bytes) })
                .await
                .clone(),
        }
    }

    async fn fetch(&self, name: &str) -> Result<Box<dyn ModelContext>> {
        validate_sibling_name(name)?;
        Ok(Box::new(self.directory.open(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_name_validation() {
        assert!(validate_sibling_name("vocab.json").is_ok());
        assert!(validate_sibling_name("../vocab.json").is_err());
        assert!(validate_sibling_name("nested/vocab.json").is_err());
        assert!(validate_sibling_name("/etc/passwd").is_err());
        assert!(validate_sibling_name("").is_err());
    }

    #[tokio::test]
    async fn test_fs_context_peeks_and_fetches() {
        let temp = TempDir::new().expect("tempdir");
        tokio::fs::write(temp.path().join("config.json"), r#"{"model_type":"bert"}"#)
            .await
            .expect("write config");
        tokio::fs::write(temp.path().join("vocab.json"), "not json")
            .await
            .expect("write vocab");

        let context = FsContext::new(temp.path().join("config.json"));
        assert_eq!(context.identifier(), "config.json");
        let value = context.peek(ContentFormat::Json).await.expect("json");
        assert_eq!(*value, json!({"model_type": "bert"}));

        let vocab = context.fetch("vocab.json").await.expect("fetch vocab");
        assert_eq!(vocab.identifier(), "vocab.json");
        assert!(vocab.peek(ContentFormat::Json).await.is_none());

        let missing = context.fetch("tokenizer.json").await;
        assert!(matches!(missing, Err(BundleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fs_context_rejects_directories() {
        let temp = TempDir::new().expect("tempdir");
        tokio::fs::create_dir(temp.path().join("tokenizer.json"))
            .await
            .expect("mkdir");
        tokio::fs::write(temp.path().join("config.json"), "{}")
            .await
            .expect("write config");

        let context = FsContext::new(temp.path().join("config.json"));
        assert!(context.fetch("tokenizer.json").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_directory_fetches_siblings() {
        let directory = MemoryDirectory::new()
            .with_json("config.json", &json!({"model_type": "gpt2"}))
            .with_file("vocab.json", "{broken");

        let names: Vec<&str> = directory.names().collect();
        assert_eq!(names, vec!["config.json", "vocab.json"]);

        let context = directory.open("config.json").expect("open");
        let vocab = context.fetch("vocab.json").await.expect("fetch");
        assert!(vocab.peek(ContentFormat::Json).await.is_none());
        assert!(context.fetch("tokenizer.json").await.is_err());
    }
}
