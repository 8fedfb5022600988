use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON files of one directory, in name order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryBatch {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Collects candidate bundle files from the paths given on the command line
pub struct BundleScanner {
    roots: Vec<PathBuf>,
}

impl BundleScanner {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Walk every root (.gitignore aware) and group JSON files per directory.
    ///
    /// A root that is a file contributes just that file; its siblings are still
    /// reachable through fetch during resolution.
    pub fn scan(&self) -> Result<Vec<DirectoryBatch>> {
        let mut grouped: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

        for root in &self.roots {
            if root.is_file() {
                let directory = parent_dir(root);
                grouped.entry(directory).or_default().push(root.clone());
                continue;
            }
            if !root.is_dir() {
                bail!("Path does not exist: {}", root.display());
            }

            let mut builder = WalkBuilder::new(root);
            builder
                .hidden(true)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true);

            for result in builder.build() {
                match result {
                    Ok(entry) => {
                        let Some(file_type) = entry.file_type() else {
                            continue;
                        };
                        if !file_type.is_file() || !Self::is_json_file(entry.path()) {
                            continue;
                        }
                        let path = entry.path().to_path_buf();
                        grouped.entry(parent_dir(&path)).or_default().push(path);
                    }
                    Err(e) => log::warn!("Failed to read entry: {e}"),
                }
            }
        }

        let batches: Vec<DirectoryBatch> = grouped
            .into_iter()
            .map(|(directory, mut files)| {
                files.sort();
                files.dedup();
                DirectoryBatch { directory, files }
            })
            .collect();

        log::info!(
            "Found {} JSON files in {} directories",
            batches.iter().map(|batch| batch.files.len()).sum::<usize>(),
            batches.len()
        );
        Ok(batches)
    }

    fn is_json_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
