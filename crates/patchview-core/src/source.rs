use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ReadError;

/// Where a file's full content should come from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContentSource {
    /// The checked-out file on disk.
    WorkingTree,
    /// A committed revision, identified by whatever the host uses (hash, ref, ...).
    Revision(String),
}

/// Identity of the file a diff is shown for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub path: String,
    pub source: ContentSource,
}

impl FileKey {
    pub fn working_tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: ContentSource::WorkingTree,
        }
    }

    pub fn revision(path: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: ContentSource::Revision(rev.into()),
        }
    }
}

/// Asynchronous provider of a file's full post-change content.
#[async_trait]
pub trait FileContentSource: Send + Sync {
    async fn read_full_file(&self, key: &FileKey) -> Result<String, ReadError>;
}

/// Reads working-tree files relative to a root directory.
#[derive(Clone, Debug)]
pub struct WorkdirSource {
    root: PathBuf,
}

impl WorkdirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, ReadError> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(ReadError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileContentSource for WorkdirSource {
    async fn read_full_file(&self, key: &FileKey) -> Result<String, ReadError> {
        if let ContentSource::Revision(rev) = &key.source {
            return Err(ReadError::Unsupported(format!(
                "revision {rev} is not readable from a working tree"
            )));
        }
        let full = self.resolve(&key.path)?;
        debug!(path = %full.display(), "reading full file");
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ReadError::NotFound {
                path: key.path.clone(),
            }),
            Err(err) if err.kind() == ErrorKind::InvalidData => Err(ReadError::NotText {
                path: key.path.clone(),
            }),
            Err(source) => Err(ReadError::Io {
                path: key.path.clone(),
                source,
            }),
        }
    }
}

/// In-memory source, handy for hosts that already hold file contents.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<FileKey, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FileKey, content: impl Into<String>) {
        self.files.insert(key, content.into());
    }

    pub fn with(mut self, key: FileKey, content: impl Into<String>) -> Self {
        self.insert(key, content);
        self
    }
}

#[async_trait]
impl FileContentSource for MemorySource {
    async fn read_full_file(&self, key: &FileKey) -> Result<String, ReadError> {
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| ReadError::NotFound {
                path: key.path.clone(),
            })
    }
}

/// A full-file read issued for one selection.
///
/// The generation ties the eventual response back to the selection that asked for it, so a
/// late answer for a previous file can be recognized and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRequest {
    pub generation: u64,
    pub key: FileKey,
}

impl ReadRequest {
    pub async fn fetch(&self, source: &dyn FileContentSource) -> Result<String, ReadError> {
        source.read_full_file(&self.key).await
    }
}
