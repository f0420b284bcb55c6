//! Domain services.
//!
//! ARCHITECTURE
//! ============
//! Content services (blog, presentations, résumé) are loaded from disk once
//! at startup and are immutable afterwards. Stateful services (messages,
//! sessions) sit behind async traits so route handlers never see the
//! storage backend; the bundled implementations are in-memory.

pub mod blog;
pub mod messages;
pub mod policy;
pub mod presentations;
pub mod resume;
pub mod session;

use std::path::{Path, PathBuf};

use crate::multifrontmatter::DeserializationError;

/// Failure while loading a content document at startup.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: DeserializationError,
    },
    #[error("{}: invalid yaml: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

impl ContentError {
    pub(crate) fn invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::Invalid { path: path.to_owned(), message: message.into() }
    }
}

/// A markdown document read from a content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File stem, used as the URL slug.
    pub slug: String,
    pub path: PathBuf,
    pub text: String,
}

/// Read every `*.md` file directly inside `dir`, sorted by slug.
///
/// # Errors
///
/// Returns [`ContentError::Io`] if the directory or a file cannot be read.
pub fn read_markdown_dir(dir: &Path) -> Result<Vec<Document>, ContentError> {
    let io_err = |path: &Path| {
        let path = path.to_owned();
        move |source| ContentError::Io { path, source }
    };

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            tracing::warn!(path = %path.display(), "skipping document with a non utf-8 name");
            continue;
        };
        let text = std::fs::read_to_string(&path).map_err(io_err(&path))?;
        documents.push(Document { slug, path, text });
    }

    documents.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(documents)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
