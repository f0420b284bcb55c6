//! Typed frontmatter pages on top of the splitter.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::split::{Split, Splitter};

/// Serialization format of a frontmatter block. Also names the fence language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Language tag used in the opening fence (`` ```yaml ``, `` ```toml ``, ...).
    #[must_use]
    pub fn lang_tag(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Deserialize `text` as `T` in this format.
    ///
    /// # Errors
    ///
    /// Returns the underlying parser error when `text` is not a valid `T`.
    pub fn deserialize<T: DeserializeOwned>(self, text: &str) -> Result<T, FormatError> {
        Ok(match self {
            Self::Yaml => serde_yaml::from_str(text)?,
            Self::Toml => toml::from_str(text)?,
            Self::Json => serde_json::from_str(text)?,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lang_tag())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A page whose frontmatter failed to deserialize.
#[derive(Debug, thiserror::Error)]
#[error("page {page_index}: invalid {format} frontmatter: {source}")]
pub struct DeserializationError {
    pub page_index: usize,
    pub format: Format,
    #[source]
    pub source: FormatError,
}

/// A page with its frontmatter deserialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub frontmatter: T,
    pub body: String,
}

/// Splits documents and deserializes every frontmatter block into `T`.
pub struct Transformer<T> {
    format: Format,
    splitter: Splitter,
    marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Transformer<T> {
    /// Transformer for `` ```<format> :<tag>: `` blocks.
    #[must_use]
    pub fn new(format: Format, tag: &str) -> Self {
        Self { format, splitter: Splitter::new(format.lang_tag(), tag), marker: PhantomData }
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Split `raw` and deserialize every page.
    ///
    /// # Errors
    ///
    /// Returns a [`DeserializationError`] for the first page whose frontmatter
    /// is not a valid `T`.
    pub fn transform(&self, raw: &str) -> Result<Split<Page<T>>, DeserializationError> {
        match self.transform_partial(raw) {
            (split, None) => Ok(split),
            (_, Some(err)) => Err(err),
        }
    }

    /// Like [`Transformer::transform`], but hands back the pages transformed
    /// before the first failure alongside the error.
    pub fn transform_partial(&self, raw: &str) -> (Split<Page<T>>, Option<DeserializationError>) {
        let split = self.splitter.split(raw);
        let mut out = Split { pre: split.pre, pages: Vec::with_capacity(split.pages.len()) };

        for (page_index, data) in split.pages.into_iter().enumerate() {
            match self.format.deserialize(&data.frontmatter) {
                Ok(frontmatter) => out.pages.push(Page { frontmatter, body: data.body }),
                Err(source) => {
                    let err = DeserializationError { page_index, format: self.format, source };
                    return (out, Some(err));
                }
            }
        }

        (out, None)
    }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
