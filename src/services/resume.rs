//! The résumé document (`content/resume.yaml`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ContentError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDoc {
    #[serde(default)]
    pub preface: String,
    #[serde(default)]
    pub sections: Vec<ResumeSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub title: String,
    #[serde(default)]
    pub items: Vec<ResumeItem>,
}

/// One entry; carries either a prose `block` or a `list`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeItem {
    #[serde(default)]
    pub annotation: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<String>>,
}

/// Borrowed view of an item's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemContent<'a> {
    Block(&'a str),
    List(&'a [String]),
}

impl ResumeItem {
    /// `None` unless exactly one of `block` and `list` is set.
    #[must_use]
    pub fn content(&self) -> Option<ItemContent<'_>> {
        match (&self.block, &self.list) {
            (Some(block), None) => Some(ItemContent::Block(block)),
            (None, Some(list)) => Some(ItemContent::List(list)),
            _ => None,
        }
    }
}

impl ResumeDoc {
    /// # Errors
    ///
    /// Returns [`ContentError`] when the file is unreadable, is not valid
    /// YAML for this shape, or an item has neither or both of `block`/`list`.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io { path: path.to_owned(), source })?;
        let doc = Self::parse(path, &text)?;
        tracing::info!(path = %path.display(), sections = doc.sections.len(), "resume loaded");
        Ok(doc)
    }

    /// # Errors
    ///
    /// Same as [`ResumeDoc::load`], minus I/O.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ContentError> {
        let doc: Self =
            serde_yaml::from_str(text).map_err(|source| ContentError::Yaml { path: path.to_owned(), source })?;
        doc.validate(path)?;
        Ok(doc)
    }

    fn validate(&self, path: &Path) -> Result<(), ContentError> {
        for section in &self.sections {
            for item in &section.items {
                if item.content().is_none() {
                    return Err(ContentError::invalid(
                        path,
                        format!(
                            "item {:?} in section {:?} must have exactly one of `block` or `list`",
                            item.title, section.title
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "resume_test.rs"]
mod tests;
