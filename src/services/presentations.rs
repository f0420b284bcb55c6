//! Slide decks.
//!
//! A deck file carries one `` ```yaml :presentation: `` block. Its body is
//! split again on `` ```yaml :slide: `` blocks: text before the first slide
//! is the title content, each block after it starts a slide.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ContentError, Document, read_markdown_dir};
use crate::multifrontmatter::{Format, Transformer};
use crate::render::markdown;

pub const PRESENTATION_TAG: &str = "presentation";
pub const SLIDE_TAG: &str = "slide";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationFrontmatter {
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideFrontmatter {
    /// Extra CSS classes for the slide container.
    #[serde(default)]
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub frontmatter: SlideFrontmatter,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub slug: String,
    pub frontmatter: PresentationFrontmatter,
    /// Rendered title content.
    pub html: String,
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Display title: the frontmatter title, else the slug.
    #[must_use]
    pub fn title(&self) -> &str {
        self.frontmatter.title.as_deref().unwrap_or(&self.slug)
    }
}

#[derive(Debug, Default)]
pub struct PresentationService {
    presentations: HashMap<String, Presentation>,
}

impl PresentationService {
    /// # Errors
    ///
    /// Fails on the first unreadable or malformed deck.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let service = Self::from_documents(read_markdown_dir(dir)?)?;
        tracing::info!(dir = %dir.display(), presentations = service.presentations.len(), "presentations loaded");
        Ok(service)
    }

    /// # Errors
    ///
    /// Fails on the first malformed deck.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Result<Self, ContentError> {
        let deck = Transformer::<PresentationFrontmatter>::new(Format::Yaml, PRESENTATION_TAG);
        let slides = Transformer::<SlideFrontmatter>::new(Format::Yaml, SLIDE_TAG);

        let mut presentations = HashMap::new();
        for doc in documents {
            let frontmatter_err = |source| ContentError::Frontmatter { path: doc.path.clone(), source };

            let split = deck.transform(&doc.text).map_err(frontmatter_err)?;
            if !split.pre.is_empty() {
                return Err(ContentError::invalid(
                    &doc.path,
                    format!("expected no text before the presentation block, got {} bytes", split.pre.len()),
                ));
            }
            if split.pages.len() != 1 {
                return Err(ContentError::invalid(
                    &doc.path,
                    format!("expected 1 presentation block, got {}", split.pages.len()),
                ));
            }
            let Some(page) = split.pages.into_iter().next() else {
                continue;
            };

            let split = slides.transform(&page.body).map_err(frontmatter_err)?;
            let presentation = Presentation {
                slug: doc.slug.clone(),
                frontmatter: page.frontmatter,
                html: markdown::to_html(&split.pre),
                slides: split
                    .pages
                    .into_iter()
                    .map(|slide| Slide { frontmatter: slide.frontmatter, html: markdown::to_html(&slide.body) })
                    .collect(),
            };
            presentations.insert(doc.slug, presentation);
        }

        Ok(Self { presentations })
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Presentation> {
        self.presentations.get(slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.presentations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }
}

#[cfg(test)]
#[path = "presentations_test.rs"]
mod tests;
