//! Blog posts.
//!
//! Each `content/blog/<slug>.md` starts with a single
//! `` ```yaml :frontmatter: `` block followed by the post body in markdown.
//! Bodies are rendered to HTML while loading.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ContentError, Document, read_markdown_dir};
use crate::multifrontmatter::{Format, Transformer};
use crate::render::markdown;

pub const FRONTMATTER_TAG: &str = "frontmatter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontmatter {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub live: bool,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub frontmatter: PostFrontmatter,
    /// Rendered body.
    pub html: String,
}

/// All posts, newest first.
#[derive(Debug, Default)]
pub struct BlogService {
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
}

impl BlogService {
    /// Load every post under `dir`.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable or malformed document.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let service = Self::from_documents(read_markdown_dir(dir)?)?;
        tracing::info!(dir = %dir.display(), posts = service.posts.len(), "blog loaded");
        Ok(service)
    }

    /// Parse already-read documents.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed document.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Result<Self, ContentError> {
        let transformer = Transformer::<PostFrontmatter>::new(Format::Yaml, FRONTMATTER_TAG);

        let mut posts = Vec::new();
        for doc in documents {
            let split = transformer
                .transform(&doc.text)
                .map_err(|source| ContentError::Frontmatter { path: doc.path.clone(), source })?;
            if !split.pre.is_empty() {
                return Err(ContentError::invalid(&doc.path, "unexpected text before the frontmatter block"));
            }
            let mut pages = split.pages.into_iter();
            let (Some(page), None) = (pages.next(), pages.next()) else {
                return Err(ContentError::invalid(&doc.path, "expected exactly one frontmatter block"));
            };

            posts.push(Post { slug: doc.slug, frontmatter: page.frontmatter, html: markdown::to_html(&page.body) });
        }

        // Stable: equal dates keep slug order.
        posts.sort_by(|a, b| b.frontmatter.created_at.cmp(&a.frontmatter.created_at));
        let by_slug = posts.iter().enumerate().map(|(i, p)| (p.slug.clone(), i)).collect();
        Ok(Self { posts, by_slug })
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&i| &self.posts[i])
    }

    /// Every post, newest first.
    #[must_use]
    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    /// Published posts, newest first.
    pub fn live(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.frontmatter.live)
    }
}

#[cfg(test)]
#[path = "blog_test.rs"]
mod tests;
