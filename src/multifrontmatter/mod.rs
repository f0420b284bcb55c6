//! Multi-document frontmatter parsing.
//!
//! SYSTEM CONTEXT
//! ==============
//! Blog posts and slide decks are single markdown files carrying one or more
//! fenced metadata blocks:
//!
//! ~~~text
//! ```yaml :slide:
//! class: title
//! ```
//!
//! # Slide body
//! ~~~
//!
//! [`split::Splitter`] cuts a file into a preamble and raw `(frontmatter, body)`
//! pages; [`Transformer`] deserializes each frontmatter block into a typed
//! value using YAML, TOML or JSON.

pub mod split;
pub mod transform;

pub use transform::{DeserializationError, Format, Transformer};
