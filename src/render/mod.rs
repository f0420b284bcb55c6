//! Server-side HTML: node tree, markdown, page layout.

pub mod html;
pub mod layout;
pub mod markdown;
