//! A closed HTML node tree.
//!
//! Pages are assembled from [`Node`] values and serialized once per
//! response. Text and attribute values are escaped on output; [`Node::Raw`]
//! is the only way to emit markup verbatim and is reserved for HTML the
//! server produced itself (rendered markdown, inline CSS).

use std::borrow::Cow;

use pulldown_cmark_escape::{escape_html, escape_html_body_text};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Escaped text.
    Text(String),
    /// Trusted, pre-rendered markup.
    Raw(String),
    Element(Element),
    /// Siblings without a wrapper.
    List(Vec<Node>),
    Conditional { condition: bool, then: Box<Node>, otherwise: Box<Node> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(Cow<'static, str>, Option<String>)>,
    children: Vec<Node>,
}

/// Start an element builder.
#[must_use]
pub fn el(tag: &'static str) -> Element {
    Element { tag, attrs: Vec::new(), children: Vec::new() }
}

/// Shorthand for [`Node::Text`].
pub fn text(value: impl Into<String>) -> Node {
    Node::Text(value.into())
}

impl Node {
    #[must_use]
    pub fn empty() -> Self {
        Self::List(Vec::new())
    }

    /// `then` when `condition` holds, nothing otherwise.
    pub fn when(condition: bool, then: impl Into<Node>) -> Self {
        Self::either(condition, then, Self::empty())
    }

    pub fn either(condition: bool, then: impl Into<Node>, otherwise: impl Into<Node>) -> Self {
        Self::Conditional { condition, then: Box::new(then.into()), otherwise: Box::new(otherwise.into()) }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    pub fn write_to(&self, out: &mut String) {
        match self {
            Self::Text(value) => {
                let _ = escape_html_body_text(&mut *out, value);
            }
            Self::Raw(html) => out.push_str(html),
            Self::Element(element) => element.write_to(out),
            Self::List(nodes) => nodes.iter().for_each(|node| node.write_to(out)),
            Self::Conditional { condition, then, otherwise } => {
                if *condition { then.write_to(out) } else { otherwise.write_to(out) }
            }
        }
    }
}

impl Element {
    #[must_use]
    pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), Some(value.into())));
        self
    }

    /// A boolean attribute such as `required`.
    #[must_use]
    pub fn flag(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.attrs.push((name.into(), None));
        self
    }

    #[must_use]
    pub fn flag_if(self, condition: bool, name: impl Into<Cow<'static, str>>) -> Self {
        if condition { self.flag(name) } else { self }
    }

    #[must_use]
    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    #[must_use]
    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                let _ = escape_html(&mut *out, value);
                out.push('"');
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Node {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Self::List(nodes)
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;
