use std::path::PathBuf;

use super::*;

fn doc(slug: &str, text: &str) -> Document {
    Document { slug: slug.to_owned(), path: PathBuf::from(format!("{slug}.md")), text: text.to_owned() }
}

const DECK: &str = "\
```yaml :presentation:
live: true
title: Routing in Rust
```

# Routing in Rust

```yaml :slide:
class: title
```

## First

```yaml :slide:
class: \"\"
```

- one
- two
";

#[test]
fn deck_is_split_into_title_and_slides() {
    let service = PresentationService::from_documents([doc("routing", DECK)]).unwrap();
    assert_eq!(service.len(), 1);

    let deck = service.get("routing").unwrap();
    assert!(deck.frontmatter.live);
    assert_eq!(deck.title(), "Routing in Rust");
    assert_eq!(deck.html, "<h1 id=\"routing-in-rust\">Routing in Rust</h1>\n");
    assert_eq!(deck.slides.len(), 2);
    assert_eq!(deck.slides[0].frontmatter.class, "title");
    assert_eq!(deck.slides[0].html, "<h2 id=\"first\">First</h2>\n");
    assert_eq!(deck.slides[1].frontmatter.class, "");
    assert!(deck.slides[1].html.starts_with("<ul>"));
}

#[test]
fn title_falls_back_to_slug() {
    let service =
        PresentationService::from_documents([doc("untitled", "```yaml :presentation:\nlive: false\n```\nhello")])
            .unwrap();
    let deck = service.get("untitled").unwrap();
    assert_eq!(deck.title(), "untitled");
    assert!(deck.slides.is_empty());
    assert_eq!(deck.html, "<p>hello</p>\n");
}

#[test]
fn preamble_is_rejected() {
    let err = PresentationService::from_documents([doc("x", &format!("oops\n{DECK}"))]).unwrap_err();
    assert!(err.to_string().contains("expected no text before"));
}

#[test]
fn missing_presentation_block_is_rejected() {
    let err = PresentationService::from_documents([doc("x", "")]).unwrap_err();
    assert!(err.to_string().contains("expected 1 presentation block, got 0"));
}

#[test]
fn invalid_slide_frontmatter_is_reported() {
    let text = "```yaml :presentation:\nlive: true\n```\n```yaml :slide:\nclass: [unclosed\n```\nbody";
    let err = PresentationService::from_documents([doc("x", text)]).unwrap_err();
    assert!(matches!(err, ContentError::Frontmatter { ref source, .. } if source.page_index == 0));
}
