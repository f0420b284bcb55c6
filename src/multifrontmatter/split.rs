//! Splitting of markdown documents into fenced frontmatter pages.
//!
//! DESIGN
//! ======
//! One left-to-right pass over the line starts of the document, driven by a
//! three-state machine (preamble, frontmatter block, page body). Delimiters
//! are matched textually, either at offset 0 or directly after a newline.
//! Fences carrying any other language or tag are not boundaries and stay in
//! the body of the page that contains them.
//!
//! An opening fence only counts when at least one byte follows it, so a
//! delimiter ending the input is ordinary text. An opening fence that is
//! never closed turns the rest of the document into that page's frontmatter,
//! with an empty body.

const CLOSING: &str = "```";

/// A document split into its preamble and the pages that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split<T> {
    /// Text before the first opening fence. Holds the whole input when no
    /// opening fence was found.
    pub pre: String,
    pub pages: Vec<T>,
}

/// Raw text of one page: the fenced frontmatter and the markdown after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Data {
    pub frontmatter: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Pre,
    Frontmatter,
    Body,
}

/// Splits documents on `` ```<lang> :<tag>: `` ... `` ``` `` blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splitter {
    opening: String,
}

impl Splitter {
    #[must_use]
    pub fn new(lang: &str, tag: &str) -> Self {
        Self { opening: format!("```{lang} :{tag}:") }
    }

    /// The literal opening delimiter this splitter recognizes.
    #[must_use]
    pub fn opening(&self) -> &str {
        &self.opening
    }

    /// Split `text` into a preamble and an ordered list of pages. Never fails.
    #[must_use]
    pub fn split(&self, text: &str) -> Split<Data> {
        let opening = self.opening.as_str();
        let mut step = Step::Pre;
        let mut split = Split::<Data>::default();
        // First byte of the section currently being read.
        let mut section_start = 0;

        let line_starts = std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1));
        for line_start in line_starts {
            let line = &text[line_start..];
            // The newline terminating the previous section (0 at input start).
            let section_end = line_start.saturating_sub(1);

            match step {
                Step::Pre if opens(line, opening) => {
                    split.pre = trim(slice(text, 0, section_end)).to_owned();
                    section_start = line_start + opening.len();
                    step = Step::Frontmatter;
                }
                Step::Frontmatter if line.starts_with(CLOSING) => {
                    split.pages.push(Data {
                        frontmatter: trim(slice(text, section_start, section_end)).to_owned(),
                        body: String::new(),
                    });
                    section_start = line_start + CLOSING.len();
                    step = Step::Body;
                }
                Step::Body if opens(line, opening) => {
                    if let Some(page) = split.pages.last_mut() {
                        page.body = trim(slice(text, section_start, section_end)).to_owned();
                    }
                    section_start = line_start + opening.len();
                    step = Step::Frontmatter;
                }
                _ => {}
            }
        }

        let tail = trim(text.get(section_start..).unwrap_or_default());
        match step {
            Step::Pre => split.pre = text.to_owned(),
            Step::Frontmatter => split.pages.push(Data { frontmatter: tail.to_owned(), body: String::new() }),
            Step::Body => {
                if let Some(page) = split.pages.last_mut() {
                    page.body = tail.to_owned();
                }
            }
        }

        split
    }
}

fn opens(line: &str, opening: &str) -> bool {
    line.len() > opening.len() && line.starts_with(opening)
}

/// Strip leading and trailing newlines and spaces (and nothing else).
fn trim(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\n' || c == ' ')
}

fn slice(text: &str, start: usize, end: usize) -> &str {
    text.get(start..end).unwrap_or_default()
}

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;
