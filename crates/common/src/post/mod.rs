pub mod front_matter;
mod slug;

pub use slug::{post_path, slugify};

use chrono::NaiveDateTime;

/// A blog post: front-matter fields plus the raw Markdown body.
///
/// The storage path is not part of the post itself. It is derived from
/// `date` and `title` on first save and pinned by the session afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    /// Publication date and time, second precision.
    pub date: NaiveDateTime,
    /// Order-preserving for display.
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub pin: bool,
    pub math: bool,
    pub mermaid: bool,
    pub comments: bool,
    /// Raw Markdown body, stored verbatim below the front matter.
    pub body: String,
}

impl Post {
    /// New post with the flag defaults the serialized format assumes:
    /// comments on, everything else off.
    pub fn new(title: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            date,
            categories: Vec::new(),
            tags: Vec::new(),
            pin: false,
            math: false,
            mermaid: false,
            comments: true,
            body: String::new(),
        }
    }
}
