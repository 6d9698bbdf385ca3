//! Front-matter codec for the stored post format.
//!
//! A post is persisted as a `---`-delimited metadata block, one `key: value`
//! pair per line, followed by a blank separator line and the raw body:
//!
//! ```text
//! ---
//! title: "Hello World"
//! date: 2024-03-01 09:00:00
//! categories: ["Go"]
//! tags: ["tutorial", "go"]
//! pin: false
//! math: false
//! mermaid: false
//! comments: true
//! ---
//!
//! body
//! ```
//!
//! Parsing is line-oriented and tolerant: unrecognized keys are ignored so
//! older builds can open posts written by newer ones, and each recognized
//! key is extracted independently of ordering.

use chrono::{NaiveDate, NaiveDateTime};

use super::Post;

#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("missing front matter delimiters")]
    MissingDelimiters,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize a post into the stored text format.
pub fn serialize(post: &Post) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("title: {}\n", quote(&post.title)));
    out.push_str(&format!("date: {}\n", post.date.format(DATE_FORMAT)));
    out.push_str(&format!("categories: [{}]\n", quoted_list(&post.categories)));
    out.push_str(&format!("tags: [{}]\n", quoted_list(&post.tags)));
    out.push_str(&format!("pin: {}\n", post.pin));
    out.push_str(&format!("math: {}\n", post.math));
    out.push_str(&format!("mermaid: {}\n", post.mermaid));
    out.push_str(&format!("comments: {}\n", post.comments));
    out.push_str("---\n\n");
    out.push_str(&post.body);
    out
}

/// Parse the stored text format back into a [`Post`].
///
/// Both marker lines must be present. Within the block, missing keys fall
/// back per field: empty title (rejected upstream at save), noon when the
/// date carries no time-of-day, `false` for `pin`/`math`/`mermaid`, `true`
/// for `comments`. A post with no `date:` line at all does not parse; the
/// storage path invariant depends on it.
pub fn deserialize(text: &str) -> Result<Post, FrontMatterError> {
    let mut lines = text.split('\n');

    let opening = lines.next().ok_or(FrontMatterError::MissingDelimiters)?;
    if !is_marker(opening) {
        return Err(FrontMatterError::MissingDelimiters);
    }

    let mut block = Vec::new();
    let mut closed = false;
    for line in &mut lines {
        if is_marker(line) {
            closed = true;
            break;
        }
        block.push(line.trim_end_matches('\r'));
    }
    if !closed {
        return Err(FrontMatterError::MissingDelimiters);
    }

    // One blank line separates the block from the body; anything after it
    // is body text verbatim.
    let mut body_lines = lines.peekable();
    if body_lines.peek().map(|l| l.trim_end_matches('\r').is_empty()) == Some(true) {
        body_lines.next();
    }
    let body = body_lines.collect::<Vec<_>>().join("\n");

    let mut title = String::new();
    let mut date = None;
    let mut categories = Vec::new();
    let mut tags = Vec::new();
    let mut pin = false;
    let mut math = false;
    let mut mermaid = false;
    let mut comments = true;

    for line in block {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "title" => title = unquote(value),
            "date" => date = Some(parse_date(value)?),
            "categories" => categories = parse_list(value),
            "tags" => tags = parse_list(value),
            "pin" => pin = parse_flag(value, pin),
            "math" => math = parse_flag(value, math),
            "mermaid" => mermaid = parse_flag(value, mermaid),
            "comments" => comments = parse_flag(value, comments),
            // Forward-compatible: keys this build does not know are kept
            // out of the model and dropped on re-serialize.
            _ => {}
        }
    }

    let date = date.ok_or(FrontMatterError::MissingField("date"))?;

    Ok(Post {
        title,
        date,
        categories,
        tags,
        pin,
        math,
        mermaid,
        comments,
        body,
    })
}

fn is_marker(line: &str) -> bool {
    line.trim_end_matches('\r').trim() == "---"
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s);
    inner.replace("\\\"", "\"")
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| quote(i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_list(value: &str) -> Vec<String> {
    let inner = value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    inner
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value {
        "true" => true,
        "false" => false,
        _ => default,
    }
}

fn parse_date(value: &str) -> Result<NaiveDateTime, FrontMatterError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATE_FORMAT) {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    // Date only: default the time-of-day to noon.
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(12, 0, 0).unwrap());
    }
    Err(FrontMatterError::InvalidDate(value.to_string()))
}
