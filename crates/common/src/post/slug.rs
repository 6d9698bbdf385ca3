use chrono::NaiveDateTime;

/// Normalize a title into a URL-safe slug: lowercased, runs of anything
/// outside `[a-z0-9]` collapsed to a single `-`, no leading or trailing `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        // A title made entirely of symbols would otherwise yield a bare
        // `YYYY-MM-DD-.md` path.
        slug.push_str("untitled");
    }
    slug
}

/// Derive the storage path for a new post: `{dir}/{YYYY-MM-DD}-{slug}.md`.
/// Existing posts keep the path they were created under.
pub fn post_path(posts_dir: &str, date: NaiveDateTime, title: &str) -> String {
    format!(
        "{}/{}-{}.md",
        posts_dir.trim_end_matches('/'),
        date.format("%Y-%m-%d"),
        slugify(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn slugify_collapses_runs() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Go -- the good parts!"), "go-the-good-parts");
        assert_eq!(slugify("  Rust 2024  "), "rust-2024");
    }

    #[test]
    fn slugify_symbol_only_title_falls_back() {
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn post_path_matches_store_layout() {
        assert_eq!(
            post_path("_posts", date(2024, 3, 1), "Hello World"),
            "_posts/2024-03-01-hello-world.md"
        );
        // trailing slash on the dir is tolerated
        assert_eq!(
            post_path("_posts/", date(2024, 3, 1), "Hello World"),
            "_posts/2024-03-01-hello-world.md"
        );
    }
}
