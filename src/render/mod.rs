// Fragment Rendering
//
// Shared pieces for turning view models into HTML fragments:
// - Escaping of upstream text and URLs
// - Title truncation and poster placeholders
// - Card, grid, pager and error components (components.rs)
// - The full document shell around a fragment (shell.rs)

pub mod components;
pub mod shell;

/// Marker attribute the navigator intercepts; anchors without it are left alone.
pub const LINK_MARKER: &str = "data-page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Card titles longer than this many characters are truncated.
    pub title_max: usize,
    /// Same for the home hero banner.
    pub hero_title_max: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title_max: 30,
            hero_title_max: 40,
        }
    }
}

/// Escape text for element content.
pub fn esc(text: &str) -> String {
    htmlescape::encode_minimal(text)
}

/// Escape text for a double-quoted attribute value. The minimal entity set
/// already covers both quote characters, and keeps URLs readable.
pub fn attr(text: &str) -> String {
    htmlescape::encode_minimal(text)
}

/// Percent-encode an identifier for use as one path segment.
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Accept only http(s) and root-relative URLs from upstream data; anything
/// else (blank, `javascript:`, `data:`) counts as absent.
pub fn safe_url(raw: Option<&str>) -> Option<String> {
    let url = raw?.trim();
    let lower = url.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || (url.starts_with('/') && !url.starts_with("//"));
    allowed.then(|| url.to_string())
}

/// Cut to `max` characters (not bytes, not words) and append "...".
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() > max {
        let cut: String = title.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}

/// First character of the title, uppercased; empty for an empty title.
pub fn initial(title: &str) -> String {
    title
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Internal anchor carrying the navigation marker.
pub fn nav_link(href: &str, class: &str, inner_html: &str) -> String {
    if class.is_empty() {
        format!(r#"<a href="{}" {}>{}</a>"#, attr(href), LINK_MARKER, inner_html)
    } else {
        format!(
            r#"<a href="{}" class="{}" {}>{}</a>"#,
            attr(href),
            class,
            LINK_MARKER,
            inner_html
        )
    }
}

/// Render `text` if present and non-blank, otherwise `fallback`.
pub fn or_na(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => esc(v),
        _ => esc(fallback),
    }
}
