// The full HTML document around a content fragment: title, navigation tabs
// with the active one marked, the search form and the content container.

use super::{attr, esc, nav_link};

/// Navigation tabs as `(href, label)`.
pub const NAV_TABS: &[(&str, &str)] = &[
    ("/", "Beranda"),
    ("/schedule", "Jadwal"),
    ("/ongoing", "Sedang Tayang"),
    ("/completed", "Tamat"),
    ("/genres", "Genre"),
    ("/report", "Lapor Bug"),
];

/// The tab whose `href` equals `path`.
pub fn active_tab(path: &str) -> Option<&'static str> {
    NAV_TABS
        .iter()
        .map(|(href, _)| *href)
        .find(|href| *href == path)
}

fn nav_tabs(active: Option<&str>) -> String {
    NAV_TABS
        .iter()
        .map(|(href, label)| {
            let class = if Some(*href) == active { "nav-link active" } else { "nav-link" };
            nav_link(href, class, label)
        })
        .collect()
}

pub fn document(title: &str, active: Option<&str>, search_value: &str, content: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="id"><head><meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            "<title>{}</title>",
            r#"<link rel="stylesheet" href="/static/style.css"></head><body>"#,
            r#"<header class="navbar">{}<nav class="nav-links">{}</nav>"#,
            r#"<form class="search-box" method="get" action="/search">"#,
            r#"<input type="text" id="searchInput" name="q" value="{}" placeholder="Cari anime...">"#,
            r#"<button type="submit" id="searchButton">Cari</button></form></header>"#,
            r#"<main id="content">{}</main>"#,
            r#"<footer class="footer"><p>NontonAnime</p></footer></body></html>"#
        ),
        esc(title),
        nav_link("/", "logo", "NontonAnime"),
        nav_tabs(active),
        attr(search_value),
        content
    )
}
