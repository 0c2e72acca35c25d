// Route Table
//
// Maps a path to exactly one page. Exact paths are checked before prefix
// paths; prefix routes take the final path segment as their identifier.

use super::route::Route;
use crate::pagination::parse_page;
use crate::render::segment;

const SITE_NAME: &str = "NontonAnime";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Schedule,
    AnimeIndex { page: u32 },
    Genres,
    Genre { id: String, page: u32 },
    Ongoing { page: u32 },
    Completed { page: u32 },
    /// `None` when `q` is missing or blank.
    Search { query: Option<String> },
    AnimeDetail { id: String, episode_page: u32 },
    Episode { id: String, server: Option<String> },
    Server { id: String },
    Batch { id: String },
    Report,
    NotFound,
}

impl Page {
    /// Gateway endpoint backing this page, if it fetches anything.
    pub fn endpoint(&self) -> Option<String> {
        match self {
            Page::Home => Some("home".to_string()),
            // The schedule is built from the first page of ongoing anime.
            Page::Schedule => Some("ongoing?page=1".to_string()),
            Page::AnimeIndex { .. } => Some("anime".to_string()),
            Page::Genres => Some("genres".to_string()),
            Page::Genre { id, page } => Some(format!("genres/{}?page={}", segment(id), page)),
            Page::Ongoing { page } => Some(format!("ongoing?page={}", page)),
            Page::Completed { page } => Some(format!("completed?page={}", page)),
            Page::Search { query: Some(q) } => Some(format!("search?q={}", urlencoding::encode(q))),
            Page::Search { query: None } => None,
            Page::AnimeDetail { id, .. } => Some(format!("anime/{}", segment(id))),
            Page::Episode { id, .. } => Some(format!("episode/{}", segment(id))),
            Page::Server { id } => Some(format!("server/{}", segment(id))),
            Page::Batch { id } => Some(format!("batch/{}", segment(id))),
            Page::Report | Page::NotFound => None,
        }
    }

    /// Document title shown by the shell and stashed for bug reports.
    pub fn title(&self) -> String {
        let name = match self {
            Page::Home => "Beranda".to_string(),
            Page::Schedule => "Jadwal Tayang".to_string(),
            Page::AnimeIndex { .. } => "Semua Anime".to_string(),
            Page::Genres => "Semua Genre".to_string(),
            Page::Genre { id, .. } => format!("Genre {}", capitalize(id)),
            Page::Ongoing { .. } => "Anime Sedang Tayang".to_string(),
            Page::Completed { .. } => "Anime Sudah Tamat".to_string(),
            Page::Search { query: Some(q) } => format!("Pencarian \"{}\"", q),
            Page::Search { query: None } => "Pencarian".to_string(),
            Page::AnimeDetail { .. } => "Detail Anime".to_string(),
            Page::Episode { .. } => "Nonton Episode".to_string(),
            Page::Server { .. } => "Server Video".to_string(),
            Page::Batch { .. } => "Download Batch".to_string(),
            Page::Report => "Lapor Bug".to_string(),
            Page::NotFound => "Halaman Tidak Ditemukan".to_string(),
        };
        format!("{} - {}", name, SITE_NAME)
    }
}

/// Uppercase the first character, leave the rest as-is.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
}

struct RouteEntry {
    matcher: Matcher,
    handler: fn(&Route, String) -> Page,
}

fn page_param(route: &Route, key: &str) -> u32 {
    parse_page(route.get(key))
}

fn home(_: &Route, _: String) -> Page {
    Page::Home
}

fn schedule(_: &Route, _: String) -> Page {
    Page::Schedule
}

fn anime_index(route: &Route, _: String) -> Page {
    Page::AnimeIndex { page: page_param(route, "page") }
}

fn genres(_: &Route, _: String) -> Page {
    Page::Genres
}

fn ongoing(route: &Route, _: String) -> Page {
    Page::Ongoing { page: page_param(route, "page") }
}

fn completed(route: &Route, _: String) -> Page {
    Page::Completed { page: page_param(route, "page") }
}

fn search(route: &Route, _: String) -> Page {
    let query = route
        .get("q")
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);
    Page::Search { query }
}

fn report(_: &Route, _: String) -> Page {
    Page::Report
}

fn genre(route: &Route, id: String) -> Page {
    Page::Genre { id, page: page_param(route, "page") }
}

fn anime_detail(route: &Route, id: String) -> Page {
    Page::AnimeDetail { id, episode_page: page_param(route, "episode_page") }
}

fn episode(route: &Route, id: String) -> Page {
    let server = route
        .get("server")
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);
    Page::Episode { id, server }
}

fn server(_: &Route, id: String) -> Page {
    Page::Server { id }
}

fn batch(_: &Route, id: String) -> Page {
    Page::Batch { id }
}

const ROUTE_TABLE: &[RouteEntry] = &[
    RouteEntry { matcher: Matcher::Exact("/"), handler: home },
    RouteEntry { matcher: Matcher::Exact("/home"), handler: home },
    RouteEntry { matcher: Matcher::Exact("/schedule"), handler: schedule },
    RouteEntry { matcher: Matcher::Exact("/anime"), handler: anime_index },
    RouteEntry { matcher: Matcher::Exact("/genres"), handler: genres },
    RouteEntry { matcher: Matcher::Exact("/ongoing"), handler: ongoing },
    RouteEntry { matcher: Matcher::Exact("/completed"), handler: completed },
    RouteEntry { matcher: Matcher::Exact("/search"), handler: search },
    RouteEntry { matcher: Matcher::Exact("/report"), handler: report },
    RouteEntry { matcher: Matcher::Prefix("/genres/"), handler: genre },
    RouteEntry { matcher: Matcher::Prefix("/anime/"), handler: anime_detail },
    RouteEntry { matcher: Matcher::Prefix("/episode/"), handler: episode },
    RouteEntry { matcher: Matcher::Prefix("/server/"), handler: server },
    RouteEntry { matcher: Matcher::Prefix("/batch/"), handler: batch },
];

/// Resolve a route to its page. Unmatched paths, and prefix paths whose final
/// segment is empty, resolve to `Page::NotFound`.
pub fn resolve_route(route: &Route) -> Page {
    for entry in ROUTE_TABLE {
        match entry.matcher {
            Matcher::Exact(path) if route.path == path => {
                return (entry.handler)(route, String::new());
            }
            Matcher::Prefix(prefix) if route.path.starts_with(prefix) => {
                let last = route.path.rsplit('/').next().unwrap_or_default();
                let id = urlencoding::decode(last)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| last.to_string());
                if id.is_empty() {
                    return Page::NotFound;
                }
                return (entry.handler)(route, id);
            }
            _ => {}
        }
    }
    Page::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(location: &str) -> Page {
        resolve_route(&Route::parse(location))
    }

    #[test]
    fn test_exact_routes() {
        assert_eq!(resolve("/"), Page::Home);
        assert_eq!(resolve("/home"), Page::Home);
        assert_eq!(resolve("/schedule"), Page::Schedule);
        assert_eq!(resolve("/anime"), Page::AnimeIndex { page: 1 });
        assert_eq!(resolve("/anime?page=3"), Page::AnimeIndex { page: 3 });
        assert_eq!(resolve("/genres"), Page::Genres);
        assert_eq!(resolve("/ongoing?page=2"), Page::Ongoing { page: 2 });
        assert_eq!(resolve("/completed?page=x"), Page::Completed { page: 1 });
        assert_eq!(resolve("/report"), Page::Report);
    }

    #[test]
    fn test_prefix_routes_extract_identifier() {
        assert_eq!(
            resolve("/genres/action?page=4"),
            Page::Genre { id: "action".to_string(), page: 4 }
        );
        assert_eq!(
            resolve("/anime/one-piece-sub-indo?episode_page=2"),
            Page::AnimeDetail { id: "one-piece-sub-indo".to_string(), episode_page: 2 }
        );
        assert_eq!(
            resolve("/episode/op-episode-1000?server=abc"),
            Page::Episode { id: "op-episode-1000".to_string(), server: Some("abc".to_string()) }
        );
        assert_eq!(resolve("/episode/op-1"), Page::Episode { id: "op-1".to_string(), server: None });
        assert_eq!(resolve("/server/xyz"), Page::Server { id: "xyz".to_string() });
        assert_eq!(resolve("/batch/op-batch"), Page::Batch { id: "op-batch".to_string() });
    }

    #[test]
    fn test_search_query() {
        assert_eq!(
            resolve("/search?q=%20naruto%20"),
            Page::Search { query: Some("naruto".to_string()) }
        );
        assert_eq!(resolve("/search"), Page::Search { query: None });
        assert_eq!(resolve("/search?q=+"), Page::Search { query: None });
    }

    #[test]
    fn test_unmatched_routes() {
        assert_eq!(resolve("/unknown"), Page::NotFound);
        assert_eq!(resolve("/animes"), Page::NotFound);
        assert_eq!(resolve("/anime/"), Page::NotFound);
        assert_eq!(resolve("/home/extra"), Page::NotFound);
    }

    #[test]
    fn test_nested_segments_take_last() {
        assert_eq!(
            resolve("/anime/a/b"),
            Page::AnimeDetail { id: "b".to_string(), episode_page: 1 }
        );
    }

    #[test]
    fn test_exact_beats_prefix() {
        // "/genres" must not be taken by the "/genres/" prefix entry.
        assert_eq!(resolve("/genres"), Page::Genres);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            Page::Search { query: Some("one piece".to_string()) }.endpoint().as_deref(),
            Some("search?q=one%20piece")
        );
        assert_eq!(
            resolve("/genres/sci%20fi?page=2").endpoint().as_deref(),
            Some("genres/sci%20fi?page=2")
        );
        assert_eq!(Page::Report.endpoint(), None);
        assert_eq!(Page::Schedule.endpoint().as_deref(), Some("ongoing?page=1"));
    }

    #[test]
    fn test_titles() {
        assert_eq!(Page::Home.title(), "Beranda - NontonAnime");
        assert_eq!(
            Page::Genre { id: "action".to_string(), page: 1 }.title(),
            "Genre Action - NontonAnime"
        );
        assert_eq!(capitalize("école"), "École");
    }
}
