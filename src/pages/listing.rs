// Listing Pages
//
// Grids of anime and genres:
// - All-anime index, paginated locally over the flattened groups
// - Genre index
// - Ongoing, completed and per-genre lists, paginated by the gateway

use super::{fetch_envelope, LoadContext};
use crate::error::PageError;
use crate::gateway::{AnimeIndexData, AnimeListData, AnimeSummary, Genre, GenreListData, Pagination};
use crate::pagination::{clamp_page, paginate, ANIME_INDEX_PAGE_SIZE};
use crate::render::components::{anime_grid, CardMeta, Pager};
use crate::render::{esc, initial, nav_link, segment, RenderOptions};
use crate::router::table::capitalize;

pub async fn load_anime_index(ctx: &LoadContext<'_>, page: u32) -> Result<String, PageError> {
    let envelope = fetch_envelope::<AnimeIndexData>(ctx.source, "anime").await?;
    Ok(render_anime_index(&envelope.data, page, ctx.options))
}

pub fn render_anime_index(index: &AnimeIndexData, page: u32, opts: &RenderOptions) -> String {
    let all: Vec<AnimeSummary> = index
        .list
        .iter()
        .flat_map(|group| group.anime_list.iter().cloned())
        .collect();
    let local = paginate(&all, page, ANIME_INDEX_PAGE_SIZE);

    let grid = if local.items.is_empty() {
        "<p>Tidak ada anime yang tersedia.</p>".to_string()
    } else {
        anime_grid(local.items, CardMeta::TitleOnly, opts)
    };

    let pager = Pager {
        current: local.current,
        total: local.total_pages,
        prev_href: local
            .has_prev()
            .then(|| format!("/anime?page={}", local.current - 1)),
        next_href: local
            .has_next()
            .then(|| format!("/anime?page={}", local.current + 1)),
    };

    format!(
        r#"<div class="page-header"><h1 class="page-title">Semua Anime</h1></div>{}{}"#,
        grid,
        pager.render()
    )
}

pub async fn load_genres(ctx: &LoadContext<'_>) -> Result<String, PageError> {
    let envelope = fetch_envelope::<GenreListData>(ctx.source, "genres").await?;
    Ok(render_genres(&envelope.data.genre_list))
}

fn genre_card(genre: &Genre) -> String {
    let inner = format!(
        r#"<div class="genre-icon">{}</div><div class="genre-info"><h3>{}</h3><p>{}</p></div>"#,
        esc(&initial(&genre.title)),
        esc(&genre.title),
        esc(&genre.genre_id)
    );
    format!(
        r#"<div class="genre-card">{}</div>"#,
        nav_link(&format!("/genres/{}", segment(&genre.genre_id)), "", &inner)
    )
}

pub fn render_genres(genres: &[Genre]) -> String {
    let cards = if genres.is_empty() {
        "<p>Tidak ada genre yang tersedia saat ini.</p>".to_string()
    } else {
        genres.iter().map(genre_card).collect()
    };
    format!(
        concat!(
            r#"<h1 class="page-title">Semua Genre Anime</h1><div class="genres-grid">{}</div>"#,
            r#"<p class="info-text">Jelajahi anime berdasarkan genre untuk menemukan tipe tayangan favorit Anda.</p>"#
        ),
        cards
    )
}

/// Pager from gateway metadata. The displayed page is clamped into
/// `1..=totalPages`; links follow the gateway's prev/next pages.
pub fn server_pager(pagination: Option<&Pagination>, requested: u32, base: &str) -> Pager {
    let Some(p) = pagination else {
        return Pager { current: requested.max(1), total: 0, prev_href: None, next_href: None };
    };

    let reported = if p.current_page == 0 { requested } else { p.current_page };
    let current = clamp_page(reported, p.total_pages);
    let href = |page: u32| format!("{}?page={}", base, page);

    Pager {
        current,
        total: p.total_pages,
        prev_href: p
            .has_prev_page
            .then(|| href(p.prev_page.unwrap_or(current.saturating_sub(1).max(1)))),
        next_href: p
            .has_next_page
            .then(|| href(p.next_page.unwrap_or(current + 1))),
    }
}

fn render_server_list(
    title: &str,
    list: &[AnimeSummary],
    pager: &Pager,
    empty_message: &str,
    opts: &RenderOptions,
) -> String {
    let grid = if list.is_empty() {
        format!("<p>{}</p>", empty_message)
    } else {
        anime_grid(list, CardMeta::Listing, opts)
    };
    format!(
        r#"<h1 class="page-title">{}</h1>{}{}"#,
        esc(title),
        grid,
        pager.render()
    )
}

async fn load_server_list(
    ctx: &LoadContext<'_>,
    endpoint: String,
    base: &str,
    title: &str,
    page: u32,
) -> Result<String, PageError> {
    let envelope = fetch_envelope::<AnimeListData>(ctx.source, &endpoint).await?;
    let pager = server_pager(envelope.pagination.as_ref(), page, base);
    Ok(render_server_list(
        title,
        &envelope.data.anime_list,
        &pager,
        "Tidak ada anime yang tersedia dalam kategori ini.",
        ctx.options,
    ))
}

pub async fn load_ongoing(ctx: &LoadContext<'_>, page: u32) -> Result<String, PageError> {
    let endpoint = format!("ongoing?page={}", page);
    load_server_list(ctx, endpoint, "/ongoing", "Anime Sedang Tayang", page).await
}

pub async fn load_completed(ctx: &LoadContext<'_>, page: u32) -> Result<String, PageError> {
    let endpoint = format!("completed?page={}", page);
    load_server_list(ctx, endpoint, "/completed", "Anime Sudah Tamat", page).await
}

pub async fn load_genre(ctx: &LoadContext<'_>, genre_id: &str, page: u32) -> Result<String, PageError> {
    let endpoint = format!("genres/{}?page={}", segment(genre_id), page);
    let base = format!("/genres/{}", segment(genre_id));
    let title = format!("Anime Genre {}", capitalize(genre_id));
    load_server_list(ctx, endpoint, &base, &title, page).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Envelope;
    use crate::pages::testing::StubSource;
    use crate::pages::ReportSource;
    use serde_json::json;

    fn index_payload(count: usize) -> serde_json::Value {
        let first: Vec<_> = (0..count / 2)
            .map(|i| json!({ "animeId": format!("a{}", i), "title": format!("A{}", i) }))
            .collect();
        let second: Vec<_> = (count / 2..count)
            .map(|i| json!({ "animeId": format!("b{}", i), "title": format!("B{}", i) }))
            .collect();
        json!({ "ok": true, "data": { "list": [
            { "startWith": "A", "animeList": first },
            { "startWith": "B", "animeList": second }
        ]}})
    }

    fn render_index(count: usize, page: u32) -> String {
        let envelope = Envelope::<AnimeIndexData>::from_value(index_payload(count)).unwrap();
        render_anime_index(&envelope.data, page, &RenderOptions::default())
    }

    #[test]
    fn test_anime_index_last_page() {
        let html = render_index(45, 3);
        assert_eq!(html.matches(r#"<div class="anime-card">"#).count(), 5);
        assert!(html.contains("Halaman 3 dari 3"));
        assert!(html.contains(r#"href="/anime?page=2" data-page"#));
        assert!(html.contains(r#"<span class="disabled">Berikutnya &raquo;</span>"#));
    }

    #[test]
    fn test_anime_index_clamps_page() {
        let html = render_index(45, 40);
        assert!(html.contains("Halaman 3 dari 3"));

        let single = render_index(4, 2);
        assert_eq!(single.matches(r#"<div class="anime-card">"#).count(), 4);
        assert!(!single.contains("pagination"));
    }

    #[test]
    fn test_genre_cards() {
        let genres = vec![Genre { genre_id: "slice-of-life".to_string(), title: "slice of Life".to_string() }];
        let html = render_genres(&genres);
        assert!(html.contains(r#"<div class="genre-icon">S</div>"#));
        assert!(html.contains(r#"href="/genres/slice-of-life" data-page"#));
    }

    #[test]
    fn test_server_pager_clamps_current() {
        let pagination = Pagination {
            current_page: 9,
            total_pages: 4,
            has_prev_page: true,
            prev_page: Some(8),
            ..Pagination::default()
        };
        let pager = server_pager(Some(&pagination), 9, "/ongoing");
        assert_eq!(pager.current, 4);
        assert_eq!(pager.prev_href.as_deref(), Some("/ongoing?page=8"));
        assert_eq!(pager.next_href, None);
    }

    #[tokio::test]
    async fn test_genre_page() {
        let source = StubSource::new().with(
            "genres/action?page=2",
            json!({
                "ok": true,
                "data": { "animeList": [{ "animeId": "x", "title": "X", "score": 8.1 }] },
                "pagination": { "currentPage": 2, "totalPages": 3, "hasPrevPage": true, "prevPage": 1,
                                "hasNextPage": true, "nextPage": 3 }
            }),
        );
        let options = RenderOptions::default();
        let ctx = LoadContext { source: &source, options: &options, report_source: ReportSource::default() };
        let html = load_genre(&ctx, "action", 2).await.unwrap();

        assert!(html.contains("Anime Genre Action"));
        assert!(html.contains("Halaman 2 dari 3"));
        assert!(html.contains(r#"href="/genres/action?page=1" data-page"#));
        assert!(html.contains(r#"href="/genres/action?page=3" data-page"#));
        assert!(html.contains("8.1"));
    }

    #[tokio::test]
    async fn test_ongoing_without_pagination_has_no_pager() {
        let source = StubSource::new().with(
            "ongoing?page=1",
            json!({ "ok": true, "data": { "animeList": [{ "animeId": "x", "title": "X" }] } }),
        );
        let options = RenderOptions::default();
        let ctx = LoadContext { source: &source, options: &options, report_source: ReportSource::default() };
        let html = load_ongoing(&ctx, 1).await.unwrap();
        assert!(html.contains("Anime Sedang Tayang"));
        assert!(!html.contains("pagination"));
    }
}
