// Home Page
//
// Hero banner for the first ongoing anime plus two ten-card sections.

use super::{fetch_envelope, LoadContext};
use crate::error::PageError;
use crate::gateway::{AnimeSummary, HomeData};
use crate::render::components::{anime_grid, anime_href, CardMeta};
use crate::render::{attr, esc, nav_link, or_na, safe_url, truncate_title, RenderOptions};

/// Cards shown per home section.
pub const SECTION_CARDS: usize = 10;

pub async fn load(ctx: &LoadContext<'_>) -> Result<String, PageError> {
    let envelope = fetch_envelope::<HomeData>(ctx.source, "home").await?;
    Ok(render(&envelope.data, ctx.options))
}

pub fn render(home: &HomeData, opts: &RenderOptions) -> String {
    let ongoing = &home.ongoing.anime_list;
    let completed = &home.completed.anime_list;

    let mut html = String::from(r#"<div class="hero-section">"#);
    match ongoing.first() {
        Some(featured) => html.push_str(&hero(featured, opts)),
        None => html.push_str(&welcome_hero()),
    }
    html.push_str("</div>");

    html.push_str(&section(
        "ongoing-section",
        "Anime Sedang Tayang",
        "/ongoing",
        ongoing,
        CardMeta::Airing,
        opts,
    ));
    html.push_str(&section(
        "completed-section",
        "Anime Sudah Tamat",
        "/completed",
        completed,
        CardMeta::Finished,
        opts,
    ));
    html
}

fn hero(featured: &AnimeSummary, opts: &RenderOptions) -> String {
    let background = safe_url(featured.poster.as_deref())
        .map(|src| format!(r#" style="background-image: url('{}')""#, attr(&src)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="hero-content"{}><div class="hero-overlay"></div><div class="hero-info">"#,
            r#"<h1 class="hero-title" title="{}">{}</h1>"#,
            r#"<p class="hero-description">Sedang tayang setiap hari {}</p>"#,
            r#"<div class="hero-meta"><span>{} episode</span><span>Terbaru: {}</span></div>"#,
            "{}</div></div>"
        ),
        background,
        attr(&featured.title),
        esc(&truncate_title(&featured.title, opts.hero_title_max)),
        or_na(featured.release_day.as_deref(), "-"),
        or_na(featured.episodes.as_deref(), "?"),
        or_na(featured.latest_release_date.as_deref(), "-"),
        nav_link(&anime_href(&featured.anime_id), "hero-button", "Nonton Sekarang")
    )
}

fn welcome_hero() -> String {
    format!(
        concat!(
            r#"<div class="hero-content placeholder"><div class="hero-info">"#,
            r#"<h1 class="hero-title">NontonAnime</h1>"#,
            r#"<p class="hero-description">Platform favorit Anda untuk menonton anime online</p>"#,
            "{}</div></div>"
        ),
        nav_link("/anime", "hero-button", "Jelajahi Anime")
    )
}

fn section(
    class: &str,
    title: &str,
    view_all: &str,
    list: &[AnimeSummary],
    meta: CardMeta,
    opts: &RenderOptions,
) -> String {
    if list.is_empty() {
        return String::new();
    }
    format!(
        concat!(
            r#"<section class="section {}"><div class="section-header">"#,
            r#"<h2 class="section-title">{}</h2>{}</div>{}</section>"#
        ),
        class,
        title,
        nav_link(view_all, "view-all", "Lihat Semua"),
        anime_grid(list.iter().take(SECTION_CARDS), meta, opts)
    )
}
