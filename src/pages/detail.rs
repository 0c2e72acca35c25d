// Anime Detail Page
//
// Poster, metadata and synopsis, then the episode list in pages of 25 with a
// three-button window and first / previous / next / last controls. The
// fetched detail is returned as a snapshot so episode paging can re-render
// without another request.

use super::{fetch_envelope, LoadContext, Rendered, Snapshot};
use crate::error::PageError;
use crate::gateway::{AnimeDetail, EpisodeRef};
use crate::pagination::{page_window, paginate, EPISODE_PAGE_SIZE, EPISODE_PAGE_WINDOW};
use crate::render::components::{anime_grid, genre_tags, CardMeta};
use crate::render::{attr, esc, initial, nav_link, or_na, safe_url, segment, RenderOptions};

pub async fn load(ctx: &LoadContext<'_>, anime_id: &str, episode_page: u32) -> Result<Rendered, PageError> {
    let endpoint = format!("anime/{}", segment(anime_id));
    let envelope = fetch_envelope::<AnimeDetail>(ctx.source, &endpoint).await?;
    let detail = envelope.data;
    let html = render(anime_id, &detail, episode_page, ctx.options);
    Ok(Rendered::with_snapshot(
        html,
        Snapshot::Detail {
            anime_id: anime_id.to_string(),
            detail,
        },
    ))
}

/// Number of episode pages for `detail`.
pub fn episode_page_count(detail: &AnimeDetail) -> u32 {
    crate::pagination::total_pages(detail.episode_list.len(), EPISODE_PAGE_SIZE)
}

fn page_href(anime_id: &str, page: u32) -> String {
    format!("/anime/{}?episode_page={}", segment(anime_id), page)
}

fn episode_card(episode: &EpisodeRef) -> String {
    let label = episode.title.as_deref().unwrap_or(&episode.episode_id);
    nav_link(
        &format!("/episode/{}", segment(&episode.episode_id)),
        "episode-card",
        &format!(r#"<div class="episode-number">Episode {}</div>"#, esc(label)),
    )
}

fn nav_control(anime_id: &str, target: u32, enabled: bool, class: &str, label: &str) -> String {
    if enabled {
        nav_link(&page_href(anime_id, target), class, label)
    } else {
        format!(r#"<span class="{} disabled">{}</span>"#, class, label)
    }
}

fn episode_pagination(anime_id: &str, current: u32, total: u32) -> String {
    if total <= 1 {
        return String::new();
    }

    let buttons: String = page_window(current, total, EPISODE_PAGE_WINDOW)
        .map(|page| {
            let class = if page == current { "page-btn current-page" } else { "page-btn" };
            nav_link(&page_href(anime_id, page), class, &page.to_string())
        })
        .collect();

    let at_start = current == 1;
    let at_end = current == total;
    format!(
        concat!(
            r#"<div class="episode-pagination"><div class="pagination-pages">{}</div>"#,
            r#"<div class="pagination-nav"><div class="nav-left">{}{}</div>"#,
            r#"<div class="nav-right">{}{}</div></div></div>"#
        ),
        buttons,
        nav_control(anime_id, 1, !at_start, "nav-prev", "&larr; Awal"),
        nav_control(anime_id, current.saturating_sub(1).max(1), !at_start, "nav-prev", "&larr; Sebelumnya"),
        nav_control(anime_id, (current + 1).min(total), !at_end, "nav-next", "Selanjutnya &rarr;"),
        nav_control(anime_id, total, !at_end, "nav-next", "Akhir &rarr;"),
    )
}

fn meta_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="meta-item"><span class="meta-label">{}:</span><span class="meta-value">{}</span></div>"#,
        label, value
    )
}

fn poster(detail: &AnimeDetail) -> String {
    match safe_url(detail.poster.as_deref()) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="anime-detail-poster">"#,
            attr(&src),
            attr(&detail.title)
        ),
        None => format!(
            r#"<div class="poster-placeholder"><span class="placeholder-initial">{}</span></div>"#,
            esc(&initial(&detail.title))
        ),
    }
}

fn production_info(detail: &AnimeDetail) -> String {
    let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(esc);
    let studios = present(&detail.studios);
    let producers = present(&detail.producers);
    if studios.is_none() && producers.is_none() {
        return String::new();
    }

    let item = |label: &str, value: String| {
        format!(
            r#"<div class="info-item"><span class="info-label">{}:</span><span class="info-value">{}</span></div>"#,
            label, value
        )
    };
    let mut html = String::from(r#"<div class="production-info">"#);
    if let Some(studios) = studios {
        html.push_str(&item("Studio", studios));
    }
    if let Some(producers) = producers {
        html.push_str(&item("Produser", producers));
    }
    html.push_str("</div>");
    html
}

pub fn render(anime_id: &str, detail: &AnimeDetail, episode_page: u32, opts: &RenderOptions) -> String {
    let status_class = if detail.status.as_deref().map(str::trim) == Some("Ongoing") {
        "status-ongoing"
    } else {
        "status-completed"
    };
    let title = if detail.title.trim().is_empty() {
        "Judul Anime".to_string()
    } else {
        esc(&detail.title)
    };

    let japanese = detail
        .japanese
        .as_deref()
        .filter(|j| !j.trim().is_empty())
        .map(|j| format!(r#"<p class="anime-japanese">{}</p>"#, esc(j)))
        .unwrap_or_default();

    let meta = [
        format!(
            r#"<div class="meta-item"><span class="meta-label">Status:</span><span class="meta-value status-badge {}">{}</span></div>"#,
            status_class,
            or_na(detail.status.as_deref(), "N/A")
        ),
        meta_item("Tipe", &or_na(detail.anime_type.as_deref(), "TV")),
        meta_item("Episode", &or_na(detail.episodes.as_deref(), "N/A")),
        meta_item("Durasi", &or_na(detail.duration.as_deref(), "N/A")),
        meta_item("Rilis", &or_na(detail.aired.as_deref(), "N/A")),
        format!(
            r#"<div class="meta-item"><span class="meta-label">Skor:</span><span class="meta-value anime-score"><span class="score-icon">★</span> {}</span></div>"#,
            or_na(detail.score.as_deref(), "N/A")
        ),
    ]
    .concat();

    let genres = if detail.genre_list.is_empty() {
        "Tidak ada genre".to_string()
    } else {
        genre_tags(&detail.genre_list)
    };

    let synopsis: String = detail
        .synopsis
        .as_ref()
        .map(|s| s.paragraphs())
        .unwrap_or_default()
        .into_iter()
        .map(|p| format!("<p>{}</p>", esc(p)))
        .collect();
    let synopsis = if synopsis.is_empty() {
        "<p>Sinopsis belum tersedia.</p>".to_string()
    } else {
        synopsis
    };

    let episodes = if detail.episode_list.is_empty() {
        String::new()
    } else {
        let local = paginate(&detail.episode_list, episode_page, EPISODE_PAGE_SIZE);
        let cards: String = local.items.iter().map(episode_card).collect();
        format!(
            r#"<div class="episode-list"><h2>Daftar Episode</h2><div class="episodes-grid">{}</div>{}</div>"#,
            cards,
            episode_pagination(anime_id, local.current, local.total_pages)
        )
    };

    let recommended = if detail.recommended_anime_list.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="recommended-section"><h2>Mungkin Anda Suka</h2>{}</div>"#,
            anime_grid(&detail.recommended_anime_list, CardMeta::TitleOnly, opts)
        )
    };

    format!(
        concat!(
            r#"<div class="anime-detail"><div class="anime-detail-header">"#,
            r#"<div class="poster-container">{}</div>"#,
            r#"<div class="anime-detail-info"><h1 class="anime-detail-title">{}</h1>{}"#,
            r#"<div class="anime-meta">{}</div><div class="genre-list">{}</div></div></div>"#,
            r#"<div class="anime-detail-content"><div class="synopsis-section"><h2>Sinopsis</h2>"#,
            r#"<div class="synopsis-content">{}</div></div>{}{}{}</div></div>"#
        ),
        poster(detail),
        title,
        japanese,
        meta,
        genres,
        synopsis,
        production_info(detail),
        episodes,
        recommended
    )
}
