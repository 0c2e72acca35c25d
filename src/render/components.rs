// Reusable fragment pieces: cards, grids, pagers, genre tags and the fixed
// loading / error / not-found fragments.

use super::{attr, esc, initial, nav_link, safe_url, segment, truncate_title, RenderOptions};
use crate::gateway::{AnimeSummary, Genre};

/// Which metadata lines a card shows under its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMeta {
    /// Episodes, release day and latest release (home, ongoing section).
    Airing,
    /// Episodes, score and last release (home, completed section).
    Finished,
    /// Whatever of episodes / score / last release is present.
    Listing,
    /// Title only.
    TitleOnly,
}

pub fn loading_fragment() -> String {
    concat!(
        r#"<div class="loading-container">"#,
        r#"<div class="loading-spinner"></div>"#,
        "<p>Loading anime content...</p>",
        "</div>"
    )
    .to_string()
}

pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<div class="error-message"><h2>Error</h2><p>{}</p>{}</div>"#,
        esc(message),
        nav_link("/", "btn", "Kembali ke Beranda")
    )
}

pub fn not_found_fragment() -> String {
    format!(
        concat!(
            r#"<div class="error-404"><h1>404</h1><h2>Halaman Tidak Ditemukan</h2>"#,
            "<p>Halaman yang Anda cari tidak ada atau telah dipindahkan.</p>{}</div>"
        ),
        nav_link("/", "btn", "Kembali ke Beranda")
    )
}

/// Poster image, or the initial-letter placeholder when there is no usable URL.
pub fn thumbnail(title: &str, poster: Option<&str>, img_class: &str) -> String {
    match safe_url(poster) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="{}" loading="lazy">"#,
            attr(&src),
            attr(title),
            img_class
        ),
        None => format!(
            r#"<div class="anime-thumbnail-placeholder"><span class="thumbnail-initial">{}</span></div>"#,
            esc(&initial(title))
        ),
    }
}

pub fn anime_href(anime_id: &str) -> String {
    format!("/anime/{}", segment(anime_id))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn score_badge(score: &str) -> String {
    format!(
        r#"<span class="anime-score"><span class="score-icon">★</span> {}</span>"#,
        esc(score)
    )
}

fn card_meta(anime: &AnimeSummary, meta: CardMeta) -> String {
    let episodes = present(anime.episodes.as_deref());
    let score = present(anime.score.as_deref());
    let mut out = String::new();

    match meta {
        CardMeta::TitleOnly => {}
        CardMeta::Airing => {
            out.push_str(r#"<div class="anime-meta">"#);
            if let Some(eps) = episodes {
                out.push_str(&format!(r#"<span class="episode-info">{} eps</span>"#, esc(eps)));
            }
            if let Some(day) = present(anime.release_day.as_deref()) {
                out.push_str(&format!(r#"<span class="release-day">{}</span>"#, esc(day)));
            }
            out.push_str("</div>");
            if let Some(date) = present(anime.latest_release_date.as_deref()) {
                out.push_str(&format!(
                    r#"<div class="release-date">Terbaru: {}</div>"#,
                    esc(date)
                ));
            }
        }
        CardMeta::Finished | CardMeta::Listing => {
            out.push_str(r#"<div class="anime-meta">"#);
            if let Some(eps) = episodes {
                out.push_str(&format!(r#"<span class="episode-info">{} eps</span>"#, esc(eps)));
            }
            if let Some(score) = score {
                out.push_str(&score_badge(score));
            }
            out.push_str("</div>");
            if let Some(date) = present(anime.last_release_date.as_deref()) {
                out.push_str(&format!(r#"<div class="release-date">Rilis: {}</div>"#, esc(date)));
            }
        }
    }
    out
}

pub fn anime_card(anime: &AnimeSummary, meta: CardMeta, opts: &RenderOptions) -> String {
    let inner = format!(
        r#"{}<div class="anime-info"><h3 class="anime-title" title="{}">{}</h3>{}</div>"#,
        thumbnail(&anime.title, anime.poster.as_deref(), "anime-thumbnail"),
        attr(&anime.title),
        esc(&truncate_title(&anime.title, opts.title_max)),
        card_meta(anime, meta)
    );
    format!(
        r#"<div class="anime-card">{}</div>"#,
        nav_link(&anime_href(&anime.anime_id), "", &inner)
    )
}

pub fn anime_grid<'a, I>(anime: I, meta: CardMeta, opts: &RenderOptions) -> String
where
    I: IntoIterator<Item = &'a AnimeSummary>,
{
    let cards: String = anime
        .into_iter()
        .map(|a| anime_card(a, meta, opts))
        .collect();
    format!(r#"<div class="anime-grid">{}</div>"#, cards)
}

pub fn genre_tags(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| {
            nav_link(
                &format!("/genres/{}", segment(&g.genre_id)),
                "genre-tag",
                &esc(&g.title),
            )
        })
        .collect()
}

/// Previous / next pager with a "Halaman X dari Y" label. Renders nothing for
/// a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub total: u32,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl Pager {
    pub fn render(&self) -> String {
        if self.total <= 1 {
            return String::new();
        }

        let prev = match &self.prev_href {
            Some(href) => nav_link(href, "", "&laquo; Sebelumnya"),
            None => r#"<span class="disabled">&laquo; Sebelumnya</span>"#.to_string(),
        };
        let next = match &self.next_href {
            Some(href) => nav_link(href, "", "Berikutnya &raquo;"),
            None => r#"<span class="disabled">Berikutnya &raquo;</span>"#.to_string(),
        };

        format!(
            r#"<div class="pagination">{}<span class="current-page">Halaman {} dari {}</span>{}</div>"#,
            prev, self.current, self.total, next
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str, poster: Option<&str>) -> AnimeSummary {
        AnimeSummary {
            anime_id: "kimi-no-na-wa".to_string(),
            title: title.to_string(),
            poster: poster.map(str::to_string),
            episodes: Some("12".to_string()),
            score: Some("8.9".to_string()),
            ..AnimeSummary::default()
        }
    }

    #[test]
    fn test_card_without_poster_uses_initial() {
        let card = anime_card(&summary("naruto", None), CardMeta::TitleOnly, &RenderOptions::default());
        assert!(card.contains(r#"<span class="thumbnail-initial">N</span>"#));
        assert!(!card.contains("<img"));
        assert!(card.contains(r#"href="/anime/kimi-no-na-wa" data-page"#));
    }

    #[test]
    fn test_card_escapes_title_and_rejects_script_poster() {
        let card = anime_card(
            &summary("<script>x</script>", Some("javascript:alert(1)")),
            CardMeta::Listing,
            &RenderOptions::default(),
        );
        assert!(!card.contains("<script>"));
        assert!(card.contains("&lt;script&gt;"));
        assert!(!card.contains("javascript:"));
        assert!(card.contains("12 eps"));
        assert!(card.contains("8.9"));
    }

    #[test]
    fn test_card_truncates_title() {
        let title = "A".repeat(35);
        let card = anime_card(&summary(&title, None), CardMeta::TitleOnly, &RenderOptions::default());
        assert!(card.contains(&format!("{}...", "A".repeat(30))));
        // Full title stays available as the tooltip.
        assert!(card.contains(&format!(r#"title="{}""#, title)));
    }

    #[test]
    fn test_pager() {
        let single = Pager { current: 1, total: 1, prev_href: None, next_href: None };
        assert_eq!(single.render(), "");

        let middle = Pager {
            current: 2,
            total: 3,
            prev_href: Some("/ongoing?page=1".to_string()),
            next_href: None,
        };
        let html = middle.render();
        assert!(html.contains(r#"href="/ongoing?page=1" data-page"#));
        assert!(html.contains("Halaman 2 dari 3"));
        assert!(html.contains(r#"<span class="disabled">Berikutnya &raquo;</span>"#));
    }

    #[test]
    fn test_error_fragment_links_home() {
        let html = error_fragment("Gagal <memuat>");
        assert!(html.contains("Gagal &lt;memuat&gt;"));
        assert!(html.contains(r#"href="/" class="btn" data-page"#));
    }
}
