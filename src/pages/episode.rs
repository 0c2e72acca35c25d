// Episode and Server Pages
//
// The episode page shows the player, quality tabs with their servers,
// previous/next episode links and download qualities. Picking a server swaps
// only the player; the rest of the page is rendered from the same data.

use super::{fetch_envelope, LoadContext, Rendered, Snapshot};
use crate::error::PageError;
use crate::gateway::{DownloadGroup, EpisodeData, JsonSource, ServerEmbed, ServerGroup};
use crate::render::components::genre_tags;
use crate::render::{attr, esc, nav_link, safe_url, segment};
use regex::Regex;

lazy_static::lazy_static! {
    static ref EPISODE_SUFFIX: Regex =
        Regex::new(r" Episode \d+ Subtitle Indonesia$").expect("episode suffix pattern");
}

pub const VIDEO_FAILED_MESSAGE: &str = "Gagal memuat video. Coba server lain.";

/// What the video area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Player {
    /// The episode's default streaming URL, or the "pick a server" hint.
    Default,
    /// Embed URL of a selected server.
    Embed(String),
    /// A selected server failed to load.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeView {
    pub episode_id: String,
    pub data: EpisodeData,
    pub player: Player,
    pub active_server: Option<String>,
}

/// Anime title for the back link: the episode title without its trailing
/// " Episode N Subtitle Indonesia".
pub fn anime_title(episode_title: &str) -> String {
    EPISODE_SUFFIX.replace(episode_title, "").into_owned()
}

/// Resolve a server to its embed URL. A response without a usable `url` is a
/// shape error.
pub async fn fetch_embed(source: &dyn JsonSource, server_id: &str) -> Result<String, PageError> {
    let endpoint = format!("server/{}", segment(server_id));
    let envelope = fetch_envelope::<ServerEmbed>(source, &endpoint).await?;
    safe_url(envelope.data.url.as_deref())
        .ok_or_else(|| PageError::shape("server response has no embed url"))
}

pub async fn load(ctx: &LoadContext<'_>, episode_id: &str, server: Option<&str>) -> Result<Rendered, PageError> {
    let endpoint = format!("episode/{}", segment(episode_id));
    let envelope = fetch_envelope::<EpisodeData>(ctx.source, &endpoint).await?;

    let player = match server {
        Some(server_id) => match fetch_embed(ctx.source, server_id).await {
            Ok(url) => Player::Embed(url),
            Err(e) => {
                log::warn!("Server {} failed for episode {}: {}", server_id, episode_id, e);
                Player::Failed
            }
        },
        None => Player::Default,
    };

    let view = EpisodeView {
        episode_id: episode_id.to_string(),
        data: envelope.data,
        player,
        active_server: server.map(str::to_string),
    };
    Ok(Rendered::with_snapshot(render(&view), Snapshot::Episode(view)))
}

fn iframe(src: &str) -> String {
    format!(r#"<iframe src="{}" allowfullscreen></iframe>"#, attr(src))
}

fn video_area(view: &EpisodeView) -> String {
    let inner = match &view.player {
        Player::Embed(url) => iframe(url),
        Player::Failed => format!(r#"<div class="error-message"><p>{}</p></div>"#, VIDEO_FAILED_MESSAGE),
        Player::Default => match safe_url(view.data.default_streaming_url.as_deref()) {
            Some(url) => iframe(&url),
            None => r#"<div class="no-video-placeholder"><p>Pilih server untuk memutar video</p></div>"#
                .to_string(),
        },
    };
    format!(
        r#"<div class="video-container"><div class="video-player">{}</div></div>"#,
        inner
    )
}

fn server_selection(view: &EpisodeView, servers: &ServerGroup) -> String {
    if servers.qualities.is_empty() {
        return String::new();
    }

    let active = view.active_server.as_deref();
    // The list holding the active server is shown; otherwise the first one.
    let shown = servers
        .qualities
        .iter()
        .position(|q| q.server_list.iter().any(|s| Some(s.server_id.as_str()) == active))
        .unwrap_or(0);

    let tabs: String = servers
        .qualities
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let class = if i == shown { "quality-tab active" } else { "quality-tab" };
            format!(
                r#"<button class="{}" data-quality="{}">{}</button>"#,
                class,
                attr(&q.title),
                esc(&q.title)
            )
        })
        .collect();

    let lists: String = servers
        .qualities
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let buttons: String = q
                .server_list
                .iter()
                .map(|s| {
                    let class = if Some(s.server_id.as_str()) == active {
                        "server-button active"
                    } else {
                        "server-button"
                    };
                    let href = format!(
                        "/episode/{}?server={}",
                        segment(&view.episode_id),
                        urlencoding::encode(&s.server_id)
                    );
                    nav_link(&href, class, &esc(s.title.trim()))
                })
                .collect();
            format!(
                r#"<div class="server-list" data-quality="{}" style="display: {};">{}</div>"#,
                attr(&q.title),
                if i == shown { "flex" } else { "none" },
                buttons
            )
        })
        .collect();

    format!(
        concat!(
            r#"<div class="server-container"><h2>Pilih Kualitas dan Server</h2>"#,
            r#"<div class="quality-tabs">{}</div><div class="server-options">{}</div></div>"#
        ),
        tabs, lists
    )
}

fn episode_navigation(data: &EpisodeData) -> String {
    let prev = match data.prev_episode.as_ref().filter(|_| data.has_prev_episode) {
        Some(prev) => nav_link(
            &format!("/episode/{}", segment(&prev.episode_id)),
            "btn nav-prev",
            r#"<span class="arrow">&laquo;</span> Episode Sebelumnya"#,
        ),
        None => r#"<span class="btn disabled nav-prev">Episode Pertama</span>"#.to_string(),
    };
    let next = match data.next_episode.as_ref().filter(|_| data.has_next_episode) {
        Some(next) => nav_link(
            &format!("/episode/{}", segment(&next.episode_id)),
            "btn nav-next",
            r#"Episode Berikutnya <span class="arrow">&raquo;</span>"#,
        ),
        None => r#"<span class="btn disabled nav-next">Episode Terakhir</span>"#.to_string(),
    };

    let title = anime_title(&data.title);
    let back_label = if title.trim().is_empty() { "Anime".to_string() } else { esc(&title) };
    let back = nav_link(
        &format!("/anime/{}", segment(&data.anime_id)),
        "btn secondary",
        &format!(r#"<span class="arrow">&laquo;</span> Kembali ke {}"#, back_label),
    );

    format!(
        r#"<div class="episode-navigation"><div class="nav-buttons">{}{}</div><div class="back-to-anime">{}</div></div>"#,
        prev, next, back
    )
}

fn download_options(downloads: &DownloadGroup) -> String {
    if downloads.qualities.is_empty() {
        return String::new();
    }

    let cards: String = downloads
        .qualities
        .iter()
        .map(|quality| {
            let label = quality.title.replace("Mp4_", "").replace("MKV_", "");
            // External links: no navigation marker.
            let links: String = quality
                .urls
                .iter()
                .filter_map(|link| {
                    safe_url(Some(link.url.as_str())).map(|href| {
                        format!(
                            r#"<a href="{}" class="download-link" target="_blank" rel="noopener">{}</a>"#,
                            attr(&href),
                            esc(&link.title)
                        )
                    })
                })
                .collect();
            format!(
                concat!(
                    r#"<div class="quality-card"><div class="quality-header">"#,
                    r#"<span class="quality-title">{}</span><span class="quality-size">{}</span></div>"#,
                    r#"<div class="download-links">{}</div></div>"#
                ),
                esc(&label),
                esc(quality.size.as_deref().unwrap_or_default()),
                links
            )
        })
        .collect();

    format!(
        r#"<div class="download-section"><h2>Opsi Download</h2><div class="download-qualities">{}</div></div>"#,
        cards
    )
}

pub fn render(view: &EpisodeView) -> String {
    let data = &view.data;
    let genres = data
        .info
        .as_ref()
        .filter(|info| !info.genre_list.is_empty())
        .map(|info| format!(r#"<div class="genre-list">{}</div>"#, genre_tags(&info.genre_list)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="episode-detail"><div class="episode-header"><h1 class="page-title">{}</h1>"#,
            r#"<div class="episode-meta"><span class="release-time">{}</span>{}</div></div>"#,
            "{}{}{}{}</div>"
        ),
        esc(&data.title),
        esc(data.release_time.as_deref().unwrap_or_default()),
        genres,
        video_area(view),
        data.server.as_ref().map(|s| server_selection(view, s)).unwrap_or_default(),
        episode_navigation(data),
        data.download_url.as_ref().map(download_options).unwrap_or_default()
    )
}

/// `server/:id` as a page of its own: leave for `redirectUrl` when present,
/// otherwise show the embed in a player.
pub async fn load_server_page(ctx: &LoadContext<'_>, server_id: &str) -> Result<Rendered, PageError> {
    let endpoint = format!("server/{}", segment(server_id));
    let envelope = fetch_envelope::<ServerEmbed>(ctx.source, &endpoint).await?;

    if let Some(target) = safe_url(envelope.data.redirect_url.as_deref()) {
        log::info!("Server {} redirects to {}", server_id, target);
        return Ok(Rendered {
            html: r#"<div class="loading-container"><p>Mengalihkan ke server video...</p></div>"#.to_string(),
            snapshot: None,
            redirect: Some(target),
        });
    }

    let url = safe_url(envelope.data.url.as_deref())
        .ok_or_else(|| PageError::shape("server response has no embed url"))?;
    Ok(Rendered::fragment(format!(
        r#"<div class="server-page"><h1 class="page-title">Server Video</h1><div class="video-container"><div class="video-player">{}</div></div></div>"#,
        iframe(&url)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::StubSource;
    use crate::pages::ReportSource;
    use crate::render::RenderOptions;
    use serde_json::json;

    fn episode_payload() -> serde_json::Value {
        json!({ "ok": true, "data": {
            "title": "Frieren Episode 12 Subtitle Indonesia",
            "animeId": "frieren",
            "releaseTime": "2 hari lalu",
            "defaultStreamingUrl": "https://stream.example/default",
            "hasPrevEpisode": true,
            "prevEpisode": { "episodeId": "frieren-episode-11" },
            "hasNextEpisode": false,
            "nextEpisode": null,
            "server": { "qualities": [
                { "title": "360p", "serverList": [{ "serverId": "s360", "title": " ondesu " }] },
                { "title": "720p", "serverList": [{ "serverId": "s720", "title": "vidhide" }] }
            ]},
            "downloadUrl": { "qualities": [
                { "title": "Mp4_480p", "size": "80 MB", "urls": [
                    { "title": "Pdrain", "url": " https://dl.example/480 " },
                    { "title": "Bad", "url": "javascript:alert(1)" }
                ]}
            ]},
            "info": { "genreList": [{ "genreId": "fantasy", "title": "Fantasy" }] }
        }})
    }

    fn ctx<'a>(source: &'a StubSource, options: &'a RenderOptions) -> LoadContext<'a> {
        LoadContext { source, options, report_source: ReportSource::default() }
    }

    #[test]
    fn test_anime_title_strips_suffix() {
        assert_eq!(anime_title("Frieren Episode 12 Subtitle Indonesia"), "Frieren");
        assert_eq!(anime_title("Frieren Episode 12"), "Frieren Episode 12");
        assert_eq!(anime_title("Episode 3 Subtitle Indonesia Special"), "Episode 3 Subtitle Indonesia Special");
    }

    #[tokio::test]
    async fn test_episode_page_default_player() {
        let source = StubSource::new().with("episode/frieren-episode-12", episode_payload());
        let options = RenderOptions::default();
        let rendered = load(&ctx(&source, &options), "frieren-episode-12", None).await.unwrap();
        let html = &rendered.html;

        assert!(html.contains(r#"<iframe src="https://stream.example/default" allowfullscreen>"#));
        assert!(html.contains(r#"href="/episode/frieren-episode-11" class="btn nav-prev" data-page"#));
        assert!(html.contains("Episode Terakhir"));
        assert!(html.contains("Kembali ke Frieren"));
        assert!(html.contains(r#"href="/anime/frieren" class="btn secondary" data-page"#));
        assert!(html.contains(r#"<span class="quality-title">480p</span>"#));
        assert!(html.contains(r#"href="https://dl.example/480" class="download-link" target="_blank""#));
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"href="/episode/frieren-episode-12?server=s360" class="server-button" data-page>ondesu</a>"#));
        assert!(matches!(rendered.snapshot, Some(Snapshot::Episode(_))));
    }

    #[tokio::test]
    async fn test_episode_with_server_fetches_embed() {
        let source = StubSource::new()
            .with("episode/frieren-episode-12", episode_payload())
            .with("server/s720", json!({ "ok": true, "data": { "url": "https://embed.example/720" } }));
        let options = RenderOptions::default();
        let rendered = load(&ctx(&source, &options), "frieren-episode-12", Some("s720")).await.unwrap();

        assert!(rendered.html.contains(r#"<iframe src="https://embed.example/720""#));
        assert!(rendered.html.contains(r#"class="server-button active""#));
        assert!(rendered.html.contains(r#"<button class="quality-tab active" data-quality="720p">"#));
    }

    #[tokio::test]
    async fn test_failed_server_keeps_page() {
        let source = StubSource::new()
            .with("episode/frieren-episode-12", episode_payload())
            .with("server/gone", json!({ "ok": true, "data": {} }));
        let options = RenderOptions::default();
        let rendered = load(&ctx(&source, &options), "frieren-episode-12", Some("gone")).await.unwrap();

        assert!(rendered.html.contains(VIDEO_FAILED_MESSAGE));
        assert!(rendered.html.contains("Opsi Download"));
    }

    #[tokio::test]
    async fn test_server_page_redirect_and_embed() {
        let source = StubSource::new()
            .with("server/r", json!({ "ok": true, "data": { "redirectUrl": "https://mirror.example/x" } }))
            .with("server/e", json!({ "ok": true, "data": { "url": "https://embed.example/e" } }))
            .with("server/m", json!({ "ok": true, "data": {} }));
        let options = RenderOptions::default();
        let c = ctx(&source, &options);

        let redirect = load_server_page(&c, "r").await.unwrap();
        assert_eq!(redirect.redirect.as_deref(), Some("https://mirror.example/x"));

        let embed = load_server_page(&c, "e").await.unwrap();
        assert!(embed.html.contains("https://embed.example/e"));
        assert_eq!(embed.redirect, None);

        assert!(load_server_page(&c, "m").await.unwrap_err().is_shape());
    }
}
