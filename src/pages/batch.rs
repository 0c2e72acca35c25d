// Batch Page
//
// Whole-season download links for one batch release.

use super::{fetch_envelope, LoadContext};
use crate::error::PageError;
use crate::gateway::BatchData;
use crate::render::components::thumbnail;
use crate::render::{attr, esc, or_na, safe_url, segment};

pub async fn load(ctx: &LoadContext<'_>, batch_id: &str) -> Result<String, PageError> {
    let endpoint = format!("batch/{}", segment(batch_id));
    let envelope = fetch_envelope::<BatchData>(ctx.source, &endpoint).await?;
    Ok(render(&envelope.data))
}

/// One external button per quality, ordered by quality name.
fn download_buttons(batch: &BatchData) -> String {
    let buttons: String = batch
        .download_links
        .iter()
        .flatten()
        .filter_map(|(quality, url)| {
            safe_url(Some(url.as_str())).map(|href| {
                format!(
                    r#"<a href="{}" class="btn" target="_blank" rel="noopener">{}</a>"#,
                    attr(&href),
                    esc(quality)
                )
            })
        })
        .collect();

    if buttons.is_empty() {
        "<p>Link download tidak tersedia</p>".to_string()
    } else {
        buttons
    }
}

pub fn render(batch: &BatchData) -> String {
    let title = batch
        .display_title()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Judul Anime");

    let synopsis: Vec<String> = batch
        .synopsis
        .as_ref()
        .map(|s| s.paragraphs())
        .unwrap_or_default()
        .into_iter()
        .map(|p| format!("<p>{}</p>", esc(p)))
        .collect();
    let synopsis = if synopsis.is_empty() {
        "<p>Sinopsis batch belum tersedia.</p>".to_string()
    } else {
        synopsis.concat()
    };

    format!(
        concat!(
            r#"<div class="batch-detail"><h1 class="page-title">Download Batch {}</h1>"#,
            r#"<div class="batch-info"><div class="batch-poster">{}</div>"#,
            r#"<div class="batch-details"><h2>{}</h2><p class="batch-status">Status: {}</p>"#,
            r#"<div class="batch-synopsis"><h3>Sinopsis</h3>{}</div>"#,
            r#"<div class="batch-download"><h3>Opsi Download</h3><div class="quality-buttons">{}</div></div>"#,
            "</div></div></div>"
        ),
        esc(title),
        thumbnail(title, batch.cover(), "batch-thumbnail"),
        esc(title),
        or_na(batch.status.as_deref(), "N/A"),
        synopsis,
        download_buttons(batch)
    )
}
