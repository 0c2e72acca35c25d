// Schedule Page
//
// The gateway has no schedule endpoint of its own; the first page of ongoing
// anime is grouped by release day instead.

use super::{fetch_envelope, LoadContext};
use crate::error::PageError;
use crate::gateway::{AnimeListData, AnimeSummary};
use crate::render::components::{anime_grid, CardMeta};
use crate::render::RenderOptions;
use crate::schedule::{group_by_release_day, ScheduleDay};

pub async fn load(ctx: &LoadContext<'_>) -> Result<String, PageError> {
    let envelope = fetch_envelope::<AnimeListData>(ctx.source, "ongoing?page=1").await?;
    let days = group_by_release_day(&envelope.data.anime_list);
    log::debug!("Schedule grouped into {} non-empty days", days.len());
    Ok(render(&days, ctx.options))
}

pub fn render(days: &[ScheduleDay], opts: &RenderOptions) -> String {
    let sections: String = days
        .iter()
        .map(|day| {
            let cards: Vec<AnimeSummary> = day.anime_list.iter().map(AnimeSummary::from).collect();
            format!(
                r#"<section class="schedule-day" id="day-{}"><h2 class="day-title">{}</h2>{}</section>"#,
                day.day.slug(),
                day.day,
                anime_grid(&cards, CardMeta::TitleOnly, opts)
            )
        })
        .collect();

    let body = if sections.is_empty() {
        "<p>Belum ada jadwal tayang yang tersedia.</p>".to_string()
    } else {
        sections
    };

    format!(
        r#"<h1 class="page-title">Jadwal Tayang Anime</h1><div class="schedule-content">{}</div>"#,
        body
    )
}
