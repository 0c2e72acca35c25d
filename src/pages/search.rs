// Search Page
//
// Result grid for the `q` query, or an empty-result notice.

use super::{fetch_envelope, LoadContext};
use crate::error::PageError;
use crate::gateway::{AnimeListData, AnimeSummary};
use crate::render::components::{anime_grid, CardMeta};
use crate::render::{esc, nav_link, RenderOptions};

pub async fn load(ctx: &LoadContext<'_>, query: &str) -> Result<String, PageError> {
    let endpoint = format!("search?q={}", urlencoding::encode(query));
    let envelope = fetch_envelope::<AnimeListData>(ctx.source, &endpoint).await?;
    Ok(render(query, &envelope.data.anime_list, ctx.options))
}

pub fn render(query: &str, results: &[AnimeSummary], opts: &RenderOptions) -> String {
    if results.is_empty() {
        return format!(
            concat!(
                r#"<h1 class="page-title">Tidak Ada Hasil Ditemukan</h1>"#,
                r#"<p>Maaf, kami tidak dapat menemukan anime yang cocok dengan "{}". "#,
                "Silakan coba kata kunci pencarian lain.</p>",
                r#"<div class="text-center">{}</div>"#
            ),
            esc(query),
            nav_link("/", "btn", "Kembali ke Beranda")
        );
    }

    format!(
        r#"<h1 class="page-title">Hasil Pencarian untuk "{}"</h1>{}"#,
        esc(query),
        anime_grid(results, CardMeta::Listing, opts)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::StubSource;
    use crate::pages::ReportSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_encodes_query() {
        let source = StubSource::new().with(
            "search?q=one%20piece",
            json!({ "ok": true, "data": { "animeList": [{ "animeId": "op", "title": "One Piece" }] } }),
        );
        let options = RenderOptions::default();
        let ctx = LoadContext { source: &source, options: &options, report_source: ReportSource::default() };
        let html = load(&ctx, "one piece").await.unwrap();
        assert!(html.contains("Hasil Pencarian untuk \"one piece\""));
        assert!(html.contains(r#"href="/anime/op" data-page"#));
    }

    #[test]
    fn test_empty_results() {
        let html = render("<zzz>", &[], &RenderOptions::default());
        assert!(html.contains("Tidak Ada Hasil Ditemukan"));
        assert!(html.contains("&lt;zzz&gt;"));
        assert!(!html.contains("anime-grid"));
    }
}
