// Page Pipeline
//
// One loader per page: fetch from the gateway, check the envelope, render a
// fragment. `load` is the failure boundary; whatever goes wrong inside a
// loader comes out as that page's error fragment, never as a partial page.

pub mod batch;
pub mod detail;
pub mod episode;
pub mod home;
pub mod listing;
pub mod report;
pub mod schedule;
pub mod search;

use crate::error::PageError;
use crate::gateway::{AnimeDetail, Envelope, JsonSource};
use crate::render::components::{error_fragment, not_found_fragment};
use crate::render::RenderOptions;
use crate::router::Page;
use serde::de::DeserializeOwned;

pub use episode::{EpisodeView, Player};
pub use report::ReportSource;

pub struct LoadContext<'a> {
    pub source: &'a dyn JsonSource,
    pub options: &'a RenderOptions,
    /// Page the user came from; only the report page reads it.
    pub report_source: ReportSource,
}

/// Payload kept after a render so in-page actions can re-render without a
/// refetch (episode paging, server switching).
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Detail { anime_id: String, detail: AnimeDetail },
    Episode(EpisodeView),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    pub html: String,
    pub snapshot: Option<Snapshot>,
    /// External URL the page wants to leave for instead of rendering.
    pub redirect: Option<String>,
}

impl Rendered {
    pub fn fragment(html: String) -> Self {
        Self {
            html,
            ..Self::default()
        }
    }

    pub fn with_snapshot(html: String, snapshot: Snapshot) -> Self {
        Self {
            html,
            snapshot: Some(snapshot),
            redirect: None,
        }
    }
}

/// Fetch `endpoint` and unwrap its envelope as `T`.
pub(crate) async fn fetch_envelope<T: DeserializeOwned>(
    source: &dyn JsonSource,
    endpoint: &str,
) -> Result<Envelope<T>, PageError> {
    let value = source.fetch_json(endpoint).await?;
    Envelope::from_value(value)
}

/// Run the loader for `page`. Always produces a fragment.
pub async fn load(page: &Page, ctx: &LoadContext<'_>) -> Rendered {
    let result = match page {
        Page::Home => home::load(ctx).await.map(Rendered::fragment),
        Page::Schedule => schedule::load(ctx).await.map(Rendered::fragment),
        Page::AnimeIndex { page } => listing::load_anime_index(ctx, *page).await.map(Rendered::fragment),
        Page::Genres => listing::load_genres(ctx).await.map(Rendered::fragment),
        Page::Genre { id, page } => listing::load_genre(ctx, id, *page).await.map(Rendered::fragment),
        Page::Ongoing { page } => listing::load_ongoing(ctx, *page).await.map(Rendered::fragment),
        Page::Completed { page } => listing::load_completed(ctx, *page).await.map(Rendered::fragment),
        Page::Search { query: Some(query) } => search::load(ctx, query).await.map(Rendered::fragment),
        Page::Search { query: None } => Ok(Rendered::fragment(error_fragment(
            "Silakan masukkan kata kunci pencarian",
        ))),
        Page::AnimeDetail { id, episode_page } => detail::load(ctx, id, *episode_page).await,
        Page::Episode { id, server } => episode::load(ctx, id, server.as_deref()).await,
        Page::Server { id } => episode::load_server_page(ctx, id).await,
        Page::Batch { id } => batch::load(ctx, id).await.map(Rendered::fragment),
        Page::Report => Ok(Rendered::fragment(report::render(&ctx.report_source, None))),
        Page::NotFound => Ok(Rendered::fragment(not_found_fragment())),
    };

    result.unwrap_or_else(|err| {
        log::warn!("Failed to load {:?}: {}", page, err);
        Rendered::fragment(error_fragment(&failure_message(page, &err)))
    })
}

/// User-facing message for a failed page load.
pub fn failure_message(page: &Page, err: &PageError) -> String {
    if let Page::Search { query: Some(query) } = page {
        return format!(
            "Tidak ada hasil ditemukan untuk \"{}\". Silakan coba pencarian lain.",
            query
        );
    }

    let subject = match page {
        Page::Home => "halaman beranda".to_string(),
        Page::Schedule => "jadwal tayang".to_string(),
        Page::AnimeIndex { .. } => "daftar anime".to_string(),
        Page::Genres => "daftar genre".to_string(),
        Page::Genre { id, .. } => format!("anime untuk genre \"{}\"", id),
        Page::Ongoing { .. } => "anime sedang tayang".to_string(),
        Page::Completed { .. } => "anime sudah tamat".to_string(),
        Page::AnimeDetail { id, .. } => format!("detail anime \"{}\"", id),
        Page::Episode { id, .. } => format!("episode \"{}\"", id),
        Page::Server { id } => format!("server \"{}\"", id),
        Page::Batch { id } => format!("batch \"{}\"", id),
        Page::Search { .. } | Page::Report | Page::NotFound => "halaman".to_string(),
    };

    if err.is_shape() {
        format!("Gagal memuat {}. Format data tidak valid dari API.", subject)
    } else {
        format!("Gagal memuat {}. Silakan coba lagi nanti.", subject)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::PageError;
    use crate::gateway::JsonSource;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned gateway: endpoint -> response, with optional per-endpoint delay.
    #[derive(Default)]
    pub struct StubSource {
        responses: HashMap<String, Result<Value, PageError>>,
        delays: HashMap<String, Duration>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, endpoint: &str, body: Value) -> Self {
            self.responses.insert(endpoint.to_string(), Ok(body));
            self
        }

        pub fn failing(mut self, endpoint: &str, err: PageError) -> Self {
            self.responses.insert(endpoint.to_string(), Err(err));
            self
        }

        pub fn delayed(mut self, endpoint: &str, delay: Duration) -> Self {
            self.delays.insert(endpoint.to_string(), delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JsonSource for StubSource {
        async fn fetch_json(&self, endpoint: &str) -> Result<Value, PageError> {
            self.calls.lock().unwrap().push(endpoint.to_string());
            if let Some(delay) = self.delays.get(endpoint) {
                tokio::time::sleep(*delay).await;
            }
            self.responses
                .get(endpoint)
                .cloned()
                .unwrap_or(Err(PageError::Gateway { status: 404 }))
        }
    }
}
