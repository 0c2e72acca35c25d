// Navigator
//
// Drives one browsing session: turns locations into pages, writes fragments
// to the content sink and keeps the history in step. Every render takes a
// generation token; a load that finishes after a newer one started is dropped
// instead of overwriting the newer page.

use super::route::Route;
use super::session::{lock, ContentSink, History, LocalStore};
use super::table::{resolve_route, Page};
use crate::gateway::JsonSource;
use crate::pages::detail::{self, episode_page_count};
use crate::pages::episode::{self, fetch_embed, Player};
use crate::pages::report::{ReportSource, REPORT_SOURCE_TITLE_KEY, REPORT_SOURCE_URL_KEY};
use crate::pages::{self, LoadContext, Snapshot};
use crate::pagination::clamp_page;
use crate::render::components::loading_fragment;
use crate::render::{shell, RenderOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Where the user was when they opened the report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMarker {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_route: Option<Route>,
    pub page_title: String,
    pub last_page_marker: Option<PageMarker>,
    /// Data behind the page on screen, for re-renders without a refetch.
    pub snapshot: Option<Snapshot>,
}

/// A clicked anchor: its `href` and whether it carries the navigation marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub marker: bool,
}

impl Anchor {
    pub fn internal(href: impl Into<String>) -> Self {
        Self { href: href.into(), marker: true }
    }

    pub fn external(href: impl Into<String>) -> Self {
        Self { href: href.into(), marker: false }
    }
}

pub struct Navigator<S, H, K> {
    source: Arc<dyn JsonSource>,
    options: RenderOptions,
    sink: S,
    history: H,
    store: K,
    state: Mutex<AppState>,
    generation: AtomicU64,
}

impl<S: ContentSink, H: History, K: LocalStore> Navigator<S, H, K> {
    pub fn new(source: Arc<dyn JsonSource>, options: RenderOptions, sink: S, history: H, store: K) -> Self {
        Self {
            source,
            options,
            sink,
            history,
            store,
            state: Mutex::new(AppState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn state(&self) -> AppState {
        lock(&self.state).clone()
    }

    /// Render whatever the history currently points at.
    pub async fn start(&self) -> bool {
        self.render_current().await
    }

    /// Push `path` plus `params` (appended, never overwritten) and render it.
    pub async fn navigate(&self, path: &str, params: &[(&str, &str)]) -> bool {
        let url = Route::with_params(path, params).to_url();
        log::debug!("Navigating to {}", url);
        self.history.push(&url);
        self.render_current().await
    }

    /// Back/forward: the history has already moved, just render.
    pub async fn pop_state(&self) -> bool {
        self.render_current().await
    }

    /// Returns whether the click was intercepted. Anchors without the marker
    /// are left to the browser.
    pub async fn handle_click(&self, anchor: &Anchor) -> bool {
        if !anchor.marker {
            return false;
        }

        let target = Route::parse(&anchor.href);
        if target.path == "/report" {
            self.remember_report_source();
        }

        if self.in_page_action(&target).await {
            return true;
        }

        self.navigate(&target.to_url(), &[]).await;
        true
    }

    /// Episode paging and server switching on the page already on screen
    /// reuse the cached data.
    async fn in_page_action(&self, target: &Route) -> bool {
        let (on_same_path, snapshot) = {
            let state = lock(&self.state);
            let same = state
                .current_route
                .as_ref()
                .is_some_and(|current| current.path == target.path);
            (same, state.snapshot.clone())
        };
        if !on_same_path {
            return false;
        }

        match (resolve_route(target), snapshot) {
            (Page::AnimeDetail { id, episode_page }, Some(Snapshot::Detail { anime_id, .. })) if id == anime_id => {
                self.change_episode_page(episode_page)
            }
            (Page::Episode { id, server: Some(server) }, Some(Snapshot::Episode(view))) if id == view.episode_id => {
                self.switch_server(&server).await
            }
            _ => false,
        }
    }

    /// Navigate to `/search?q=<input>`. Blank input is ignored.
    pub async fn submit_search(&self, input: &str) -> bool {
        let query = input.trim();
        if query.is_empty() {
            return false;
        }
        self.navigate("/search", &[("q", query)]).await
    }

    /// Show another page of the cached episode list and push it as a new
    /// history entry. Returns false when no anime detail is on screen.
    pub fn change_episode_page(&self, page: u32) -> bool {
        let mut state = lock(&self.state);
        let Some(Snapshot::Detail { anime_id, detail: anime }) = state.snapshot.as_ref() else {
            return false;
        };

        let page = clamp_page(page, episode_page_count(anime));
        let html = detail::render(anime_id, anime, page, &self.options);

        let mut route = state
            .current_route
            .clone()
            .unwrap_or_else(|| Route::parse(&self.history.location()));
        route.set("episode_page", &page.to_string());

        // Anything still loading is older than this page now.
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.history.push(&route.to_url());
        self.sink.set_content(&html);
        state.current_route = Some(route);
        true
    }

    /// Load `server_id` into the video area of the episode on screen. On
    /// success the location's `server` parameter is replaced in place; on
    /// failure the player shows an inline error and the rest stays.
    pub async fn switch_server(&self, server_id: &str) -> bool {
        let view = {
            let state = lock(&self.state);
            match state.snapshot.as_ref() {
                Some(Snapshot::Episode(view)) => view.clone(),
                _ => return false,
            }
        };
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Switching episode {} to server {}", view.episode_id, server_id);

        let result = fetch_embed(self.source.as_ref(), server_id).await;
        if !self.is_current(token) {
            log::debug!("Discarding stale server response for {}", server_id);
            return false;
        }

        let mut view = view;
        let mut state = lock(&self.state);
        match result {
            Ok(url) => {
                view.player = Player::Embed(url);
                view.active_server = Some(server_id.to_string());
                let mut route = state
                    .current_route
                    .clone()
                    .unwrap_or_else(|| Route::parse(&self.history.location()));
                route.set("server", server_id);
                self.history.replace(&route.to_url());
                state.current_route = Some(route);
            }
            Err(e) => {
                log::warn!("Failed to load server {}: {}", server_id, e);
                view.player = Player::Failed;
            }
        }

        self.sink.set_content(&episode::render(&view));
        state.snapshot = Some(Snapshot::Episode(view));
        true
    }

    /// Stash the current location and title for the report page.
    pub fn remember_report_source(&self) {
        let url = self.history.location();
        let mut state = lock(&self.state);
        let title = state.page_title.clone();
        self.store.set(REPORT_SOURCE_URL_KEY, &url);
        self.store.set(REPORT_SOURCE_TITLE_KEY, &title);
        state.last_page_marker = Some(PageMarker { url, title });
    }

    /// Forget the stashed report source after a successful submission.
    pub fn complete_report(&self) {
        self.store.remove(REPORT_SOURCE_URL_KEY);
        self.store.remove(REPORT_SOURCE_TITLE_KEY);
        lock(&self.state).last_page_marker = None;
    }

    /// Navigation tab matching the current path, if any.
    pub fn active_tab(&self) -> Option<&'static str> {
        let state = lock(&self.state);
        let path = state.current_route.as_ref().map(|r| r.path.as_str())?;
        shell::active_tab(path)
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    fn report_source(&self, location: &str, title: &str) -> ReportSource {
        ReportSource {
            url: self.store.get(REPORT_SOURCE_URL_KEY).unwrap_or_else(|| location.to_string()),
            title: self.store.get(REPORT_SOURCE_TITLE_KEY).unwrap_or_else(|| title.to_string()),
        }
    }

    async fn render_current(&self) -> bool {
        let location = self.history.location();
        let route = Route::parse(&location);
        let page = resolve_route(&route);
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.sink.set_content(&loading_fragment());
        let title = page.title();
        {
            let mut state = lock(&self.state);
            state.current_route = Some(route);
            state.page_title = title.clone();
            state.snapshot = None;
        }

        let ctx = LoadContext {
            source: self.source.as_ref(),
            options: &self.options,
            report_source: self.report_source(&location, &title),
        };
        let rendered = pages::load(&page, &ctx).await;

        if !self.is_current(token) {
            log::debug!("Discarding stale render of {}", location);
            return false;
        }

        if let Some(target) = &rendered.redirect {
            log::info!("Leaving for {}", target);
            self.history.assign(target);
        }
        self.sink.set_content(&rendered.html);
        lock(&self.state).snapshot = rendered.snapshot;
        true
    }
}
