// Page Server
//
// Embedded HTTP server that renders every browser request through the router
// and the page pipeline, so each route is reachable without client-side code.
//
// Routes:
// - /static/*        assets from the configured directory (tower-http ServeDir)
// - /fragment/*path  just the content fragment for `path`
// - POST /report     bug report submission
// - anything else    the full document for that location

use crate::config::AppConfig;
use crate::gateway::JsonSource;
use crate::pages::report::{
    self, ReportNotice, ReportSource, ReportSubmission, REPORT_SOURCE_TITLE_KEY, REPORT_SOURCE_URL_KEY,
};
use crate::render::{shell, RenderOptions};
use crate::router::{
    resolve_route, BufferSink, LocalStore, MemoryStore, Navigator, Page, Route, SessionHistory,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use std::{path::Path, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

pub struct ServerState {
    pub source: Arc<dyn JsonSource>,
    pub options: RenderOptions,
    /// Report-source stash shared by all requests; the server is single-user.
    pub store: Arc<MemoryStore>,
}

pub struct WebServer {
    config: AppConfig,
    source: Arc<dyn JsonSource>,
}

impl WebServer {
    pub fn new(config: AppConfig, source: Arc<dyn JsonSource>) -> Self {
        Self { config, source }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let state = Arc::new(ServerState {
            source: self.source,
            options: self.config.render,
            store: Arc::new(MemoryStore::new()),
        });
        let app = build_router(state, &self.config.static_dir);

        log::info!("Page server starting on http://{}", self.config.bind_addr);
        log::info!("Gateway: {}", self.config.gateway_url);
        log::info!("Static directory: {:?}", self.config.static_dir);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

pub fn build_router(state: Arc<ServerState>, static_dir: &Path) -> Router {
    // Fragments may be pulled by a separately hosted shell.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let fragments: Router<Arc<ServerState>> = Router::new()
        .route("/fragment", get(fragment))
        .route("/fragment/*path", get(fragment))
        .layer(cors);

    Router::new()
        .merge(fragments)
        .route("/report", get(document).post(submit_report))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(document)
        .with_state(state)
}

/// Outcome of rendering one location in a fresh session.
struct RenderedPage {
    page: Page,
    title: String,
    content: String,
    active_tab: Option<&'static str>,
    redirect: Option<String>,
}

type ServerNavigator = Navigator<BufferSink, SessionHistory, Arc<MemoryStore>>;

fn navigator(state: &ServerState, location: &str) -> ServerNavigator {
    Navigator::new(
        state.source.clone(),
        state.options,
        BufferSink::new(),
        SessionHistory::starting_at(location),
        state.store.clone(),
    )
}

async fn render_location(state: &ServerState, location: &str) -> RenderedPage {
    let nav = navigator(state, location);
    nav.start().await;

    let app_state = nav.state();
    let page = app_state
        .current_route
        .as_ref()
        .map(resolve_route)
        .unwrap_or(Page::NotFound);

    RenderedPage {
        page,
        title: app_state.page_title,
        content: nav.sink().content(),
        active_tab: nav.active_tab(),
        redirect: nav.history().external_redirect(),
    }
}

fn location_of(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

fn search_value(page: &Page) -> &str {
    match page {
        Page::Search { query: Some(q) } => q,
        _ => "",
    }
}

fn status_for(page: &Page) -> StatusCode {
    if *page == Page::NotFound {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

/// Stash the referring page as the report source, unless it is the report
/// page itself.
fn stash_referer(store: &MemoryStore, headers: &HeaderMap) {
    let Some(referer) = headers.get(header::REFERER).and_then(|v| v.to_str().ok()) else {
        return;
    };
    if !same_site(referer, headers) {
        log::debug!("Ignoring cross-site referer {}", referer);
        return;
    }
    let route = Route::parse(referer);
    if route.path == "/report" {
        return;
    }
    let title = resolve_route(&route).title();
    log::debug!("Report source from referer: {}", route.to_url());
    store.set(REPORT_SOURCE_URL_KEY, &route.to_url());
    store.set(REPORT_SOURCE_TITLE_KEY, &title);
}

/// A relative referer, or an absolute one whose authority is the request `Host`.
fn same_site(referer: &str, headers: &HeaderMap) -> bool {
    if referer.starts_with('/') && !referer.starts_with("//") {
        return true;
    }
    let Ok(url) = url::Url::parse(referer) else {
        return false;
    };
    let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let authority = match (url.host_str(), url.port()) {
        (Some(h), Some(port)) => format!("{}:{}", h, port),
        (Some(h), None) => h.to_string(),
        (None, _) => return false,
    };
    authority.eq_ignore_ascii_case(host)
}

async fn document(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    if uri.path() == "/report" {
        stash_referer(&state.store, &headers);
    }

    let location = location_of(&uri);
    let rendered = render_location(&state, &location).await;
    if let Some(target) = rendered.redirect {
        return Redirect::to(&target).into_response();
    }

    let html = shell::document(
        &rendered.title,
        rendered.active_tab,
        search_value(&rendered.page),
        &rendered.content,
    );
    (status_for(&rendered.page), Html(html)).into_response()
}

async fn fragment(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let location = location_of(&uri);
    let location = match location.strip_prefix("/fragment") {
        Some(rest) if rest.is_empty() || rest.starts_with('?') => format!("/{}", rest),
        Some(rest) => rest.to_string(),
        None => location,
    };

    let rendered = render_location(&state, &location).await;
    if let Some(target) = rendered.redirect {
        return Redirect::to(&target).into_response();
    }
    (status_for(&rendered.page), Html(rendered.content)).into_response()
}

async fn submit_report(
    State(state): State<Arc<ServerState>>,
    Form(submission): Form<ReportSubmission>,
) -> Response {
    let source = ReportSource {
        url: submission.page_url.clone(),
        title: submission.page_title.clone(),
    };
    let title = Page::Report.title();
    let active = shell::active_tab("/report");

    match submission.clone().validate() {
        Ok(accepted) => {
            log::info!(
                "Bug report {} at {}: [{}] {} ({}) reply-to={}",
                accepted.id,
                accepted.received_at.to_rfc3339(),
                accepted.report_type,
                accepted.page_title,
                accepted.page_url,
                accepted.email.as_deref().unwrap_or("-")
            );
            log::debug!("Bug report {} description: {}", accepted.id, accepted.description);

            navigator(&state, "/report").complete_report();
            let content = report::render(&source, Some(&ReportNotice::Sent));
            Html(shell::document(&title, active, "", &content)).into_response()
        }
        Err(reason) => {
            log::warn!("Rejected bug report: {}", reason);
            let content = report::render_rejected(&submission, reason);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(shell::document(&title, active, "", &content)),
            )
                .into_response()
        }
    }
}
