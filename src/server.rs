//! HTTP surface of the epitaph service.

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::config::{AppConfig, SERVICE_NAME};
use crate::context::build_context;
use crate::error::Result;
use crate::filter::{FilterRules, InputFilter};
use crate::pages::PageRenderer;
use crate::preview::{PreviewForm, RenderSelector};
use crate::renderer::MiniJinjaRenderer;
use crate::store::UserStore;

/// Cookie holding the selected user identity.
pub const USER_COOKIE: &str = "as_user";

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; img-src 'self' data:; style-src 'self' 'unsafe-inline'";

/// Shared, read-only state of every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<UserStore>,
    selector: Arc<RenderSelector>,
    pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: AppConfig, store: UserStore) -> Result<Self> {
        let filter = InputFilter::new(FilterRules::default())?;
        let renderer = Box::new(MiniJinjaRenderer::new(config.fuel));
        let selector = RenderSelector::new(config.challenge_mode, filter, renderer);
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            selector: Arc::new(selector),
            pages: Arc::new(PageRenderer::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/preview", post(preview))
        .route("/healthz", get(healthz))
        .route("/.well-known/meta", get(meta))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

/// Runs the server until interrupted.
pub async fn serve(config: AppConfig) -> Result<()> {
    let store = UserStore::load_or_empty(&config.users_path);
    let bind = config.bind;
    if config.challenge_mode {
        info!("Challenge mode is on: epitaphs are evaluated as templates");
    }
    let state = AppState::new(config, store)?;

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{bind}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}

/// Adds the baseline security headers without overriding handler-set values.
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers
        .entry(header::X_FRAME_OPTIONS)
        .or_insert(HeaderValue::from_static("DENY"));
    headers
        .entry(header::X_CONTENT_TYPE_OPTIONS)
        .or_insert(HeaderValue::from_static("nosniff"));
    headers
        .entry(header::REFERRER_POLICY)
        .or_insert(HeaderValue::from_static("no-referrer"));
    headers
        .entry(header::CONTENT_SECURITY_POLICY)
        .or_insert(HeaderValue::from_static(CONTENT_SECURITY_POLICY));
    response
}

fn page_error(e: crate::error::Error) -> Response {
    error!("Page rendering failed: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed").into_response()
}

fn identity_cookie(username: String) -> Cookie<'static> {
    Cookie::build((USER_COOKIE, username))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(false)
        .max_age(time::Duration::days(7))
        .build()
}

fn cookie_user(jar: &CookieJar) -> Option<String> {
    jar.get(USER_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    as_user: Option<String>,
}

async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<IndexQuery>,
) -> Response {
    let selected = query.as_user.filter(|v| !v.is_empty());
    let username = cookie_user(&jar).or_else(|| selected.clone());
    let user = state.store.lookup(username.as_deref());

    let page = match state.pages.index(&user, &state.config.meta) {
        Ok(page) => page,
        Err(e) => return page_error(e),
    };
    match selected {
        Some(name) => (jar.add(identity_cookie(name)), Html(page)).into_response(),
        None => Html(page).into_response(),
    }
}

async fn preview(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PreviewForm>,
) -> Response {
    let user = state.store.lookup(cookie_user(&jar).as_deref());
    let context = build_context(user, state.config.challenge_mode, &state.config.meta);
    let user = context.user.clone();
    let outcome = Arc::clone(&state.selector)
        .render_within(
            form.epitaph_template().to_string(),
            context,
            state.config.render_timeout,
        )
        .await;

    match state
        .pages
        .preview(&form.tombstone(), &outcome, &user, &state.config.meta)
    {
        Ok(page) => Html(page).into_response(),
        Err(e) => page_error(e),
    }
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "version": state.config.meta.release }))
}

async fn meta(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "release": state.config.meta.release,
        "support": state.config.meta.support,
    }))
}
