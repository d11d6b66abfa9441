//! Development server rendering pages straight from the posts directory

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::PostStore;
use crate::error::ContentError;
use crate::generator::feed::{
    self, FEED_CACHE_CONTROL, ROBOTS_CONTENT_TYPE, RSS_CONTENT_TYPE, SITEMAP_CONTENT_TYPE,
};
use crate::helpers::HomeQuery;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Server state
pub struct AppState {
    blog: Blog,
    store: PostStore,
    pages: TemplateRenderer,
}

type SharedState = Arc<AppState>;

/// Failures while serving a request
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Template(#[from] anyhow::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Content(e) => {
                tracing::error!(%e, "content error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            ServerError::Template(e) => {
                tracing::error!("template error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
        }
    }
}

/// Build the router for a blog
pub fn router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(AppState {
        blog: blog.clone(),
        store: blog.store(),
        pages: TemplateRenderer::new()?,
    });

    Ok(Router::new()
        .route("/", get(home_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/rss.xml", get(rss_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .fallback_service(ServeDir::new(&blog.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(
    State(state): State<SharedState>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, ServerError> {
    let posts = state.store.all_posts()?;
    let html = state.pages.render_home(&state.blog.config, &posts, &query)?;
    Ok(Html(html))
}

async fn post_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let config = &state.blog.config;
    match state.store.post_by_slug(&slug).await? {
        Some(post) => Ok(Html(state.pages.render_post(config, &post)?).into_response()),
        None => {
            tracing::debug!("No post with slug {:?}", slug);
            let html = state.pages.render_not_found(config)?;
            Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
        }
    }
}

async fn rss_handler(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let posts = state.store.all_posts()?;
    let xml = feed::rss_xml(&state.blog.config, &posts, Utc::now());
    Ok(feed_response(RSS_CONTENT_TYPE, xml))
}

async fn sitemap_handler(State(state): State<SharedState>) -> Result<Response, ServerError> {
    let posts = state.store.all_posts()?;
    let xml = feed::sitemap_xml(&state.blog.config, &posts, Utc::now());
    Ok(feed_response(SITEMAP_CONTENT_TYPE, xml))
}

async fn robots_handler(State(state): State<SharedState>) -> Response {
    feed_response(ROBOTS_CONTENT_TYPE, feed::robots_txt(&state.blog.config))
}

fn feed_response(content_type: &'static str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, FEED_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}
