//! HTTP front end serving the built artifacts.

use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, info};
use tower_http::services::ServeDir;

use crate::{
    config::ServerConfig,
    error::SiteError,
    generator::{INDEX_FILE, POSTS_DIR},
    index::parse_index,
    metadata::{latest, Meta, Post},
    page::Page,
    renderer::{self, BLOG, INDEX, NOT_FOUND, POST},
};

/// Number of posts on the home page.
pub const HOME_POSTS: usize = 3;

#[derive(Debug, Clone)]
pub struct SiteState {
    pub build_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl From<&ServerConfig> for SiteState {
    fn from(config: &ServerConfig) -> Self {
        Self {
            build_dir: config.build_dir.clone(),
            public_dir: config.public_dir.clone(),
        }
    }
}

impl SiteState {
    /// Reads the index fresh on every call; artifacts only change on redeploy anyway.
    async fn read_metas(&self) -> Result<Vec<Meta>, SiteError> {
        let bytes = tokio::fs::read(self.build_dir.join(INDEX_FILE)).await?;
        Ok(parse_index(&bytes)?)
    }

    async fn read_fragment(&self, slug: &str) -> Result<Option<String>, SiteError> {
        let path = self.build_dir.join(POSTS_DIR).join(format!("{slug}.html"));
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => Ok(Some(html)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

type SharedState = Arc<SiteState>;

pub fn router(state: SiteState) -> Router {
    let public = ServeDir::new(&state.public_dir);

    Router::new()
        .route("/", get(home))
        .route("/blog", get(blog))
        .route("/blog/", get(blog))
        .route("/blog/{slug}", get(post))
        .route("/blog/{slug}/", get(post))
        .nest_service("/public", public)
        .fallback(fallback)
        .with_state(Arc::new(state))
}

fn render_page(name: &str, page: &Page) -> Result<Response, SiteError> {
    Ok(Html(renderer::render(name, page)?).into_response())
}

fn not_found(path: &str) -> Result<Response, SiteError> {
    debug!("not found: {path}");
    let html = renderer::render(NOT_FOUND, &Page::new(path))?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// A slug must name a single file under the posts directory.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}

async fn home(State(site): State<SharedState>, uri: Uri) -> Result<Response, SiteError> {
    debug!("GET {}", uri.path());
    let metas = site.read_metas().await?;
    let page = Page::new(uri.path()).with_metas(latest(&metas, HOME_POSTS).to_vec());
    render_page(INDEX, &page)
}

async fn blog(State(site): State<SharedState>, uri: Uri) -> Result<Response, SiteError> {
    debug!("GET {}", uri.path());
    let metas = site.read_metas().await?;
    render_page(BLOG, &Page::new(uri.path()).with_metas(metas))
}

async fn post(
    State(site): State<SharedState>,
    slug: Result<Path<String>, PathRejection>,
    uri: Uri,
) -> Result<Response, SiteError> {
    debug!("GET {}", uri.path());
    // undecodable segments such as `%FF` are just unknown posts
    let Ok(Path(slug)) = slug else {
        return not_found(uri.path());
    };
    if !is_valid_slug(&slug) {
        return not_found(uri.path());
    }
    let Some(html) = site.read_fragment(&slug).await? else {
        return not_found(uri.path());
    };
    let metas = site.read_metas().await?;
    let Some(meta) = metas.into_iter().find(|m| m.slug == slug) else {
        return not_found(uri.path());
    };

    render_page(POST, &Page::new(uri.path()).with_post(Post::new(meta, html)))
}

async fn fallback(uri: Uri) -> Result<Response, SiteError> {
    not_found(uri.path())
}

/// Serves until the listener fails.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    renderer::init().context("compiling templates")?;

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(SiteState::from(&config)))
        .await
        .context("server stopped")?;

    Ok(())
}
