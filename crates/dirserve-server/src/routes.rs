//! Route table and handlers for the `/home` surface.

use std::io;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use dirserve_core::ServeError;
use dirserve_list::Lookup;
use dirserve_ops::{Mutation, MutationReport, UploadedFile};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters accepted by `GET /home/{path}`.
#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
    /// Return the raw file bytes instead of a file reference.
    #[serde(default)]
    pub content: bool,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/home", get(list_root).post(post_root))
        .route("/home/", get(list_root).post(post_root))
        .route(
            "/home/{*path}",
            get(get_path).post(post_path).put(put_path),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_root(State(state): State<AppState>) -> Result<Json<Lookup>, ApiError> {
    info!("Listing root");
    let lister = state.lister().clone();
    let lookup = blocking("", move || lister.lookup("")).await?;
    Ok(Json(lookup))
}

async fn get_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<GetParams>,
) -> Result<Response, ApiError> {
    info!(path = %path, content = params.content, "Get path");
    let lister = state.lister().clone();
    let request = path.clone();

    if params.content {
        let bytes = blocking(&path, move || {
            let resolved = lister.guard().resolve(&request)?;
            lister.read(&resolved)
        })
        .await?;
        return Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response());
    }

    let lookup = blocking(&path, move || lister.lookup(&request)).await?;
    Ok(Json(lookup).into_response())
}

async fn post_root(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<MutationReport>, ApiError> {
    post(state, String::new(), request).await
}

async fn post_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Json<MutationReport>, ApiError> {
    post(state, path, request).await
}

/// Upload into the folder at `path` for multipart bodies, create it otherwise.
async fn post(
    state: AppState,
    path: String,
    request: Request,
) -> Result<Json<MutationReport>, ApiError> {
    let mutation = if is_multipart(request.headers()) {
        info!(path = %path, "Upload requested");
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| reject(&path, e))?;
        Mutation::upload(path.clone(), read_uploads(&path, multipart).await?)
    } else {
        info!(path = %path, "Create folder requested");
        Mutation::create_folder(path.clone())
    };

    let report = state.executor().execute(mutation).await?;
    Ok(Json(report))
}

async fn put_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Json<MutationReport>, ApiError> {
    info!(path = %path, bytes = body.len(), "Create or replace requested");
    let report = state
        .executor()
        .execute(Mutation::replace(path, body.to_vec()))
        .await?;
    Ok(Json(report))
}

/// Collect every part that carries a file name.
async fn read_uploads(request: &str, mut multipart: Multipart) -> Result<Vec<UploadedFile>, ServeError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| reject(request, e))? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content = field.bytes().await.map_err(|e| reject(request, e))?;
        files.push(UploadedFile::new(name, content.to_vec()));
    }

    Ok(files)
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
}

fn reject(request: &str, error: impl std::fmt::Display) -> ServeError {
    debug!(request, error = %error, "Malformed upload");
    ServeError::bad_request(request)
}

/// Run filesystem work on the blocking pool.
async fn blocking<T, F>(request: &str, work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServeError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServeError::Internal {
            request: request.to_string(),
            source: io::Error::other(e),
        })?;
    Ok(result?)
}
