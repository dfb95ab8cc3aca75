//! server::handlers
//!
//! Route handlers and their request/response body shapes.
//!
//! Request bodies are read as raw bytes and parsed by hand so that every
//! validation failure renders the service's own JSON error envelope, and so
//! a missing `content` field is rejected before any backing-store call.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::store::{CommitResult, Document, Entry, EntryKind};

// --------------------------------------------------------------------------
// Request/Response bodies
// --------------------------------------------------------------------------

/// Liveness probe body.
#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Query parameters for the listing route.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    /// Logical directory to list; empty means the namespace root.
    #[serde(default)]
    dir: String,
}

/// Listing response: `{items: [{name, path, type}]}`.
#[derive(Serialize)]
pub(crate) struct ListResponse {
    items: Vec<ListItem>,
}

#[derive(Serialize)]
struct ListItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
}

impl From<Entry> for ListItem {
    fn from(entry: Entry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            kind: entry.kind,
        }
    }
}

/// Document read response: `{path, name, sha, content}`.
#[derive(Serialize)]
pub(crate) struct DocumentResponse {
    path: String,
    name: String,
    sha: String,
    content: String,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            path: doc.path,
            name: doc.name,
            sha: doc.sha,
            content: doc.content,
        }
    }
}

/// Write request body; `content` is required, `message` optional.
#[derive(Debug, Default, Deserialize)]
struct PutBody {
    content: Option<String>,
    message: Option<String>,
}

/// Delete request body; everything is optional.
#[derive(Debug, Default, Deserialize)]
struct DeleteBody {
    message: Option<String>,
}

/// Commit metadata as rendered to callers.
#[derive(Serialize)]
struct CommitBody {
    sha: String,
    message: String,
}

/// Write response: `{path, name, sha, commit: {sha, message}}`.
#[derive(Serialize)]
pub(crate) struct WriteResponse {
    path: String,
    name: String,
    sha: Option<String>,
    commit: CommitBody,
}

impl From<CommitResult> for WriteResponse {
    fn from(result: CommitResult) -> Self {
        Self {
            path: result.path,
            name: result.name,
            sha: result.content_sha,
            commit: CommitBody {
                sha: result.commit.sha,
                message: result.commit.message,
            },
        }
    }
}

/// Delete response: `{path, commit: {sha, message}}`.
#[derive(Serialize)]
pub(crate) struct DeleteResponse {
    path: String,
    commit: CommitBody,
}

impl From<CommitResult> for DeleteResponse {
    fn from(result: CommitResult) -> Self {
        Self {
            path: result.path,
            commit: CommitBody {
                sha: result.commit.sha,
                message: result.commit.message,
            },
        }
    }
}

/// Parse an optional JSON request body.
///
/// An empty body is the type's default; anything else must be valid JSON.
fn parse_body<T: DeserializeOwned + Default>(bytes: &Bytes) -> Result<T, ApiError> {
    if bytes.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

// --------------------------------------------------------------------------
// Handlers
// --------------------------------------------------------------------------

/// `GET /` - unauthenticated liveness probe.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /docs?dir=<logicalDir>` - list a directory.
pub(crate) async fn list_docs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let entries = state.store.list(&params.dir).await?;
    Ok(Json(ListResponse {
        items: entries.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /docs/<logicalPath>` - read a document.
pub(crate) async fn get_doc(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let doc = state.store.get(&path).await?;
    Ok(Json(doc.into()))
}

/// `PUT /docs/<logicalPath>` - create or update a document.
pub(crate) async fn put_doc(
    State(state): State<AppState>,
    Path(path): Path<String>,
    bytes: Bytes,
) -> Result<Json<WriteResponse>, ApiError> {
    let body: PutBody = parse_body(&bytes)?;
    let content = body
        .content
        .ok_or_else(|| ApiError::BadRequest("missing required field: content".into()))?;
    let result = state
        .store
        .put(&path, &content, body.message.as_deref())
        .await?;
    Ok(Json(result.into()))
}

/// `DELETE /docs/<logicalPath>` - delete a document.
pub(crate) async fn delete_doc(
    State(state): State<AppState>,
    Path(path): Path<String>,
    bytes: Bytes,
) -> Result<Json<DeleteResponse>, ApiError> {
    let body: DeleteBody = parse_body(&bytes)?;
    let result = state.store.delete(&path, body.message.as_deref()).await?;
    Ok(Json(result.into()))
}

/// Fallback for paths outside the API surface.
pub(crate) async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".into())
}
