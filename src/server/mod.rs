//! server
//!
//! HTTP layer: authentication, routing, and JSON rendering.
//!
//! # Design
//!
//! Every request moves through three phases: authenticate (bearer token,
//! byte-equal), route (method + path shape), render (typed JSON success
//! body or the `{"error": ...}` envelope). The only unauthenticated route
//! is the liveness probe at `GET /`.
//!
//! Handlers hold no state between requests; the shared [`AppState`] is a
//! store handle and the expected caller token, both read-only.
//!
//! # Routes
//!
//! | Method | Path           | Purpose            |
//! |--------|----------------|--------------------|
//! | GET    | `/`            | liveness probe     |
//! | GET    | `/docs`        | list a directory   |
//! | GET    | `/docs/{path}` | read a document    |
//! | PUT    | `/docs/{path}` | create or update   |
//! | DELETE | `/docs/{path}` | delete             |

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::config::Config;
use crate::store::ContentStore;

mod error;
mod handlers;

pub use error::ApiError;

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Content-store client serving all document operations.
    pub store: Arc<dyn ContentStore>,
    /// Bearer token callers must present. `None` means misconfigured; the
    /// service answers protected routes with a server error, never openly.
    pub api_token: Option<String>,
}

impl AppState {
    /// Build state from the service configuration and a store.
    pub fn new(config: &Config, store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            api_token: config.api_token.clone(),
        }
    }
}

/// Build the service router.
///
/// Mounts the liveness probe openly and the document routes behind the
/// bearer-token middleware; unknown paths fall back to a JSON 404.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/docs", get(handlers::list_docs))
        .route(
            "/docs/{*path}",
            get(handlers::get_doc)
                .put(handlers::put_doc)
                .delete(handlers::delete_doc),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/", get(handlers::health))
        .merge(protected)
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Serve the router on an already-bound listener until the process exits.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("listening on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Reject any request that does not carry the exact configured token.
///
/// The comparison is byte-equal against the full `Bearer <token>` header
/// value; prefixes or substrings never match. Rejection happens before the
/// handler runs, so an unauthorized request triggers no backing-store call.
async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Err(ApiError::Internal(
            "service bearer token is not configured".into(),
        ));
    };
    let expected_header = format!("Bearer {}", expected);
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    match presented {
        Some(header) if header.as_bytes() == expected_header.as_bytes() => {
            Ok(next.run(request).await)
        }
        _ => Err(ApiError::Unauthorized),
    }
}
