/**
 * Router Configuration
 *
 * Combines all route groups into a single Axum router and applies the
 * shared layers.
 *
 * # Layers (outermost first)
 *
 * - `TraceLayer` - request/response tracing
 * - `auth_middleware` - verifies bearer tokens when present
 */

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::middleware::auth_middleware;
use crate::backend::routes::comment_routes::configure_comment_routes;
use crate::backend::routes::post_routes::configure_post_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// ## Routes
///
/// - `GET /health` - liveness probe
/// - `POST /api/posts` - create a post
/// - `GET /api/posts/{post_id}/comments` - comment forest of a post
/// - `POST /api/comments` - create a comment or reply
/// - `GET /api/comments/{comment_id}` - one comment
/// - `PATCH /api/comments/{comment_id}` - edit a comment
/// - `DELETE /api/comments/{comment_id}` - cascade delete
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));
    let router = configure_post_routes(router);
    let router = configure_comment_routes(router);

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware)),
        )
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}
