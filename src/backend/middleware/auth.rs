/**
 * Authentication Middleware
 *
 * Verifies `Authorization: Bearer <token>` headers and hands the caller
 * identity to handlers through request extensions.
 *
 * Requests without an Authorization header pass through unauthenticated, so
 * public reads and protected writes can share one path. Handlers that need
 * a caller take the `AuthUser` extractor, which answers 401 when the
 * middleware attached nothing. A header that is present but malformed or
 * carries a bad token is rejected immediately.
 */

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::Actor;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<AuthenticatedUser> for Actor {
    fn from(user: AuthenticatedUser) -> Self {
        Actor::new(user.user_id, user.email)
    }
}

/// Authentication middleware
///
/// 1. Reads the Authorization header, if any
/// 2. Verifies the bearer token
/// 3. Attaches `AuthenticatedUser` to the request extensions
///
/// Returns 401 Unauthorized for a malformed header or an invalid token.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let Some(auth_header) = request.headers().get(AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            unauthorized("Invalid Authorization header")
        })?;

    let claims = app_state.sessions.verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        unauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

fn unauthorized(message: &str) -> BackendError {
    BackendError::handler(StatusCode::UNAUTHORIZED, message)
}

/// Axum extractor for the authenticated caller
///
/// Yields the core's `Actor`; rejects with 401 when the request carried no
/// verified token.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Actor);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::debug!("AuthenticatedUser not found in request extensions");
                unauthorized("Authentication required")
            })?;

        Ok(AuthUser(user.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request as HttpRequest;

    use crate::backend::server::state::tests::test_state;

    #[tokio::test]
    async fn test_extractor_reads_extension() {
        let state = test_state().await;
        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
        };
        let mut request = HttpRequest::builder().uri("/").body(()).unwrap();
        request.extensions_mut().insert(user.clone());
        let (mut parts, _) = request.into_parts();

        let AuthUser(actor) = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(actor, Actor::new(user.user_id, user.email));
    }

    #[tokio::test]
    async fn test_extractor_without_extension_is_unauthorized() {
        let state = test_state().await;
        let request = HttpRequest::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Authentication required");
    }
}
