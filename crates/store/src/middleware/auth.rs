//! Authentication middleware and extractors.
//!
//! Provides an extractor for requiring bearer-token authentication in route
//! handlers. Handlers behind [`RequireAuth`] never see an unauthenticated
//! request; all rejections happen here.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::models::User;
use crate::services::auth::{AuthService, Credentials};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Verifies the token from the `Authorization` header and loads the
/// principal from the store.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Rejection when a request carries no valid bearer token.
///
/// Deliberately detail-free: a missing header, an unparseable scheme, a bad
/// signature, an expired claim, and an unknown principal all look the same
/// to the client.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection)?;

        let auth = AuthService::new(state.pool(), state.hasher(), state.issuer());
        let user = auth
            .authenticate(Credentials::Bearer {
                token: token.to_owned(),
            })
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "bearer authentication rejected");
                AuthRejection
            })?;

        Ok(Self(user))
    }
}

/// Extract the bearer token from the `Authorization` header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/sessions/current");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_is_none() {
        let parts = parts_with_header(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_wrong_scheme_is_none() {
        let parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        let parts = parts_with_header(Some("bearer abc"));
        assert_eq!(bearer_token(&parts), None);
    }
}
