//! Session route handlers.
//!
//! The three endpoints each run one authentication strategy. Handlers only
//! shape the success response; every rejection is produced by the strategy
//! (or, for `/current`, by the [`RequireAuth`] extractor) and mapped to a
//! status code in `error.rs`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use mercadito_core::Role;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::PublicUser;
use crate::services::auth::{AuthService, Credentials, Registration};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i16,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// Response for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

/// Response for the current-principal endpoint.
#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user.
///
/// Runs the registration strategy; a duplicate email is a 409, never a
/// second record.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.hasher(), state.issuer());

    let user = auth
        .authenticate(Credentials::Register(Registration {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            age: body.age,
            password: body.password,
            role: body.role,
        }))
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registro exitoso",
            user: PublicUser::from_user(&user),
        }),
    ))
}

/// Login with email and password; issues a bearer token on success.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.hasher(), state.issuer());

    let user = auth
        .authenticate(Credentials::Login {
            email: body.email,
            password: body.password,
        })
        .await?;

    let token = auth.issue_token(&user)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        message: "Login exitoso",
        token,
        user: PublicUser::from_user(&user),
    }))
}

/// The authenticated principal, including its cart reference.
///
/// Token verification and principal lookup happen in [`RequireAuth`].
pub async fn current(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    Json(CurrentResponse {
        message: "Datos del usuario actual",
        user: PublicUser::with_cart(&user),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::util::ServiceExt;

    use crate::config::{AuthConfig, StoreConfig};
    use crate::routes;
    use crate::state::AppState;

    /// State backed by a lazy pool: requests that reject before touching the
    /// database (missing or unverifiable tokens) never open a connection.
    fn test_state() -> AppState {
        let config = StoreConfig {
            database_url: SecretString::from("postgres://localhost/mercadito_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            auth: AuthConfig {
                jwt_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
                token_ttl_hours: 24,
                hash_memory_kib: 8,
                hash_iterations: 1,
                hash_parallelism: 1,
            },
            sentry_dsn: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/mercadito_test")
            .unwrap();
        AppState::new(config, pool).unwrap()
    }

    async fn current_status(auth_header: Option<&str>) -> StatusCode {
        let app = routes::routes().with_state(test_state());

        let mut builder = Request::builder().uri("/api/sessions/current");
        if let Some(value) = auth_header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let request = builder.body(Body::empty()).unwrap();

        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_current_without_header_is_unauthorized() {
        assert_eq!(current_status(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_current_with_malformed_token_is_unauthorized() {
        assert_eq!(
            current_status(Some("Bearer not.a.token")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_current_with_wrong_scheme_is_unauthorized() {
        assert_eq!(
            current_status(Some("Basic dXNlcjpwYXNz")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_current_with_tampered_signature_is_unauthorized() {
        use chrono::Utc;
        use mercadito_core::{Email, Role, UserId};

        let state = test_state();
        let user = crate::models::User {
            id: UserId::new(1),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            email: Email::parse("ana@example.com").unwrap(),
            age: 30,
            password_hash: String::new(),
            cart: None,
            role: Role::User,
            created_at: Utc::now(),
        };
        let token = state.issuer().issue(&user).unwrap();

        // Well-formed token, signature flipped: rejected before any lookup.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let app = routes::routes().with_state(state);
        let request = Request::builder()
            .uri("/api/sessions/current")
            .header(AUTHORIZATION, format!("Bearer {tampered}"))
            .body(Body::empty())
            .unwrap();

        let status = app.oneshot(request).await.unwrap().status();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
