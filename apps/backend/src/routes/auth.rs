//! Authentication middleware and account endpoints

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use chrono::Duration;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, CredentialsRequest, DeletedResponse, MeResponse};
use crate::services::credentials;
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Auth middleware - resolves the bearer token to a live session
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .to_string();

    // Expired sessions are filtered out by the lookup
    let session = state
        .db
        .get_session(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: session.user_id,
        token,
    });

    Ok(next.run(request).await)
}

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>> {
    let creds = credentials::validate(&payload.email, &payload.password)?;

    let password = creds.password.clone();
    let hash = tokio::task::spawn_blocking(move || credentials::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))??;

    let user = match state.db.create_user(&creds.email, &hash).await {
        Ok(user) => user,
        Err(ApiError::Database(e)) if ApiError::is_unique_violation(&e) => {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
        Err(e) => return Err(e),
    };

    let session = state
        .db
        .create_session(user.id, Duration::days(state.config.session_ttl_days))
        .await?;

    tracing::info!("Registered new user: {}", user.id);

    Ok(Json(AuthResponse {
        user_id: user.id,
        token: session.token,
        expires_at: session.expires_at,
    }))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>> {
    let email = payload.email.trim().to_lowercase();
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state.db.get_user_by_email(&email).await?.ok_or_else(invalid)?;

    let password = payload.password;
    let stored_hash = user.password_hash.clone();
    let verified =
        tokio::task::spawn_blocking(move || credentials::verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?;
    if !verified {
        return Err(invalid());
    }

    let purged = state.db.delete_expired_sessions(user.id).await?;
    if purged > 0 {
        tracing::debug!("Removed {} expired sessions for user {}", purged, user.id);
    }

    let session = state
        .db
        .create_session(user.id, Duration::days(state.config.session_ttl_days))
        .await?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        token: session.token,
        expires_at: session.expires_at,
    }))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DeletedResponse>> {
    let deleted = state.db.delete_session(&auth.token).await?;
    state.db.delete_expired_sessions(auth.user_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user_id: user.id,
        email: user.email,
    }))
}
