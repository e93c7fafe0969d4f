use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::LoginRequest,
        jwt::{AuthUser, JwtKeys},
        password::verify_password_blocking,
    },
    error::{ApiError, MSG_EMPTY_CREDENTIALS, MSG_INVALID_CREDENTIALS, MSG_NOT_REGISTERED},
    payload::decode_body,
    response::ApiResponse,
    state::AppState,
    users::{
        dto::{normalize_email, UserView},
        repo_types::UserFilter,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<UserView>, ApiError> {
    let payload: LoginRequest = decode_body(&body)?;
    let email = normalize_email(&payload.email);

    if email.is_empty() || payload.password.is_empty() {
        warn!("login with empty email or password");
        return Err(ApiError::Rejected(MSG_EMPTY_CREDENTIALS));
    }

    // Unknown email and lookup failure answer the same as a bad password.
    let user = match state.store.get_user_row(UserFilter::Email(email.clone())).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::Rejected(MSG_INVALID_CREDENTIALS));
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "find user by email failed");
            return Err(ApiError::Rejected(MSG_INVALID_CREDENTIALS));
        }
    };

    let ok = verify_password_blocking(payload.password, user.password_hash.clone())
        .await
        .map_err(|e| ApiError::dependency("verify_password", e))?;

    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Rejected(MSG_INVALID_CREDENTIALS));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .sign(user.id)
        .map_err(|e| ApiError::dependency("jwt sign", e))?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(ApiResponse::ok("Login success", UserView::from(user)).with_token(token))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ApiResponse<UserView>, ApiError> {
    let user = state
        .store
        .get_user_row(UserFilter::Id(user_id))
        .await
        .map_err(|e| ApiError::dependency("get user row", e))?
        .ok_or_else(|| {
            warn!(user_id, "token subject no longer registered");
            ApiError::Rejected(MSG_NOT_REGISTERED)
        })?;

    Ok(ApiResponse::ok("Data is available", user.into()))
}
