use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use crate::{
    auth::password::hash_password_blocking,
    error::{ApiError, MSG_NOT_AVAILABLE, MSG_NOT_REGISTERED},
    payload::decode_body,
    response::ApiResponse,
    state::AppState,
    users::{
        dto::{normalize_email, CreateUserRequest, UpdateUserRequest, UserView},
        repo_types::{DeleteResult, NewUser, User, UserChanges, UserFilter},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

/// Path ids must be positive integers; anything else is refused before the
/// store is touched.
pub(crate) fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        Ok(id) => {
            warn!(id, "non-positive user id");
            Err(ApiError::InvalidId(format!("{} is not a positive integer", id)))
        }
        Err(e) => {
            warn!(raw, error = %e, "non-numeric user id");
            Err(ApiError::InvalidId(e.to_string()))
        }
    }
}

/// Existence check shared by update and delete.
async fn find_registered(state: &AppState, id: i64) -> Result<User, ApiError> {
    match state.store.get_user_row(UserFilter::Id(id)).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            warn!(user_id = id, "user id not registered");
            Err(ApiError::Rejected(MSG_NOT_REGISTERED))
        }
        Err(e) => Err(ApiError::dependency("get user row", e)),
    }
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ApiResponse<UserView>, ApiError> {
    let req: CreateUserRequest = decode_body(&body)?;

    let password_hash = hash_password_blocking(req.password, state.config.bcrypt_cost)
        .await
        .map_err(|e| ApiError::dependency("hash_password", e))?;

    let user = state
        .store
        .create_user(NewUser {
            name: req.name,
            email: normalize_email(&req.email),
            password_hash,
        })
        .await
        .map_err(|e| ApiError::dependency("create user", e))?;

    info!(user_id = user.id, email = %user.email, "user created");
    Ok(ApiResponse::ok("Success created data", user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<UserView>>, ApiError> {
    let rows = state
        .store
        .get_user_rows()
        .await
        .map_err(|e| ApiError::dependency("get user rows", e))?;

    // An empty table answers 400, same as a missing single row.
    if rows.is_empty() {
        warn!("no users stored");
        return Err(ApiError::Rejected(MSG_NOT_AVAILABLE));
    }

    let views: Vec<UserView> = rows.into_iter().map(UserView::from).collect();
    Ok(ApiResponse::ok("Data is available", views))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<UserView>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    let user = state
        .store
        .get_user_row(UserFilter::Id(id))
        .await
        .map_err(|e| ApiError::dependency("get user row", e))?
        .ok_or_else(|| {
            warn!(user_id = id, "user not found");
            ApiError::Rejected(MSG_NOT_AVAILABLE)
        })?;

    Ok(ApiResponse::ok("Data is available", user.into()))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<ApiResponse<UserView>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    let existing = find_registered(&state, id).await?;
    let req: UpdateUserRequest = decode_body(&body)?;

    let updated = state
        .store
        .update_user(
            existing.id,
            UserChanges {
                name: req.name,
                email: normalize_email(&req.email),
            },
        )
        .await
        .map_err(|e| ApiError::dependency("update user", e))?;

    info!(user_id = updated.id, "user updated");
    Ok(ApiResponse::ok("Success update data", updated.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<DeleteResult>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    let existing = find_registered(&state, id).await?;

    let result = state
        .store
        .delete_user(existing.id)
        .await
        .map_err(|e| ApiError::dependency("delete user", e))?;

    info!(user_id = existing.id, rows = result.rows_affected, "user deleted");
    Ok(ApiResponse::ok("Success delete data", result))
}
