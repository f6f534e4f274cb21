use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::UserIdQuery,
        repo_types::User,
        services::{CreateUserError, UserService},
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/user", get(get_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/create-user", post(create_user))
}

#[instrument(skip(users))]
pub async fn list_users(
    State(users): State<UserService>,
) -> Result<Json<Vec<User>>, ApiError> {
    match users.get_all_users().await {
        Ok(Some(all)) => Ok(Json(all)),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, "list_users failed");
            Err(ApiError::NotFound)
        }
    }
}

#[instrument(skip(users))]
pub async fn get_user(
    State(users): State<UserService>,
    Query(q): Query<UserIdQuery>,
) -> Result<Json<User>, ApiError> {
    match users.get_user_by_id(q.id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, id = q.id, "get_user failed");
            Err(ApiError::NotFound)
        }
    }
}

/// Malformed input and storage failures both answer 409.
#[instrument(skip(users, body))]
pub async fn create_user(
    State(users): State<UserService>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    match users.create_user(&body).await {
        Ok(user) => Ok(Json(user)),
        Err(e @ CreateUserError::Decode(_)) => {
            warn!(error = %e, "create_user rejected");
            Err(ApiError::Conflict)
        }
        Err(e @ CreateUserError::Persist(_)) => {
            error!(error = %e, "create_user failed");
            Err(ApiError::Conflict)
        }
    }
}
