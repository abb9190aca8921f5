//! Serializer-style user endpoints

use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{Map, Value};
use tracing::info;

type Representation = Map<String, Value>;

pub(crate) fn find_user(state: &AppState, id: u64) -> ApiResult<User> {
    state
        .store
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))
}

pub(crate) fn into_object(body: Value) -> ApiResult<Representation> {
    match body {
        Value::Object(data) => Ok(data),
        other => Err(ApiError::InvalidInput(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// GET /v1/users
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Representation>>> {
    let ctx = state.request_context(&headers);
    let users = state.store.list();

    Ok(Json(state.serializer.to_representation_many(&ctx, &users)?))
}

/// GET /v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<Json<Representation>> {
    let ctx = state.request_context(&headers);
    let user = find_user(&state, id)?;

    Ok(Json(state.serializer.to_representation(&ctx, &user)?))
}

/// PATCH /v1/users/:id
///
/// Fields the viewer may not change are dropped before the update is
/// applied. The response shows the user as the viewer may see it.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<Representation>> {
    let ctx = state.request_context(&headers);
    let mut user = find_user(&state, id)?;
    let mut data = into_object(body)?;

    let dropped = state.serializer.filter_initial_data(&ctx, Some(&user), &mut data)?;
    user.apply_changes(&data)?;
    let user = state.store.update(user)?;

    info!(
        "Updated user {}: changed {:?}, dropped {:?}",
        id,
        data.keys().collect::<Vec<_>>(),
        dropped
    );

    Ok(Json(state.serializer.to_representation(&ctx, &user)?))
}
