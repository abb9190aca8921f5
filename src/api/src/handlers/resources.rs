//! Resource-style user endpoints
//!
//! Same users, served through bundles that are hydrated on the way in and
//! dehydrated on the way out.

use super::users::{find_user, into_object};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use logical_perms::integrations::{Bundle, FieldPermissionsResource};
use serde_json::{Map, Value};

/// GET /v2/users
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Map<String, Value>>>> {
    let ctx = state.request_context(&headers);

    let mut objects = Vec::new();
    for user in state.store.list() {
        let bundle = state.resource.dehydrate(&ctx, Bundle::from_object(user)?)?;
        objects.push(bundle.data);
    }

    Ok(Json(objects))
}

/// GET /v2/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<Json<Map<String, Value>>> {
    let ctx = state.request_context(&headers);
    let user = find_user(&state, id)?;
    let bundle = state.resource.dehydrate(&ctx, Bundle::from_object(user)?)?;

    Ok(Json(bundle.data))
}

/// PATCH /v2/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<Map<String, Value>>> {
    let ctx = state.request_context(&headers);
    let mut user = find_user(&state, id)?;

    let bundle = state
        .resource
        .hydrate(&ctx, Bundle::new(Some(user.clone()), into_object(body)?))?;
    user.apply_changes(&bundle.data)?;
    let user = state.store.update(user)?;

    let bundle = state.resource.dehydrate(&ctx, Bundle::from_object(user)?)?;
    Ok(Json(bundle.data))
}
