//! Generic resource controller
//!
//! The five CRUD operations shared by every entity. Each handler issues a
//! single store call and maps its outcome to one response.

use crate::error::{not_found_error, ApiResult, AppError};
use crate::models::{MessageResponse, Resource};
use crate::state::SharedState;
use crate::store::Store;
use crate::validation::{IdPath, ValidatedJson};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::fmt::Display;
use tracing::{debug, error, info};

/// Routes for `R`, to be nested under `/<R::TABLE>`
pub fn router<R: Resource, S: Store>() -> Router<SharedState<S>> {
    Router::new()
        .route("/", get(list::<R, S>).post(create::<R, S>))
        .route(
            "/{id}",
            get(fetch::<R, S>).put(update::<R, S>).delete(remove::<R, S>),
        )
}

/// Log a store fault with its context before it becomes a generic 500
fn store_failure<R: Resource>(action: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |e| {
        error!("Failed to {} {}: {}", action, R::TABLE, e);
        e
    }
}

fn not_found<R: Resource>(id: impl Display) -> AppError {
    not_found_error(format!("{} {} not found", R::LABEL, id))
}

/// Id named by the path, or 404 when it cannot match any row
fn resolve<R: Resource>(path: &IdPath) -> ApiResult<i32> {
    path.id().ok_or_else(|| {
        debug!("{} id '{}' is not an integer", R::LABEL, path.raw());
        not_found::<R>(path.raw())
    })
}

/// GET /<table>
async fn list<R: Resource, S: Store>(
    State(state): State<SharedState<S>>,
) -> ApiResult<Json<Vec<R>>> {
    let records = state
        .store
        .list::<R>()
        .await
        .map_err(store_failure::<R>("list"))?;

    debug!("Found {} {}", records.len(), R::TABLE);
    Ok(Json(records))
}

/// GET /<table>/{id}
async fn fetch<R: Resource, S: Store>(
    State(state): State<SharedState<S>>,
    path: IdPath,
) -> ApiResult<Json<R>> {
    let id = resolve::<R>(&path)?;
    debug!("Fetching {} {}", R::LABEL, id);

    let record = state
        .store
        .find::<R>(id)
        .await
        .map_err(store_failure::<R>("fetch"))?
        .ok_or_else(|| not_found::<R>(id))?;

    Ok(Json(record))
}

/// POST /<table>
async fn create<R: Resource, S: Store>(
    State(state): State<SharedState<S>>,
    ValidatedJson(payload): ValidatedJson<R::Payload>,
) -> ApiResult<(StatusCode, Json<R>)> {
    let record = state
        .store
        .insert::<R>(&payload)
        .await
        .map_err(store_failure::<R>("create"))?;

    info!("{} created (id: {})", R::LABEL, record.id());
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /<table>/{id}
async fn update<R: Resource, S: Store>(
    State(state): State<SharedState<S>>,
    path: IdPath,
    ValidatedJson(payload): ValidatedJson<R::Payload>,
) -> ApiResult<Json<MessageResponse>> {
    let id = resolve::<R>(&path)?;
    let affected = state
        .store
        .update::<R>(id, &payload)
        .await
        .map_err(store_failure::<R>("update"))?;

    if affected == 0 {
        return Err(not_found::<R>(id));
    }

    info!("{} updated (id: {})", R::LABEL, id);
    Ok(Json(MessageResponse::new(format!(
        "{} {} updated successfully",
        R::LABEL,
        id
    ))))
}

/// DELETE /<table>/{id}
async fn remove<R: Resource, S: Store>(
    State(state): State<SharedState<S>>,
    path: IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let id = resolve::<R>(&path)?;
    let affected = state
        .store
        .delete::<R>(id)
        .await
        .map_err(store_failure::<R>("delete"))?;

    if affected == 0 {
        return Err(not_found::<R>(id));
    }

    info!("{} deleted (id: {})", R::LABEL, id);
    Ok(Json(MessageResponse::new(format!(
        "{} {} deleted successfully",
        R::LABEL,
        id
    ))))
}
