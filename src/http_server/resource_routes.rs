//! Resource HTTP Routes
//!
//! Mounts one route family per resource:
//!
//! - `GET /{resource}/` - list
//! - `POST /{resource}/` - create
//! - `GET /{resource}/:id/` - retrieve
//! - `PUT /{resource}/:id/` - full update
//! - `PATCH /{resource}/:id/` - partial update
//! - `DELETE /{resource}/:id/` - delete
//!
//! Every path is also served without the trailing slash.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, RawQuery, State,
    },
    http::{header::AUTHORIZATION, HeaderMap, Uri},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::auth::{Actor, AuthError, JwtManager};
use crate::controller::{ApiError, ApiResult, Reply, Resource, ResourceController};
use crate::serializer::WriteMode;

/// State shared by one resource's handlers
pub struct ResourceState<E: Resource> {
    pub controller: ResourceController<E>,
    pub jwt: Arc<JwtManager>,
}

impl<E: Resource> ResourceState<E> {
    /// Resolve the acting user from the `Authorization` header
    fn actor(&self, headers: &HeaderMap) -> ApiResult<Actor> {
        let header = headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::MalformedHeader))
            .transpose()?;
        Ok(self.jwt.actor_from_header(header)?)
    }
}

/// Member id from the path
///
/// A segment that does not decode cannot name a record, so it answers
/// like any other unknown id.
fn member_id<E: Resource>(
    path: Result<Path<String>, PathRejection>,
    uri: &Uri,
) -> ApiResult<String> {
    path.map(|Path(id)| id).map_err(|_| {
        let segment = uri
            .path()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        ApiError::not_found(E::NAME, segment)
    })
}

/// Create the routes for resource `E`
pub fn resource_routes<E: Resource>(
    controller: ResourceController<E>,
    jwt: Arc<JwtManager>,
) -> Router {
    let collection = format!("/{}", controller.config().path);
    let member = format!("{}/:id", collection);
    let state = Arc::new(ResourceState { controller, jwt });

    Router::new()
        .route(&collection, get(list_handler::<E>).post(create_handler::<E>))
        .route(
            &format!("{}/", collection),
            get(list_handler::<E>).post(create_handler::<E>),
        )
        .route(
            &member,
            get(retrieve_handler::<E>)
                .put(replace_handler::<E>)
                .patch(patch_handler::<E>)
                .delete(delete_handler::<E>),
        )
        .route(
            &format!("{}/", member),
            get(retrieve_handler::<E>)
                .put(replace_handler::<E>)
                .patch(patch_handler::<E>)
                .delete(delete_handler::<E>),
        )
        .with_state(state)
}

async fn list_handler<E: Resource>(
    State(state): State<Arc<ResourceState<E>>>,
    Query(params): Query<Vec<(String, String)>>,
    RawQuery(raw_query): RawQuery,
) -> ApiResult<Reply> {
    state.controller.list(&params, raw_query.as_deref())
}

async fn retrieve_handler<E: Resource>(
    State(state): State<Arc<ResourceState<E>>>,
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
) -> ApiResult<Reply> {
    let id = member_id::<E>(path, &uri)?;
    state.controller.retrieve(&id)
}

async fn create_handler<E: Resource>(
    State(state): State<Arc<ResourceState<E>>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Reply> {
    let actor = state.actor(&headers)?;
    let Json(payload) = payload?;
    state.controller.create(&payload, &actor)
}

async fn replace_handler<E: Resource>(
    State(state): State<Arc<ResourceState<E>>>,
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Reply> {
    let id = member_id::<E>(path, &uri)?;
    let actor = state.actor(&headers)?;
    let Json(payload) = payload?;
    state
        .controller
        .update(&id, &payload, WriteMode::Replace, &actor)
}

async fn patch_handler<E: Resource>(
    State(state): State<Arc<ResourceState<E>>>,
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Reply> {
    let id = member_id::<E>(path, &uri)?;
    let actor = state.actor(&headers)?;
    let Json(payload) = payload?;
    state
        .controller
        .update(&id, &payload, WriteMode::Partial, &actor)
}

async fn delete_handler<E: Resource>(
    State(state): State<Arc<ResourceState<E>>>,
    path: Result<Path<String>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
) -> ApiResult<Reply> {
    let id = member_id::<E>(path, &uri)?;
    let actor = state.actor(&headers)?;
    state.controller.delete(&id, &actor)
}
