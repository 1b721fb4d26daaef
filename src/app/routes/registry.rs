use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::common::{json_body, run_blocking};
use crate::api::dto::{NameRequest, RegistryEntryView};
use crate::api::error::ApiError;
use crate::app::state::AppState;
use crate::domain::registry::RegistryKind;

// ==========================================
// 基础资料路由: GET 列表 / POST 新增
// ==========================================

type S = Arc<AppState>;

/// 各类基础资料的集合路径
pub(super) fn collection_path(kind: RegistryKind) -> &'static str {
    match kind {
        RegistryKind::Company => "/api/companies",
        RegistryKind::Mediator => "/api/mediators",
        RegistryKind::MaterialType => "/api/material-types",
        RegistryKind::Destination => "/api/destinations",
    }
}

pub(super) fn routes() -> Router<S> {
    RegistryKind::ALL
        .iter()
        .fold(Router::new(), |router, &kind| {
            router.route(
                collection_path(kind),
                get(move |State(state): State<S>| list(state, kind)).post(
                    move |State(state): State<S>,
                          payload: Result<Json<NameRequest>, JsonRejection>| {
                        create(state, kind, payload)
                    },
                ),
            )
        })
}

async fn list(state: S, kind: RegistryKind) -> Result<Json<Vec<RegistryEntryView>>, ApiError> {
    let api = state.registry_api.clone();
    run_blocking("list_registry", move || api.list(kind)).await
}

async fn create(
    state: S,
    kind: RegistryKind,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<RegistryEntryView>, ApiError> {
    let req = json_body(payload)?;
    let api = state.registry_api.clone();
    run_blocking("create_registry", move || api.create(kind, &req)).await
}
