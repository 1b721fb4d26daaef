use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use super::common::{json_body, parse_batch_id, run_blocking};
use crate::api::dto::{
    BatchDetailView, BatchItemView, BatchRequest, BatchView, CreateBatchResponse,
    ExitBatchRequest, ExitBatchResponse, MessageResponse,
};
use crate::api::error::ApiError;
use crate::app::state::AppState;

// ==========================================
// 批次路由
// ==========================================
// GET    /api/batches            全部批次
// GET    /api/batches/open       在厂批次
// POST   /api/batch              入厂登记
// GET    /api/batch/{id}         详情（含明细）
// PUT    /api/batch/{id}         修改在厂批次
// DELETE /api/batch/{id}         删除在厂批次
// GET    /api/batch/{id}/items   明细
// POST   /api/batch/{id}/exit    出厂登记
// ==========================================

type S = Arc<AppState>;

pub(super) fn routes() -> Router<S> {
    Router::new()
        .route("/api/batches", get(list_batches))
        .route("/api/batches/open", get(list_open_batches))
        .route("/api/batch", post(create_batch))
        .route(
            "/api/batch/{id}",
            get(get_batch).put(update_batch).delete(delete_batch),
        )
        .route("/api/batch/{id}/items", get(list_batch_items))
        .route("/api/batch/{id}/exit", post(exit_batch))
}

async fn list_batches(State(state): State<S>) -> Result<Json<Vec<BatchView>>, ApiError> {
    let api = state.batch_api.clone();
    run_blocking("list_batches", move || api.list_batches()).await
}

async fn list_open_batches(State(state): State<S>) -> Result<Json<Vec<BatchView>>, ApiError> {
    let api = state.batch_api.clone();
    run_blocking("list_open_batches", move || api.list_open_batches()).await
}

async fn create_batch(
    State(state): State<S>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<CreateBatchResponse>, ApiError> {
    let req = json_body(payload)?;
    let api = state.batch_api.clone();
    run_blocking("create_batch", move || api.create_batch(&req)).await
}

async fn get_batch(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<Json<BatchDetailView>, ApiError> {
    let id = parse_batch_id(&id)?;
    let api = state.batch_api.clone();
    run_blocking("get_batch", move || api.get_batch(id)).await
}

async fn update_batch(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_batch_id(&id)?;
    let req = json_body(payload)?;
    let api = state.batch_api.clone();
    run_blocking("update_batch", move || api.update_batch(id, &req)).await
}

async fn delete_batch(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_batch_id(&id)?;
    let api = state.batch_api.clone();
    run_blocking("delete_batch", move || api.delete_batch(id)).await
}

async fn list_batch_items(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BatchItemView>>, ApiError> {
    let id = parse_batch_id(&id)?;
    let api = state.batch_api.clone();
    run_blocking("list_batch_items", move || api.list_batch_items(id)).await
}

async fn exit_batch(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: Result<Json<ExitBatchRequest>, JsonRejection>,
) -> Result<Json<ExitBatchResponse>, ApiError> {
    let id = parse_batch_id(&id)?;
    let req = json_body(payload)?;
    let api = state.batch_api.clone();
    run_blocking("exit_batch", move || api.exit_batch(id, &req)).await
}
