use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use shared::{
    domain::{Interview, Task, TaskId},
    error::ApiError,
    protocol::{
        InterviewCreateRequest, TaskCreateRequest, TaskStatusUpdate, WelcomeResponse,
        INTERVIEWS_ROUTE, TASKS_ROUTE,
    },
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let state = AppState {
        api: ApiContext::new(settings.default_meeting_link.clone()),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "virtual hr backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route(TASKS_ROUTE, get(http_list_tasks).post(http_create_task))
        .route("/tasks/:task_id", patch(http_update_task))
        .route(
            INTERVIEWS_ROUTE,
            get(http_list_interviews).post(http_create_interview),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err))
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Salarite Virtual HR API".into(),
    })
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(api::list_tasks(&state.api).await)
}

async fn http_create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskCreateRequest>,
) -> ApiResult<Task> {
    let task = api::create_task(&state.api, req).await.map_err(reject)?;
    info!(task_id = %task.id, "task created");
    Ok(Json(task))
}

async fn http_update_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(req): Json<TaskStatusUpdate>,
) -> ApiResult<Task> {
    let task = api::update_task_status(&state.api, &TaskId::new(task_id), req)
        .await
        .map_err(reject)?;
    info!(task_id = %task.id, status = %task.status, "task status updated");
    Ok(Json(task))
}

async fn http_list_interviews(State(state): State<Arc<AppState>>) -> Json<Vec<Interview>> {
    Json(api::list_interviews(&state.api).await)
}

async fn http_create_interview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InterviewCreateRequest>,
) -> ApiResult<Interview> {
    let interview = api::create_interview(&state.api, req)
        .await
        .map_err(reject)?;
    info!(interview_id = %interview.id, "interview scheduled");
    Ok(Json(interview))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
