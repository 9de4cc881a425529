use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    ApiError, DayPhase, ErrorCode, InfoItem, QuestDraft, QuestResult, QuestSubmission,
    QuestTemplate, SessionStatus, SCHEMA_VERSION_V1,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::{GameApi, PersistenceError, SaveSlotSummary};

include!("error.rs");
include!("state.rs");
include!("routes/session.rs");
include!("routes/play.rs");
include!("util.rs");

pub async fn serve(addr: SocketAddr, api: GameApi) -> Result<(), ServerError> {
    let app = router(AppState::new(api));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "questboard api listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/session", get(get_session))
        .route("/api/v1/session/new", post(new_game))
        .route("/api/v1/phase/advance", post(advance_phase))
        .route("/api/v1/phase/force", post(force_phase))
        .route("/api/v1/infos", get(get_infos))
        .route("/api/v1/infos/{info_id}/{action}", post(act_on_info))
        .route("/api/v1/drafts", get(get_drafts).post(create_draft))
        .route("/api/v1/drafts/{draft_id}/submit", post(submit_draft))
        .route("/api/v1/results", get(get_results))
        .route("/api/v1/save", post(save_game).delete(clear_save))
        .route("/api/v1/saves", get(list_saves))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}
