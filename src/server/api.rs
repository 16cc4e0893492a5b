//! REST handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::{ApiError, AppState, SeededSession, SessionView, lookup_session};
use crate::catalog::{FilterSelection, XRayItem};
use crate::chat::SessionSend;
use crate::dripseek::{self, ScanOutcome};
use crate::image::{ImageDataUri, SAMPLE_FRAME};
use crate::notify::{Notification, Notifier};
use crate::video::{self, DEFAULT_VIDEO_ID};

// ── Health ──────────────────────────────────────────────────────────────

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "fashion-decoder"
    }))
}

// ── Catalog ─────────────────────────────────────────────────────────────

pub(super) async fn list_products(
    State(state): State<AppState>,
    Query(selection): Query<FilterSelection>,
) -> impl IntoResponse {
    let products: Vec<_> = state
        .catalog
        .filter(&selection)
        .into_iter()
        .cloned()
        .collect();
    Json(products)
}

pub(super) async fn facets(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.facets())
}

pub(super) async fn featured(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.featured().to_vec())
}

pub(super) async fn xray_items(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.xray_items().to_vec())
}

#[derive(Deserialize)]
pub(super) struct VideoQuery {
    url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VideoView {
    video_id: String,
    embed_url: String,
}

pub(super) async fn resolve_video(
    Query(query): Query<VideoQuery>,
) -> Result<Json<VideoView>, ApiError> {
    let video_id = match query.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => video::extract_video_id(url)
            .ok_or_else(|| ApiError::bad_request("Invalid YouTube URL"))?,
        None => DEFAULT_VIDEO_ID.to_string(),
    };
    Ok(Json(VideoView {
        embed_url: video::embed_url(&video_id),
        video_id,
    }))
}

// ── Sessions ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct CreateSessionRequest {
    #[serde(alias = "initial_context")]
    initial_context: Option<String>,
}

pub(super) async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let session = state.sessions.create(body.initial_context.as_deref()).await;
    (StatusCode::CREATED, Json(SessionView::of(&session).await))
}

pub(super) async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let session = lookup_session(&state, &id).await?;
    Ok(Json(SessionView::of(&session).await))
}

#[derive(Deserialize)]
pub(super) struct DraftRequest {
    text: String,
}

pub(super) async fn set_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DraftRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let session = lookup_session(&state, &id).await?;
    session.transcript().await.set_draft(body.text);
    Ok(Json(SessionView::of(&session).await))
}

pub(super) async fn attach_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SessionView>, ApiError> {
    let session = lookup_session(&state, &id).await?;
    session
        .transcript()
        .await
        .attach_image(&body)
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    Ok(Json(SessionView::of(&session).await))
}

pub(super) async fn clear_attachment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let session = lookup_session(&state, &id).await?;
    session.transcript().await.clear_attachment();
    Ok(Json(SessionView::of(&session).await))
}

pub(super) async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session = lookup_session(&state, &id).await?;
    state.sessions.remove(session.id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `text` falls back to the session's current draft when omitted.
#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct SendRequest {
    text: Option<String>,
}

pub(super) async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendRequest>,
) -> Result<Response, ApiError> {
    let session = lookup_session(&state, &id).await?;
    let text = match body.text {
        Some(text) => text,
        None => session.transcript().await.draft().to_string(),
    };

    match session.send(Arc::clone(&state.gateway), &text).await {
        SessionSend::Completed { outcome, appended } => {
            info!(session_id = %session.id, outcome = ?outcome, "Message exchanged");
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({"outcome": outcome, "messages": appended})),
            )
                .into_response())
        }
        SessionSend::Busy => {
            warn!(session_id = %session.id, "Send rejected: request in flight");
            Err(ApiError::new(
                StatusCode::CONFLICT,
                "A request is already in flight for this session",
            ))
        }
        SessionSend::Empty => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

// ── DripSeek / X-Ray ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub(super) struct DripSeekRequest {
    /// Frame to scan; the built-in sample frame when omitted.
    frame: Option<ImageDataUri>,
}

#[derive(Serialize)]
struct ScanBody {
    scan: ScanOutcome,
}

pub(super) async fn dripseek(
    State(state): State<AppState>,
    Json(body): Json<DripSeekRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let frame = match body.frame {
        Some(frame) => frame,
        None => ImageDataUri::parse(SAMPLE_FRAME)
            .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    };

    let notifier = Notifier::new();
    let mut rx = notifier.subscribe();
    let outcome = dripseek::scan(
        state.gateway.as_ref(),
        frame,
        &notifier,
        state.sessions.request_timeout(),
    )
    .await;
    let notifications = drain(&mut rx);

    let session = state.sessions.create(Some(&outcome.context)).await;
    Ok((
        StatusCode::CREATED,
        Json(SeededSession {
            session: SessionView::of(&session).await,
            notifications,
            extra: ScanBody { scan: outcome },
        }),
    ))
}

#[derive(Serialize)]
struct ItemBody {
    item: XRayItem,
}

pub(super) async fn explore_xray(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .catalog
        .xray_item(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("X-Ray item not found"))?;

    let notifier = Notifier::new();
    let mut rx = notifier.subscribe();
    let context = dripseek::explore_xray_item(&item, &notifier);
    let notifications = drain(&mut rx);

    let session = state.sessions.create(Some(&context)).await;
    Ok((
        StatusCode::CREATED,
        Json(SeededSession {
            session: SessionView::of(&session).await,
            notifications,
            extra: ItemBody { item },
        }),
    ))
}

fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
