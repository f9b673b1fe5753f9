//! REST boundary for a browser or any other renderer.
//!
//! Exposes one [`GameSession`]: its snapshot, its inputs, the model catalog,
//! and optionally the local table directory as static assets.

use crate::catalog::{Model, Role};
use crate::controller::GameSnapshot;
use crate::session::GameSession;
use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    session: GameSession,
    tables_dir: Option<PathBuf>,
}

/// Request for starting a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// Side the human takes.
    pub role: Role,
}

/// Request for a human move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRequest {
    /// Cell index (0-8, where 0=top-left, 8=bottom-right).
    pub index: usize,
}

/// Request for switching models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Catalog id.
    pub model: Model,
}

/// Result of an input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Whether the input changed anything. Illegal inputs are ignored, not errors.
    pub accepted: bool,
    /// State after the input.
    pub state: GameSnapshot,
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Catalog id.
    pub id: Model,
    /// Display name.
    pub name: String,
    /// Asset file name.
    pub file: String,
}

/// Builds the router. `tables_dir`, when set, is served under `/tables/{file}`.
#[instrument(skip(session))]
pub fn router(session: GameSession, tables_dir: Option<PathBuf>) -> Router {
    let state = AppState {
        session,
        tables_dir,
    };

    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/models", get(list_models))
        .route("/api/start", post(start_game))
        .route("/api/click", post(click))
        .route("/api/model", post(change_model))
        .route("/api/restart", post(restart))
        .route("/api/rematch", post(rematch))
        .route("/tables/{file}", get(table_asset))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    info!(%method, %uri, status = %response.status(), "Request handled");
    response
}

fn respond(accepted: bool, session: &GameSession) -> Json<ActionResponse> {
    Json(ActionResponse {
        accepted,
        state: session.snapshot(),
    })
}

async fn get_state(State(state): State<AppState>) -> Json<GameSnapshot> {
    Json(state.session.snapshot())
}

async fn list_models() -> Json<Vec<ModelInfo>> {
    let models = <Model as strum::IntoEnumIterator>::iter()
        .map(|model| ModelInfo {
            id: model,
            name: model.label().to_string(),
            file: model.file_name().to_string(),
        })
        .collect();
    Json(models)
}

#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Json<ActionResponse> {
    let accepted = state.session.start_game(req.role);
    respond(accepted, &state.session)
}

#[instrument(skip(state))]
async fn click(State(state): State<AppState>, Json(req): Json<ClickRequest>) -> Json<ActionResponse> {
    let accepted = state.session.click(req.index);
    respond(accepted, &state.session)
}

#[instrument(skip(state))]
async fn change_model(
    State(state): State<AppState>,
    Json(req): Json<ModelRequest>,
) -> Json<ActionResponse> {
    state.session.change_model(req.model);
    respond(true, &state.session)
}

#[instrument(skip(state))]
async fn restart(State(state): State<AppState>) -> Json<ActionResponse> {
    let accepted = state.session.restart();
    respond(accepted, &state.session)
}

#[instrument(skip(state))]
async fn rematch(State(state): State<AppState>) -> Json<ActionResponse> {
    let accepted = state.session.rematch();
    respond(accepted, &state.session)
}

/// Serves a catalog table file. Only catalog file names are served.
#[instrument(skip(state))]
async fn table_asset(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let Some(dir) = &state.tables_dir else {
        debug!("No table directory configured");
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(model) = Model::from_file_name(&file) else {
        debug!("Not a catalog file");
        return StatusCode::NOT_FOUND.into_response();
    };

    let path = dir.join(model.file_name());
    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Table asset unavailable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
