//! Save, load, and share endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use chessboard_core::game::{decode_share, encode_share};
use chessboard_core::{Error, Game};

use super::error_response;
use crate::AppState;

#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ShareRequest {
    pub code: String,
}

pub async fn list_saves(State(state): State<Arc<AppState>>) -> Response {
    let db = state.db.lock().unwrap();
    match db.list_saves() {
        Ok(saves) => Json(saves).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn save_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NameRequest>,
) -> Response {
    let name = req.name.trim();
    if name.is_empty() {
        return error_response(Error::MalformedGame("a save needs a name".to_string()));
    }

    let data = {
        let mut game = state.game.lock().unwrap();
        game.save_data(name)
    };
    let db = state.db.lock().unwrap();
    if let Err(e) = db.save_game(&data).and_then(|()| db.set_last_save(name)) {
        return error_response(e);
    }
    tracing::info!("saved game '{name}' with {} moves", data.moves.len());
    Json(serde_json::json!({ "saved": name })).into_response()
}

pub async fn load_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NameRequest>,
) -> Response {
    let name = req.name.trim();
    let data = {
        let db = state.db.lock().unwrap();
        match db.load_game(name) {
            Ok(Some(data)) => data,
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(serde_json::json!({ "error": format!("no save named '{name}'") })),
                )
                    .into_response()
            }
            Err(e) => return error_response(e),
        }
    };

    let loaded = match Game::load(data) {
        Ok(game) => game,
        Err(e) => return error_response(e),
    };
    {
        let mut game = state.game.lock().unwrap();
        *game = loaded;
    }
    let db = state.db.lock().unwrap();
    if let Err(e) = db.set_last_save(name) {
        return error_response(e);
    }
    drop(db);

    let game = state.game.lock().unwrap();
    match super::game_view(&game) {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn share(State(state): State<Arc<AppState>>) -> Response {
    let game = state.game.lock().unwrap();
    let code = encode_share(game.timeline().moves());
    Json(serde_json::json!({ "code": code })).into_response()
}

pub async fn load_share(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShareRequest>,
) -> Response {
    let moves = match decode_share(req.code.trim()) {
        Ok(moves) => moves,
        Err(e) => return error_response(e),
    };
    let loaded = match Game::from_moves(&moves) {
        Ok(game) => game,
        Err(e) => return error_response(e),
    };
    let mut game = state.game.lock().unwrap();
    *game = loaded;
    match super::game_view(&game) {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}
