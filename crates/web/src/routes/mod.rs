use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use chessboard_core::{feed, Error, Game, PieceKind, Square};

use crate::AppState;

pub mod saves;

// ============================================================================
// VIEWS
// ============================================================================

#[derive(Serialize)]
pub struct PieceView {
    pub square: String,
    pub kind: String,
    pub color: String,
    pub has_moved: bool,
}

#[derive(Serialize)]
pub struct CheckView {
    pub white_in_check: bool,
    pub black_in_check: bool,
    pub white_checkmated: bool,
    pub black_checkmated: bool,
}

#[derive(Serialize)]
pub struct GameView {
    pub board: Vec<PieceView>,
    pub moves: Vec<String>,
    pub cursor: usize,
    pub mover: String,
    pub pending_promotion: Option<String>,
    pub check: CheckView,
    pub game_over: bool,
    pub highlight: Option<[String; 2]>,
}

#[derive(Serialize)]
pub struct SquareView {
    pub square: String,
    pub piece: Option<PieceView>,
    pub moves: Vec<String>,
    pub captures: Vec<String>,
    pub castles: Vec<String>,
    pub movable_white: Vec<String>,
    pub movable_black: Vec<String>,
    pub threatened_by_white: Vec<String>,
    pub threatened_by_black: Vec<String>,
}

fn squares(list: &[Square]) -> Vec<String> {
    list.iter().map(Square::to_string).collect()
}

fn game_view(game: &Game) -> Result<GameView, Error> {
    let snap = game.current();
    let board = snap
        .pieces()
        .map(|p| PieceView {
            square: p.square.to_string(),
            kind: p.kind.name().to_string(),
            color: p.color.as_str().to_string(),
            has_moved: p.has_moved(),
        })
        .collect();
    let status = feed::check_status(snap)?;
    let game_over = match game.mover() {
        chessboard_core::Color::White => status.white_checkmated,
        chessboard_core::Color::Black => status.black_checkmated,
    };
    Ok(GameView {
        board,
        moves: game.timeline().moves().to_vec(),
        cursor: game.cursor(),
        mover: game.mover().as_str().to_string(),
        pending_promotion: game.pending().map(|p| p.destination().to_string()),
        check: CheckView {
            white_in_check: status.white_in_check,
            black_in_check: status.black_in_check,
            white_checkmated: status.white_checkmated,
            black_checkmated: status.black_checkmated,
        },
        game_over,
        highlight: game
            .timeline()
            .highlight(game.cursor())
            .map(|(from, to)| [from.to_string(), to.to_string()]),
    })
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

pub fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::Notation { .. }
        | Error::InvalidSquare(_)
        | Error::NoPieceAt(_)
        | Error::IllegalMove(_)
        | Error::InvalidCursor(_)
        | Error::MalformedGame(_) => StatusCode::BAD_REQUEST,
        Error::PromotionPending | Error::NoPendingPromotion | Error::GameOver => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {err}");
    }
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Deserialize)]
pub struct MoveRequest {
    pub notation: String,
}

#[derive(Deserialize)]
pub struct PromoteRequest {
    pub kind: String,
}

#[derive(Deserialize)]
pub struct CursorRequest {
    pub index: usize,
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn state(State(state): State<Arc<AppState>>) -> Response {
    let game = state.game.lock().unwrap();
    match game_view(&game) {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn square_info(
    State(state): State<Arc<AppState>>,
    Path(sq): Path<String>,
) -> Response {
    let square: Square = match sq.parse() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };
    let game = state.game.lock().unwrap();
    let report = match feed::describe_square(game.current(), square) {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    Json(SquareView {
        square: square.to_string(),
        piece: report.occupant.map(|p| PieceView {
            square: p.square.to_string(),
            kind: p.kind.name().to_string(),
            color: p.color.as_str().to_string(),
            has_moved: p.has_moved(),
        }),
        moves: squares(&report.moves),
        captures: squares(&report.captures),
        castles: squares(&report.castles),
        movable_white: squares(&report.movable_white),
        movable_black: squares(&report.movable_black),
        threatened_by_white: squares(&report.threatened_by_white),
        threatened_by_black: squares(&report.threatened_by_black),
    })
    .into_response()
}

pub async fn play_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Response {
    let mut game = state.game.lock().unwrap();
    match game.play_notation(req.notation.trim()) {
        Ok(chessboard_core::PlayStatus::Moved) => match game_view(&game) {
            Ok(view) => Json(view).into_response(),
            Err(e) => error_response(e),
        },
        Ok(chessboard_core::PlayStatus::PromotionPending) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "pending": true })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn promote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromoteRequest>,
) -> Response {
    let kind = match req.kind.trim().chars().next().and_then(PieceKind::from_abbr) {
        Some(k) => k,
        None => {
            return error_response(Error::IllegalMove(format!(
                "unknown promotion piece '{}'",
                req.kind
            )))
        }
    };
    let mut game = state.game.lock().unwrap();
    match game.complete_promotion(kind) {
        Ok(()) => match game_view(&game) {
            Ok(view) => Json(view).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}

pub async fn set_cursor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CursorRequest>,
) -> Response {
    let mut game = state.game.lock().unwrap();
    match game.set_cursor(req.index) {
        Ok(()) => match game_view(&game) {
            Ok(view) => Json(view).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}

/// Runs the move search on a blocking worker, then applies the pick if the
/// game has not moved on in the meantime.
pub async fn autoplay(State(state): State<Arc<AppState>>) -> Response {
    let (snap, mover, cursor) = {
        let game = state.game.lock().unwrap();
        (game.current().duplicate(), game.mover(), game.cursor())
    };

    let note = match chessboard_core::search::choose_move_async(snap, mover).await {
        Ok(note) => note,
        Err(e) => return error_response(e),
    };

    let mut game = state.game.lock().unwrap();
    if game.cursor() != cursor {
        return error_response(Error::IllegalMove(
            "the game changed while the search ran".to_string(),
        ));
    }
    tracing::info!("autoplay picked {note}");
    match game.play_notation(&note) {
        Ok(_) => match game_view(&game) {
            Ok(view) => Json(view).into_response(),
            Err(e) => error_response(e),
        },
        Err(e) => error_response(e),
    }
}

pub async fn new_game(State(state): State<Arc<AppState>>) -> Response {
    {
        let mut game = state.game.lock().unwrap();
        *game = Game::new();
    }
    let db = state.db.lock().unwrap();
    if let Err(e) = db.clear_last_save() {
        return error_response(e);
    }
    drop(db);
    let game = state.game.lock().unwrap();
    match game_view(&game) {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn health() -> &'static str {
    "OK"
}
