use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use chessboard_core::{Database, Game};

mod routes;

pub struct AppState {
    pub game: Mutex<Game>,
    pub db: Mutex<Database>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db = Database::open("chessboard.db").expect("Failed to open database");

    let state = Arc::new(AppState {
        game: Mutex::new(Game::new()),
        db: Mutex::new(db),
    });

    let app = Router::new()
        .route("/state", get(routes::state))
        .route("/square/:sq", get(routes::square_info))
        .route("/move", post(routes::play_move))
        .route("/promote", post(routes::promote))
        .route("/cursor", post(routes::set_cursor))
        .route("/autoplay", post(routes::autoplay))
        .route("/new", post(routes::new_game))
        .route("/health", get(routes::health))
        .route("/saves", get(routes::saves::list_saves))
        .route("/save", post(routes::saves::save_game))
        .route("/load", post(routes::saves::load_game))
        .route("/share", get(routes::saves::share))
        .route("/load-share", post(routes::saves::load_share))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();

    println!("Server running at http://localhost:3000");

    axum::serve(listener, app).await.unwrap();
}
