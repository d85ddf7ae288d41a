// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The indicator and scoring endpoints are
// stateless; the session endpoints drive the round lifecycle for one player.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::app_state::AppState;
use crate::game::{resolve_prediction, GameError, GameState, PredictionOutcome, RawQuote, RoundView};
use crate::indicators::{
    calculate_bollinger_series, calculate_ema_series, calculate_macd, calculate_rsi,
    momentum_label, BollingerPoint, MacdPoint, BOLLINGER_PERIOD,
};
use crate::indicators::macd::{MACD_FAST_PERIOD, MACD_SLOW_PERIOD};
use crate::trend_analysis::{analyze, StockAnalysis};
use crate::types::{closes, Guess, Momentum, PricePoint};

type ApiError = (StatusCode, Json<serde_json::Value>);

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS and tracing middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Service ─────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/symbols", get(symbols))
        // ── Stateless computation ───────────────────────────────────
        .route("/api/v1/analysis", post(analysis))
        .route("/api/v1/indicators", post(indicators))
        .route("/api/v1/predictions/resolve", post(resolve))
        // ── Sessions ────────────────────────────────────────────────
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session))
        .route("/api/v1/sessions/:id/rounds", post(start_round))
        .route("/api/v1/sessions/:id/guess", post(submit_guess))
        .route("/api/v1/sessions/:id/next", post(next_round))
        // ── Middleware & State ───────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn game_error(err: GameError) -> ApiError {
    let status = match err {
        GameError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        GameError::EmptyHistory => StatusCode::BAD_REQUEST,
        GameError::RoundInProgress
        | GameError::NoActiveRound
        | GameError::AlreadyRevealed
        | GameError::NotRevealed => StatusCode::CONFLICT,
    };
    debug!(error = %err, status = status.as_u16(), "request rejected");
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

// =============================================================================
// Health & catalogue
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    sessions: usize,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        sessions: state.session_count(),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

async fn symbols(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let symbols = state.runtime_config.read().symbols.clone();
    Json(symbols)
}

// =============================================================================
// Stateless computation
// =============================================================================

#[derive(Deserialize)]
struct PricesRequest {
    prices: Vec<PricePoint>,
}

#[derive(Serialize)]
struct AnalysisResponse {
    analysis: Option<StockAnalysis>,
}

async fn analysis(Json(req): Json<PricesRequest>) -> impl IntoResponse {
    Json(AnalysisResponse {
        analysis: analyze(&req.prices),
    })
}

#[derive(Serialize)]
struct IndicatorsResponse {
    ema12: Vec<Option<f64>>,
    ema26: Vec<Option<f64>>,
    macd: Vec<MacdPoint>,
    bollinger: Vec<BollingerPoint>,
    rsi: Option<f64>,
    momentum: Momentum,
}

async fn indicators(Json(req): Json<PricesRequest>) -> impl IntoResponse {
    let prices = closes(&req.prices);
    let rsi = calculate_rsi(&prices);

    Json(IndicatorsResponse {
        ema12: calculate_ema_series(&prices, MACD_FAST_PERIOD),
        ema26: calculate_ema_series(&prices, MACD_SLOW_PERIOD),
        macd: calculate_macd(&prices),
        bollinger: calculate_bollinger_series(&prices, BOLLINGER_PERIOD),
        rsi: rsi.is_finite().then_some(rsi),
        momentum: momentum_label(rsi),
    })
}

#[derive(Deserialize)]
struct ResolveRequest {
    #[serde(default)]
    state: GameState,
    guess: Guess,
    price_before: f64,
    price_after: f64,
}

#[derive(Serialize)]
struct ResolveResponse {
    state: GameState,
    outcome: PredictionOutcome,
}

async fn resolve(Json(req): Json<ResolveRequest>) -> impl IntoResponse {
    let (state, outcome) = resolve_prediction(req.state, req.guess, req.price_before, req.price_after);
    Json(ResolveResponse { state, outcome })
}

// =============================================================================
// Sessions
// =============================================================================

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(state.create_session()))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.session_snapshot(&id).map_err(game_error)?;
    Ok(Json(snapshot))
}

#[derive(Deserialize)]
struct StartRoundRequest {
    symbol: String,
    prices: Vec<RawQuote>,
}

async fn start_round(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StartRoundRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = req.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "symbol must not be empty" })),
        ));
    }

    let view = state
        .with_session(&id, |session| {
            session.start_round(&symbol, req.prices).map(|round| round.view())
        })
        .map_err(game_error)?;

    info!(session_id = %id, symbol = %symbol, round_id = %view.id, "round started via API");
    Ok((StatusCode::CREATED, Json(view)))
}

#[derive(Deserialize)]
struct GuessRequest {
    guess: Guess,
}

#[derive(Serialize)]
struct GuessResponse {
    outcome: PredictionOutcome,
    score: i64,
    streak: u32,
    round: Option<RoundView>,
}

async fn submit_guess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<GuessRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let anchor = state.runtime_config.read().scoring_anchor();

    let resp = state
        .with_session(&id, |session| {
            let outcome = session.submit_guess(req.guess, anchor)?;
            Ok(GuessResponse {
                outcome,
                score: session.state().score(),
                streak: session.state().streak(),
                round: session.round().map(|r| r.view()),
            })
        })
        .map_err(game_error)?;

    Ok(Json(resp))
}

async fn next_round(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .with_session(&id, |session| {
            session.acknowledge()?;
            Ok(session.snapshot())
        })
        .map_err(game_error)?;
    Ok(Json(snapshot))
}
