// =============================================================================
// Trendcast: "predict the next move" over historical price series
// =============================================================================
//
// Pure indicator engine (EMA, MACD, Bollinger, RSI), a recommendation and
// trend summary built on top of it, and the scoring state machine for the
// guessing game. The `api` module exposes all of it over HTTP.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod game;
pub mod indicators;
pub mod runtime_config;
pub mod signals;
pub mod trend_analysis;
pub mod types;
