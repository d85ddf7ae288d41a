// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the latest indicator readings into qualitative trading signals and a
// single recommendation line.

pub mod recommendation;

pub use recommendation::{build_key_points, KeyPoints};
