// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the market
// analysis. Series-valued functions return one `Option` per input close so
// that callers can line them up with the price history; `None` always means
// "not enough history yet", never a failure.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use bollinger::{calculate_bollinger_series, BollingerPoint, BOLLINGER_PERIOD};
pub use ema::{calculate_ema_series, trailing_mean};
pub use macd::{calculate_macd, MacdPoint};
pub use rsi::{calculate_rsi, momentum_label};
