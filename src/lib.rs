//! Risk progression calculator for a trade journal: sizes each trade from a
//! WIN/LOSS history, tracks recovery after losses and summarises the run.

pub mod config;
pub mod error;
pub mod position_manager;
pub mod risk_engine;
pub mod settings_store;
pub mod stats;
pub mod trade_log;
pub mod types;

pub use config::StrategyConfig;
pub use error::{JournalError, Result};
pub use risk_engine::{compute_next_risk, record_trade, RiskEngine};
pub use position_manager::compute_position_sizing;
pub use stats::{aggregate_stats, AggregateStats, TradeReport};
pub use types::{EngineMode, EngineState, Outcome, PositionSizing, RiskDecision, TradeRecord};
