use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Win,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "WIN"),
            Outcome::Loss => write!(f, "LOSS"),
        }
    }
}

/// Where the run sits in the risk progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineMode {
    /// No trade recorded yet.
    Fresh,
    /// Last trade won and nothing is owed.
    Normal,
    /// A loss is still outstanding.
    Recovering,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiskDecision {
    pub risk_amount: f64,
    pub risk_type_description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionSizing {
    pub lots: f64,
    pub notional_value: f64,
    pub required_margin: f64,
    pub take_profit_pips: f64,
    pub potential_profit: f64,
    pub free_margin: f64,
    pub margin_level: f64,      // %, +inf with no margin in use
    pub max_lots_available: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub sequence_number: usize,
    pub outcome: Outcome,
    pub risk_amount: f64,
    pub risk_type_description: String,
    pub lots: f64,
    pub required_margin: f64,
    pub stop_loss_pips: f64,
    pub take_profit_pips: f64,
    pub profit_loss: f64,
    pub balance_before: f64,
    pub balance_after: f64,
    pub cumulative_running_pl: f64,
    pub recovery_mode_after: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineState {
    pub initial_capital: f64,
    pub balance: f64,
    pub cumulative_win_profit: f64,
    pub loss_to_recover: f64,
    pub in_recovery_mode: bool,
    pub highest_balance: f64,
    pub lowest_balance: f64,
    pub trade_log: Vec<TradeRecord>,
}

impl EngineState {
    pub fn new(initial_capital: f64) -> Self {
        EngineState {
            initial_capital,
            balance: initial_capital,
            cumulative_win_profit: 0.0,
            loss_to_recover: 0.0,
            in_recovery_mode: false,
            highest_balance: initial_capital,
            lowest_balance: initial_capital,
            trade_log: Vec::new(),
        }
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.trade_log.last().map(|t| t.outcome)
    }

    pub fn mode(&self) -> EngineMode {
        if self.trade_log.is_empty() {
            EngineMode::Fresh
        } else if self.in_recovery_mode || self.loss_to_recover > 0.0 {
            EngineMode::Recovering
        } else {
            EngineMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_mirrors_capital() {
        let s = EngineState::new(3000.0);
        assert_eq!(s.balance, 3000.0);
        assert_eq!(s.highest_balance, 3000.0);
        assert_eq!(s.lowest_balance, 3000.0);
        assert_eq!(s.mode(), EngineMode::Fresh);
        assert_eq!(s.last_outcome(), None);
    }

    #[test]
    fn outcome_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Outcome::Loss).unwrap(), "\"LOSS\"");
        assert_eq!(Outcome::Win.to_string(), "WIN");
    }
}
