use crate::config::StrategyConfig;
use crate::error::{JournalError, Result};
use crate::position_manager::compute_position_sizing;
use crate::stats::{aggregate_stats, trade_report, AggregateStats, TradeReport};
use crate::types::{EngineMode, EngineState, Outcome, PositionSizing, RiskDecision, TradeRecord};

/// Risk for the next trade. Rules are checked in order:
/// first trade, outstanding recovery, after a win, after an unflagged loss.
pub fn compute_next_risk(state: &EngineState, cfg: &StrategyConfig) -> RiskDecision {
    let decision = match state.last_outcome() {
        None => RiskDecision {
            risk_amount: cfg.initial_capital * cfg.initial_risk_percent / 100.0,
            risk_type_description: format!("Initial {}%", cfg.initial_risk_percent),
        },
        Some(_) if state.in_recovery_mode || state.loss_to_recover > 0.0 => RiskDecision {
            risk_amount: state.balance * cfg.recovery_risk_percent / 100.0,
            risk_type_description: format!(
                "Recovery {}% of balance (loss to recover: {:.2})",
                cfg.recovery_risk_percent, state.loss_to_recover
            ),
        },
        Some(Outcome::Win) => RiskDecision {
            risk_amount: state.cumulative_win_profit * cfg.after_win_risk_percent / 100.0,
            risk_type_description: format!(
                "After win {}% of profit (cumulative profit: {:.2})",
                cfg.after_win_risk_percent, state.cumulative_win_profit
            ),
        },
        // Unreachable through record_trade, which flags recovery on every loss.
        Some(Outcome::Loss) => RiskDecision {
            risk_amount: state.balance * cfg.recovery_risk_percent / 100.0,
            risk_type_description: format!("Recovery {}% of balance", cfg.recovery_risk_percent),
        },
    };

    if decision.risk_amount <= 0.0 && !state.trade_log.is_empty() {
        log::warn!(
            "Non-positive risk {:.2} ({}), balance {:.2}, profit base {:.2}",
            decision.risk_amount, decision.risk_type_description,
            state.balance, state.cumulative_win_profit
        );
    }
    decision
}

/// Applies one outcome to `state` and returns the appended record.
///
/// All values are derived before `state` is touched, so the record and the
/// state always describe the same transition.
pub fn record_trade(state: &mut EngineState, cfg: &StrategyConfig, outcome: Outcome) -> TradeRecord {
    let decision = compute_next_risk(state, cfg);
    let sizing = compute_position_sizing(decision.risk_amount, state.balance, cfg);
    let risk = decision.risk_amount;

    let was_recovering = state.in_recovery_mode || state.loss_to_recover > 0.0;
    let mut cumulative_win_profit = state.cumulative_win_profit;
    let mut loss_to_recover = state.loss_to_recover;
    let in_recovery_mode;

    let profit_loss = match outcome {
        Outcome::Win => {
            let profit = risk * cfg.risk_reward_ratio;
            if was_recovering {
                loss_to_recover -= profit;
                if loss_to_recover <= 0.0 {
                    // Overshoot becomes the new profit base.
                    cumulative_win_profit = loss_to_recover.abs();
                    loss_to_recover = 0.0;
                    in_recovery_mode = false;
                    log::info!("Recovery complete, profit base {:.2}", cumulative_win_profit);
                } else {
                    in_recovery_mode = true;
                }
            } else {
                cumulative_win_profit += profit;
                in_recovery_mode = false;
            }
            profit
        }
        Outcome::Loss => {
            loss_to_recover = (loss_to_recover + risk).max(0.0);
            if !was_recovering {
                log::info!("Entering recovery, loss to recover {:.2}", loss_to_recover);
            }
            // Profit credit is forfeited on any loss.
            cumulative_win_profit = 0.0;
            in_recovery_mode = true;
            -risk
        }
    };

    let balance_before = state.balance;
    let balance_after = balance_before + profit_loss;
    let cumulative_running_pl = state
        .trade_log
        .last()
        .map_or(0.0, |t| t.cumulative_running_pl)
        + profit_loss;

    let record = TradeRecord {
        sequence_number: state.trade_log.len() + 1,
        outcome,
        risk_amount: risk,
        risk_type_description: decision.risk_type_description,
        lots: sizing.lots,
        required_margin: sizing.required_margin,
        stop_loss_pips: cfg.stop_loss_pips,
        take_profit_pips: sizing.take_profit_pips,
        profit_loss,
        balance_before,
        balance_after,
        cumulative_running_pl,
        recovery_mode_after: in_recovery_mode,
    };

    state.balance = balance_after;
    state.cumulative_win_profit = cumulative_win_profit;
    state.loss_to_recover = loss_to_recover;
    state.in_recovery_mode = in_recovery_mode;
    state.highest_balance = state.highest_balance.max(balance_after);
    state.lowest_balance = state.lowest_balance.min(balance_after);
    state.trade_log.push(record.clone());

    log::debug!(
        "#{} {} risk {:.2} ({:.2} lots) P/L {:+.2} balance {:.2}",
        record.sequence_number, outcome, risk, record.lots, profit_loss, balance_after
    );
    record
}

/// One run of the progression: a validated config and the state it drives.
#[derive(Clone, Debug)]
pub struct RiskEngine {
    config: StrategyConfig,
    state: EngineState,
}

impl RiskEngine {
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        let state = EngineState::new(config.initial_capital);
        Ok(RiskEngine { config, state })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn mode(&self) -> EngineMode {
        self.state.mode()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.state.trade_log
    }

    pub fn next_risk(&self) -> RiskDecision {
        compute_next_risk(&self.state, &self.config)
    }

    /// Sizing for the trade [`next_risk`](Self::next_risk) would place.
    pub fn next_position(&self) -> PositionSizing {
        let risk = self.next_risk().risk_amount;
        compute_position_sizing(risk, self.state.balance, &self.config)
    }

    pub fn record(&mut self, outcome: Outcome) -> &TradeRecord {
        record_trade(&mut self.state, &self.config, outcome);
        // record_trade always appends
        &self.state.trade_log[self.state.trade_log.len() - 1]
    }

    pub fn stats(&self) -> AggregateStats {
        aggregate_stats(&self.state)
    }

    pub fn report(&self) -> TradeReport {
        trade_report(&self.state)
    }

    /// Starts a new run from the configured capital, discarding the trade log.
    pub fn reset(&mut self) {
        log::info!(
            "Reset: {} trades discarded, balance back to {:.2}",
            self.state.trade_log.len(), self.config.initial_capital
        );
        self.state = EngineState::new(self.config.initial_capital);
    }

    /// Replaces the settings. Only allowed before the first trade of a run.
    pub fn reconfigure(&mut self, config: StrategyConfig) -> Result<()> {
        if !self.state.trade_log.is_empty() {
            return Err(JournalError::RunInProgress {
                trades: self.state.trade_log.len(),
            });
        }
        config.validate()?;
        if config.initial_capital != self.config.initial_capital {
            self.state = EngineState::new(config.initial_capital);
        }
        log::info!("Settings updated: {:?}", config);
        self.config = config;
        Ok(())
    }
}
