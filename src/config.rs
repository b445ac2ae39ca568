use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

// ─── Contract ─────────────────────────────────────────────────────────────────
pub const STANDARD_LOT_UNITS: f64 = 100_000.0; // base-currency units per standard lot

// ─── Default strategy ─────────────────────────────────────────────────────────
// Overridable through the settings file or RISK_* environment variables
// (see StrategyConfig::from_env).
pub const DEFAULT_INITIAL_CAPITAL: f64 = 3_000.0;
pub const DEFAULT_LEVERAGE: u32 = 500;          // 500:1
pub const DEFAULT_INITIAL_RISK_PCT: f64 = 10.0;  // first trade of a run
pub const DEFAULT_AFTER_WIN_RISK_PCT: f64 = 25.0; // share of accumulated profit
pub const DEFAULT_RECOVERY_RISK_PCT: f64 = 5.0;  // share of balance while recovering
pub const DEFAULT_STOP_LOSS_PIPS: f64 = 20.0;
pub const DEFAULT_RISK_REWARD: f64 = 2.0;
pub const DEFAULT_PIP_VALUE_PER_LOT: f64 = 10.0; // USD per pip per standard lot

/// Parameters of one run. Treated as constants until the engine is reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub initial_capital: f64,
    pub leverage: u32,
    pub initial_risk_percent: f64,
    pub after_win_risk_percent: f64,
    pub recovery_risk_percent: f64,
    pub stop_loss_pips: f64,
    pub risk_reward_ratio: f64,
    pub pip_value_per_lot: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            leverage: DEFAULT_LEVERAGE,
            initial_risk_percent: DEFAULT_INITIAL_RISK_PCT,
            after_win_risk_percent: DEFAULT_AFTER_WIN_RISK_PCT,
            recovery_risk_percent: DEFAULT_RECOVERY_RISK_PCT,
            stop_loss_pips: DEFAULT_STOP_LOSS_PIPS,
            risk_reward_ratio: DEFAULT_RISK_REWARD,
            pip_value_per_lot: DEFAULT_PIP_VALUE_PER_LOT,
        }
    }
}

impl StrategyConfig {
    /// Defaults overridden by any `RISK_*` variable present in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = StrategyConfig::default();
        override_field(&lookup, "RISK_INITIAL_CAPITAL", &mut cfg.initial_capital)?;
        override_field(&lookup, "RISK_LEVERAGE", &mut cfg.leverage)?;
        override_field(&lookup, "RISK_INITIAL_PCT", &mut cfg.initial_risk_percent)?;
        override_field(&lookup, "RISK_AFTER_WIN_PCT", &mut cfg.after_win_risk_percent)?;
        override_field(&lookup, "RISK_RECOVERY_PCT", &mut cfg.recovery_risk_percent)?;
        override_field(&lookup, "RISK_STOP_LOSS_PIPS", &mut cfg.stop_loss_pips)?;
        override_field(&lookup, "RISK_REWARD_RATIO", &mut cfg.risk_reward_ratio)?;
        override_field(&lookup, "RISK_PIP_VALUE", &mut cfg.pip_value_per_lot)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects configurations the calculator cannot size sensibly.
    pub fn validate(&self) -> Result<()> {
        require_positive("initialCapital", self.initial_capital)?;
        if self.leverage == 0 {
            return Err(JournalError::InvalidConfiguration(
                "leverage must be at least 1".to_string(),
            ));
        }
        require_percent("initialRiskPercent", self.initial_risk_percent)?;
        require_percent("afterWinRiskPercent", self.after_win_risk_percent)?;
        require_percent("recoveryRiskPercent", self.recovery_risk_percent)?;
        require_positive("stopLossPips", self.stop_loss_pips)?;
        require_positive("riskRewardRatio", self.risk_reward_ratio)?;
        require_positive("pipValuePerLot", self.pip_value_per_lot)?;
        Ok(())
    }

    pub fn take_profit_pips(&self) -> f64 {
        self.stop_loss_pips * self.risk_reward_ratio
    }
}

fn override_field<F, T>(lookup: &F, key: &str, field: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        *field = raw.trim().parse().map_err(|_| {
            JournalError::InvalidConfiguration(format!("{} is not a valid number: {:?}", key, raw))
        })?;
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(JournalError::InvalidConfiguration(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}

fn require_percent(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 100.0 {
        Ok(())
    } else {
        Err(JournalError::InvalidConfiguration(format!(
            "{} must be in (0, 100], got {}",
            name, value
        )))
    }
}
