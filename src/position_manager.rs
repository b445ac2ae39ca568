use crate::config::{StrategyConfig, STANDARD_LOT_UNITS};
use crate::types::PositionSizing;

/// Lot size, margin and targets for risking `risk_amount` at the configured stop.
///
/// No clamping: a negative risk or balance yields negative lots and margin,
/// which callers display as-is. Only the divisions are guarded.
pub fn compute_position_sizing(risk_amount: f64, balance: f64, cfg: &StrategyConfig) -> PositionSizing {
    let risk_per_lot = cfg.stop_loss_pips * cfg.pip_value_per_lot;

    let lots = if risk_per_lot != 0.0 {
        risk_amount / risk_per_lot
    } else {
        0.0
    };

    let notional_value = lots * STANDARD_LOT_UNITS;
    let required_margin = if cfg.leverage > 0 {
        notional_value / cfg.leverage as f64
    } else {
        f64::INFINITY
    };

    let margin_level = if required_margin == 0.0 {
        f64::INFINITY
    } else {
        balance / required_margin * 100.0
    };

    PositionSizing {
        lots,
        notional_value,
        required_margin,
        take_profit_pips: cfg.take_profit_pips(),
        potential_profit: risk_amount * cfg.risk_reward_ratio,
        free_margin: balance - required_margin,
        margin_level,
        max_lots_available: balance * cfg.leverage as f64 / STANDARD_LOT_UNITS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sizes_initial_trade() {
        let cfg = StrategyConfig::default();
        let p = compute_position_sizing(300.0, 3000.0, &cfg);
        assert_relative_eq!(p.lots, 1.5);
        assert_relative_eq!(p.notional_value, 150_000.0);
        assert_relative_eq!(p.required_margin, 300.0);
        assert_relative_eq!(p.take_profit_pips, 40.0);
        assert_relative_eq!(p.potential_profit, 600.0);
        assert_relative_eq!(p.free_margin, 2700.0);
        assert_relative_eq!(p.margin_level, 1000.0);
        assert_relative_eq!(p.max_lots_available, 15.0);
    }

    #[test]
    fn zero_margin_gives_infinite_level() {
        let cfg = StrategyConfig::default();
        let p = compute_position_sizing(0.0, 3000.0, &cfg);
        assert_eq!(p.required_margin, 0.0);
        assert!(p.margin_level.is_infinite() && p.margin_level > 0.0);
        assert_eq!(p.free_margin, 3000.0);
    }

    #[test]
    fn zero_pip_risk_yields_no_lots() {
        let mut cfg = StrategyConfig::default();
        cfg.pip_value_per_lot = 0.0;
        let p = compute_position_sizing(300.0, 3000.0, &cfg);
        assert_eq!(p.lots, 0.0);
        assert!(p.margin_level.is_infinite());
    }

    #[test]
    fn zero_leverage_needs_unbounded_margin() {
        let mut cfg = StrategyConfig::default();
        cfg.leverage = 0;
        let p = compute_position_sizing(300.0, 3000.0, &cfg);
        assert!(p.required_margin.is_infinite());
        assert_eq!(p.margin_level, 0.0);
        assert_eq!(p.max_lots_available, 0.0);
    }

    #[test]
    fn negative_risk_propagates() {
        let cfg = StrategyConfig::default();
        let p = compute_position_sizing(-100.0, 3000.0, &cfg);
        assert_relative_eq!(p.lots, -0.5);
        assert!(p.required_margin < 0.0);
    }
}
