use crate::types::{EngineState, Outcome};

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateStats {
    pub win_count: usize,
    pub win_rate: f64,     // %
    pub total_pl: f64,
    pub max_drawdown: f64, // highest minus lowest balance seen
}

pub fn aggregate_stats(state: &EngineState) -> AggregateStats {
    let trades = state.trade_log.len();
    let win_count = state
        .trade_log
        .iter()
        .filter(|t| t.outcome == Outcome::Win)
        .count();

    AggregateStats {
        win_count,
        win_rate: if trades == 0 { 0.0 } else { win_count as f64 / trades as f64 * 100.0 },
        total_pl: state.balance - state.initial_capital,
        max_drawdown: state.highest_balance - state.lowest_balance,
    }
}

// ── Full report ───────────────────────────────────────────────────────────────
#[derive(Clone, Debug, PartialEq)]
pub struct TradeReport {
    pub summary: AggregateStats,
    pub trades: usize,
    pub losses: usize,
    pub gross_win: f64,
    pub gross_loss: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub best: f64,
    pub worst: f64,
    pub final_balance: f64,
    pub in_recovery: bool,
}

pub fn trade_report(state: &EngineState) -> TradeReport {
    let summary = aggregate_stats(state);
    let log = &state.trade_log;

    let gross_win: f64 = log
        .iter()
        .filter(|t| t.outcome == Outcome::Win)
        .map(|t| t.profit_loss)
        .sum();
    let gross_loss: f64 = log
        .iter()
        .filter(|t| t.outcome == Outcome::Loss)
        .map(|t| t.profit_loss.abs())
        .sum();
    let losses = log.len() - summary.win_count;

    let profit_factor = if gross_loss > 0.0 {
        gross_win / gross_loss
    } else if gross_win > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let (best, worst) = if log.is_empty() {
        (0.0, 0.0)
    } else {
        (
            log.iter().map(|t| t.profit_loss).fold(f64::NEG_INFINITY, f64::max),
            log.iter().map(|t| t.profit_loss).fold(f64::INFINITY, f64::min),
        )
    };

    TradeReport {
        trades: log.len(),
        losses,
        gross_win,
        gross_loss,
        avg_win: if summary.win_count == 0 { 0.0 } else { gross_win / summary.win_count as f64 },
        avg_loss: if losses == 0 { 0.0 } else { gross_loss / losses as f64 },
        profit_factor,
        best,
        worst,
        final_balance: state.balance,
        in_recovery: state.in_recovery_mode,
        summary,
    }
}

pub fn print_report(r: &TradeReport) {
    let mode = if r.in_recovery { "RECOVERING" } else { "NORMAL" };
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │  Risk progression              {:>10}   │", mode);
    println!("  ├─────────────────────────────────────────────┤");
    println!("  │  Trades         {:>6}   ({} W / {} L)", r.trades, r.summary.win_count, r.losses);
    println!("  │  Win Rate       {:>6.1}%", r.summary.win_rate);
    println!("  │  Total P/L      {:>+9.2}", r.summary.total_pl);
    println!("  │  Balance        {:>9.2}", r.final_balance);
    println!("  │  Avg Win        {:>+9.2}", r.avg_win);
    println!("  │  Avg Loss       {:>+9.2}", -r.avg_loss);
    println!("  │  Profit Factor  {:>9.2}", r.profit_factor);
    println!("  │  Max Drawdown   {:>9.2}", r.summary.max_drawdown);
    println!("  │  Best Trade     {:>+9.2}", r.best);
    println!("  │  Worst Trade    {:>+9.2}", r.worst);
    println!("  └─────────────────────────────────────────────┘");
}
