/// Replays a WIN/LOSS sequence through the risk progression and writes the trade log.
/// Run: cargo run --bin replay -- outcomes.txt [trade_log.csv]
use std::path::PathBuf;

use risk_progression::stats::print_report;
use risk_progression::trade_log::{load_outcomes, save_trades};
use risk_progression::{RiskEngine, StrategyConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("usage: replay <outcomes-file> [trade-log.csv]");
            std::process::exit(2);
        }
    };
    let output = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("trade_log.csv"));

    let outcomes = load_outcomes(&input).map_err(|e| {
        log::error!("Cannot read {:?}: {}", input, e);
        e
    })?;
    let mut engine = RiskEngine::new(StrategyConfig::from_env()?)?;
    let cfg = engine.config().clone();

    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║  RISK PROGRESSION REPLAY  {:>5} trades                ║", outcomes.len());
    println!(
        "║  Capital {:.0}  Lev {}:1  Risk {}/{}/{}%  SL {} R:R {}",
        cfg.initial_capital, cfg.leverage, cfg.initial_risk_percent,
        cfg.after_win_risk_percent, cfg.recovery_risk_percent,
        cfg.stop_loss_pips, cfg.risk_reward_ratio
    );
    println!("╚═══════════════════════════════════════════════════════╝");

    for outcome in outcomes {
        let t = engine.record(outcome);
        println!(
            "  #{:<4} {:<4} risk {:>9.2}  lots {:>7.2}  margin {:>9.2}  P/L {:>+9.2}  bal {:>10.2}  {}",
            t.sequence_number, t.outcome, t.risk_amount, t.lots, t.required_margin,
            t.profit_loss, t.balance_after, t.risk_type_description
        );
    }

    print_report(&engine.report());

    save_trades(engine.trades(), &output)?;
    println!("\n  Trade log saved: {:?}\n", output);
    Ok(())
}
