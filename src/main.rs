use std::io::{self, BufRead, Write};

use risk_progression::settings_store::{JsonFileSettingsStore, SettingsStore};
use risk_progression::stats::print_report;
use risk_progression::trade_log::parse_outcome;
use risk_progression::{RiskEngine, StrategyConfig};

const DEFAULT_SETTINGS_PATH: &str = "risk_settings.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // ── Settings: saved file first, then RISK_* env / defaults ───────────────
    let path = std::env::var("RISK_SETTINGS_PATH").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    let mut store = JsonFileSettingsStore::new(path);
    let config = match store.load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => StrategyConfig::from_env()?,
        Err(e) => {
            log::warn!("Settings in {:?} unusable: {}, using environment/defaults", store.path(), e);
            StrategyConfig::from_env()?
        }
    };

    let mut engine = RiskEngine::new(config)?;
    log::info!(
        "Session started: capital {:.2}, leverage {}:1, R:R {}",
        engine.config().initial_capital, engine.config().leverage, engine.config().risk_reward_ratio
    );
    println!("Commands: w/win, l/loss, stats, reset, save, quit");

    let stdin = io::stdin();
    loop {
        print_next(&engine);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let cmd = line.trim().to_ascii_lowercase();

        match cmd.as_str() {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "stats" => print_report(&engine.report()),
            "reset" => {
                engine.reset();
                println!("Run reset to {:.2}", engine.config().initial_capital);
            }
            "save" => match store.save(engine.config()) {
                Ok(()) => println!("Settings saved to {:?}", store.path()),
                Err(e) => log::error!("Save failed: {}", e),
            },
            other => match parse_outcome(other) {
                Ok(outcome) => {
                    let t = engine.record(outcome);
                    println!(
                        "  #{:<3} {:<4}  risk {:>9.2}  lots {:>7.2}  P/L {:>+9.2}  balance {:>10.2}{}",
                        t.sequence_number, t.outcome, t.risk_amount, t.lots,
                        t.profit_loss, t.balance_after,
                        if t.recovery_mode_after { "  [recovery]" } else { "" }
                    );
                }
                Err(e) => println!("  {}", e),
            },
        }
    }

    print_report(&engine.report());
    Ok(())
}

fn print_next(engine: &RiskEngine) {
    let d = engine.next_risk();
    let p = engine.next_position();
    println!();
    println!("  Next trade   {}", d.risk_type_description);
    println!("  Risk         {:>10.2}   Lots {:.2}   TP {:.1} pips", d.risk_amount, p.lots, p.take_profit_pips);
    println!(
        "  Margin       {:>10.2}   Free {:.2}   Level {:.0}%   Max lots {:.2}",
        p.required_margin, p.free_margin, p.margin_level, p.max_lots_available
    );
}
