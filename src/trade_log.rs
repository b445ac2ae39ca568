use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{JournalError, Result};
use crate::types::{Outcome, TradeRecord};

pub fn parse_outcome(raw: &str) -> Result<Outcome> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "W" | "WIN" => Ok(Outcome::Win),
        "L" | "LOSS" => Ok(Outcome::Loss),
        _ => Err(JournalError::UnknownOutcome(raw.trim().to_string())),
    }
}

/// One outcome per line; blank lines and `#` comments are skipped.
pub fn read_outcomes<R: BufRead>(reader: R) -> Result<Vec<Outcome>> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        out.push(parse_outcome(line)?);
    }
    Ok(out)
}

pub fn load_outcomes(path: &Path) -> Result<Vec<Outcome>> {
    read_outcomes(BufReader::new(File::open(path)?))
}

// ── Trade log CSV ─────────────────────────────────────────────────────────────
pub fn write_trades<W: Write>(trades: &[TradeRecord], mut w: W) -> Result<()> {
    writeln!(
        w,
        "seq,outcome,risk_amount,risk_type,lots,required_margin,stop_loss_pips,take_profit_pips,\
         profit_loss,balance_before,balance_after,cumulative_pl,recovery_after"
    )?;
    for t in trades {
        writeln!(
            w,
            "{},{},{:.2},\"{}\",{:.4},{:.2},{:.1},{:.1},{:.2},{:.2},{:.2},{:.2},{}",
            t.sequence_number, t.outcome, t.risk_amount,
            t.risk_type_description.replace('"', "\"\""),
            t.lots, t.required_margin, t.stop_loss_pips, t.take_profit_pips,
            t.profit_loss, t.balance_before, t.balance_after, t.cumulative_running_pl,
            t.recovery_mode_after
        )?;
    }
    Ok(())
}

pub fn save_trades(trades: &[TradeRecord], path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_trades(trades, &mut w)?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyConfig;
    use crate::risk_engine::RiskEngine;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(parse_outcome("w").unwrap(), Outcome::Win);
        assert_eq!(parse_outcome(" LOSS ").unwrap(), Outcome::Loss);
        assert_eq!(parse_outcome("Win").unwrap(), Outcome::Win);
        assert!(matches!(
            parse_outcome("draw"),
            Err(JournalError::UnknownOutcome(s)) if s == "draw"
        ));
    }

    #[test]
    fn reads_outcomes_skipping_comments() {
        let input = "# session 1\nW\n\nL  # stopped out\nwin\n";
        let outcomes = read_outcomes(input.as_bytes()).unwrap();
        assert_eq!(outcomes, vec![Outcome::Win, Outcome::Loss, Outcome::Win]);
    }

    #[test]
    fn bad_line_fails_the_read() {
        assert!(read_outcomes("W\nmaybe\n".as_bytes()).is_err());
    }

    #[test]
    fn writes_one_row_per_trade() {
        let mut engine = RiskEngine::new(StrategyConfig::default()).unwrap();
        engine.record(Outcome::Win);
        engine.record(Outcome::Loss);

        let mut buf = Vec::new();
        write_trades(engine.trades(), &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("seq,outcome,risk_amount"));
        assert_eq!(
            lines[1],
            "1,WIN,300.00,\"Initial 10%\",1.5000,300.00,20.0,40.0,600.00,3000.00,3600.00,600.00,false"
        );
        assert!(lines[2].starts_with("2,LOSS,150.00,"));
        assert!(lines[2].ends_with(",-150.00,3600.00,3450.00,450.00,true"));
    }
}
