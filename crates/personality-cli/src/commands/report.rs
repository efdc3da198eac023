use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use personality_core::display::percent;
use personality_core::{display_rows, highest_row, Config, Level, LevelThresholds, StoredResult};

#[derive(Args)]
pub struct ReportArgs {
    /// Stored-result JSON file (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output the display rows as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let result = StoredResult::from_json(&raw)?;
    let thresholds = Config::load()?.display.thresholds();

    if args.json {
        let rows = display_rows(&result.scores, &thresholds);
        let payload = serde_json::json!({
            "typeCode": result.type_code,
            "avatarIndex": result.type_code.avatar_index(),
            "stability": result.stability,
            "rows": rows,
            "addOns": result.add_ons,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_result(&result, &thresholds);
    Ok(())
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Low => "low",
        Level::Medium => "medium",
        Level::High => "high",
    }
}

/// Human-readable result page.
pub fn print_result(result: &StoredResult, thresholds: &LevelThresholds) {
    let rows = display_rows(&result.scores, thresholds);

    println!(
        "Profile:    {} (avatar {})",
        result.type_code,
        result.type_code.avatar_index()
    );
    println!("Stability:  {}", percent(result.stability));
    println!();
    for row in &rows {
        println!(
            "{} {:<20} {:>3}  {}",
            row.key.code(),
            row.key.label(),
            percent(row.value),
            level_label(row.level)
        );
    }
    if let Some(top) = highest_row(&rows) {
        println!();
        println!("Strongest:  {}", top.key.label());
    }
    if let Some(add_ons) = &result.add_ons {
        println!(
            "Add-ons:    stress={:?} subtype={:?} mode={:?}",
            add_ons.stress_key, add_ons.subtype_key, add_ons.mode_key
        );
    }
}
