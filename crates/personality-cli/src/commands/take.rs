use std::io::{BufRead, Write};
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use clap::Args;
use personality_core::config::config_dir;
use personality_core::session::new_seed;
use personality_core::{Advance, Config, Question, TestProgress, QUESTION_COUNT};
use tracing::debug;

const PROGRESS_FILE: &str = "progress.json";

#[derive(Args)]
pub struct TakeArgs {
    /// Seed for a fresh session; discards any saved progress
    #[arg(long)]
    seed: Option<String>,
    /// Neither resume nor save progress
    #[arg(long)]
    no_save: bool,
}

pub fn run(args: TakeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let max_run = config.shuffle.max_same_trait_in_row;
    let store = if args.no_save {
        None
    } else {
        Some(config_dir()?.join(PROGRESS_FILE))
    };

    let mut progress = match (&args.seed, &store) {
        (Some(seed), _) => TestProgress::start(seed, max_run, Utc::now()),
        (None, Some(path)) => load_progress(path, config.session.ttl(), max_run)?,
        (None, None) => TestProgress::start(&new_seed(), max_run, Utc::now()),
    };

    eprintln!("Answer 1 (disagree) to 5 (agree). b = back, r = reset, q = quit.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let question = progress
            .current_question()
            .ok_or("session position is outside the question order")?;
        prompt(&progress, &question)?;

        let Some(line) = lines.next() else {
            save_progress(store.as_deref(), &progress)?;
            return Err("input ended before the test was complete".into());
        };
        let line = line?;
        let now = Utc::now();

        match line.trim() {
            "q" => {
                save_progress(store.as_deref(), &progress)?;
                eprintln!(
                    "stopped at {}/{} answered",
                    progress.answered_count(),
                    QUESTION_COUNT
                );
                return Ok(());
            }
            "b" => progress.go_back(now),
            "r" => progress.reset(&new_seed(), max_run, now),
            "" if progress.current_answer() != 0 => {
                let current = i64::from(progress.current_answer());
                if progress.commit_answer(current, now)? == Advance::Complete {
                    break;
                }
            }
            input => match input.parse::<i64>() {
                Ok(value) => match progress.commit_answer(value, now) {
                    Ok(Advance::Complete) => break,
                    Ok(Advance::Next(_)) => {}
                    Err(e) => eprintln!("{e}"),
                },
                Err(_) => eprintln!("enter 1-5, b, r or q"),
            },
        }
        save_progress(store.as_deref(), &progress)?;
    }

    let result = progress.finish(&config.scorer(), Utc::now())?;
    if let Some(path) = &store {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
    }
    println!("{}", result.to_json_pretty()?);
    Ok(())
}

fn prompt(progress: &TestProgress, question: &Question) -> std::io::Result<()> {
    let mut err = std::io::stderr();
    let reverse = if question.reverse { ", reverse" } else { "" };
    let current = match progress.current_answer() {
        0 => String::new(),
        a => format!(" [{a}]"),
    };
    write!(
        err,
        "{:>3}% {}/{} {} ({}{}){} > ",
        progress.progress_percent(),
        progress.index + 1,
        QUESTION_COUNT,
        question.id,
        question.trait_code.label(),
        reverse,
        current
    )?;
    err.flush()
}

fn load_progress(
    path: &Path,
    ttl: Duration,
    max_run: usize,
) -> Result<TestProgress, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let stored: Option<serde_json::Value> = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw)
            .map_err(|e| debug!(error = %e, "saved progress is unreadable, starting over"))
            .ok(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let Some(stored) = stored else {
        return Ok(TestProgress::start(&new_seed(), max_run, now));
    };
    let last_active_at: Option<DateTime<Utc>> = stored
        .get("lastActiveAt")
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    Ok(TestProgress::resume(
        stored.get("questionOrder"),
        stored.get("answers"),
        last_active_at,
        now,
        ttl,
        &new_seed(),
        max_run,
    ))
}

fn save_progress(path: Option<&Path>, progress: &TestProgress) -> std::io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string(progress).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

