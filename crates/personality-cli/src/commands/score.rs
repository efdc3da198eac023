use clap::Args;
use personality_core::{Config, ProfileRule, Scorer, QUESTION_COUNT};
use tracing::warn;

use super::{parse_answers, report, split_list};

#[derive(Args)]
pub struct ScoreArgs {
    /// Comma-separated answers (1-5), in the order the questions were asked
    #[arg(long)]
    answers: String,
    /// Comma-separated question ids the answers were collected in
    #[arg(long)]
    order: Option<String>,
    /// Use the deadzone profile rule with the configured bounds
    #[arg(long)]
    deadzone: bool,
    /// Output the stored-result JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ScoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let answers = parse_answers(&args.answers)?;
    if answers.len() != QUESTION_COUNT {
        warn!(
            got = answers.len(),
            expected = QUESTION_COUNT,
            "answer count differs from the question bank"
        );
    }
    let order = args.order.as_deref().map(split_list);

    let scorer = if args.deadzone {
        Scorer::with_rule(ProfileRule::Deadzone {
            lower: config.profile.deadzone_lower,
            upper: config.profile.deadzone_upper,
        })
    } else {
        config.scorer()
    };

    let result = scorer.compute_result(&answers, order.as_deref());

    if args.json {
        println!("{}", result.to_json_pretty()?);
    } else {
        report::print_result(&result, &config.display.thresholds());
    }
    Ok(())
}
