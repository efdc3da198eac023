use clap::Args;
use personality_core::shuffle::longest_trait_run;
use personality_core::{make_question_order, questions_from_order, Config};

#[derive(Args)]
pub struct OrderArgs {
    /// Seed string (any text; the test page uses a UUID)
    #[arg(long)]
    seed: String,
    /// Longest allowed run of one trait (defaults to the configured value)
    #[arg(long)]
    max_run: Option<usize>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: OrderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let max_run = match args.max_run {
        Some(k) => k,
        None => Config::load()?.shuffle.max_same_trait_in_row,
    };
    let order = make_question_order(&args.seed, max_run);

    if args.json {
        println!("{}", serde_json::to_string(&order)?);
        return Ok(());
    }

    println!("{}", order.join(","));
    let run = longest_trait_run(
        questions_from_order(Some(&order[..]))
            .iter()
            .map(|q| q.trait_code),
    );
    eprintln!("longest same-trait run: {run}");
    Ok(())
}
