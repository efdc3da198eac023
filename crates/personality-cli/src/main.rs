use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "personality-cli", version, about = "Big Five personality test CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the question bank in canonical order
    Questions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the question order for a seed
    Order(commands::order::OrderArgs),
    /// Score an answer vector
    Score(commands::score::ScoreArgs),
    /// Validate a stored result and show the result page
    Report(commands::report::ReportArgs),
    /// Take the test interactively
    Take(commands::take::TakeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Questions { json } => commands::questions::run(json),
        Commands::Order(args) => commands::order::run(args),
        Commands::Score(args) => commands::score::run(args),
        Commands::Report(args) => commands::report::run(args),
        Commands::Take(args) => commands::take::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
