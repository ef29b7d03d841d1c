use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use trivia_quiz::{Config, QuizError, LOG_ENV};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory for saved progress and the log file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Trivia API endpoint
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Log filter used when TRIVIA_QUIZ_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Do not save or resume progress
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let config = Config::resolve(args.data_dir, args.endpoint, args.log_level, args.ephemeral)?;
    init_tracing(&config)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        endpoint = %config.endpoint,
        ephemeral = config.ephemeral,
        "starting"
    );

    trivia_quiz::run(&config).await
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing(config: &Config) -> Result<(), QuizError> {
    fs::create_dir_all(&config.data_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())?;

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| QuizError::Logging(error.to_string()))
}
