use std::path::PathBuf;

use clap::Parser;
use health_quiz::{ConfigLoader, JsonFileBackend, Quiz, QuizConfig, QuizError};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "health-quiz.log";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file (defaults to ./health-quiz.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the module question files
    #[arg(short, long)]
    questions_dir: Option<PathBuf>,

    /// Directory for the progress file and log
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Name to prefill on the login screen
    #[arg(short, long)]
    user: Option<String>,

    /// Shuffle question and option order
    #[arg(long)]
    shuffle: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(JsonFileBackend::default_data_dir);

    // The terminal belongs to the UI, so logs go to a file.
    let _log_guard = init_logging(&data_dir, args.verbose);

    if let Err(e) = run(args, data_dir) {
        tracing::error!(error = %e, "quiz failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args, data_dir: PathBuf) -> Result<(), QuizError> {
    let mut config = ConfigLoader::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    tracing::info!(title = %config.title, "starting quiz");
    let quiz = Quiz::from_config(config, Some(data_dir), args.user)?;
    quiz.run()
}

fn apply_overrides(config: &mut QuizConfig, args: &Args) {
    if let Some(dir) = &args.questions_dir {
        config.questions_dir = dir.clone();
    }
    if args.shuffle {
        config.shuffle_questions = true;
        config.shuffle_options = true;
    }
}

fn init_logging(
    data_dir: &std::path::Path,
    verbose: u8,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if let Err(e) = std::fs::create_dir_all(data_dir) {
        eprintln!("Logging disabled, cannot create {}: {}", data_dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Some(guard)
}
