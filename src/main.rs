use clap::Parser;
use family_dues::args::{Args, Command};
use family_dues::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().dues_home().path();

    // When DUES_IN_TEST_MODE is set and non-empty, the mode will be Mode::Testing and the seeded
    // in-memory sheet is used instead of the configured feed.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Periods => {
            let config = Config::load(home).await?;
            commands::periods(&config, mode).await?.print()
        }

        Command::Status(status_args) => {
            let config = Config::load(home).await?;
            commands::status(&config, mode, status_args).await?.print()
        }

        Command::Owed(owed_args) => {
            let config = Config::load(home).await?;
            commands::owed(&config, mode, owed_args).await?.print()
        }

        Command::Remind(remind_args) => {
            let config = Config::load(home).await?;
            commands::remind(&config, mode, remind_args).await?.print()
        }

        Command::Mcp => commands::mcp(Config::load(home).await?, mode)
            .await?
            .print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
