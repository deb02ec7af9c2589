//! oe-find-sds command line
//!
//! Asks for the datastore credentials, runs one search over every molecule
//! without a safety data sheet and prints what is still missing.

use clap::{ArgAction, Parser, builder::BoolishValueParser};
use oe_find_sds::console::{self, PromptOutcome};
use oe_find_sds::{Config, Database, Error, SdsFinder};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Find and attach missing safety data sheets in a molecule inventory
#[derive(Debug, Parser)]
#[command(name = "oe-find-sds", version, about)]
struct Cli {
    /// Log every failed lookup (accepts --debug, --debug=true, -d)
    #[arg(
        short,
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    debug: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for downloaded `<cas>.pdf` files
    #[arg(long, value_name = "PATH")]
    download_dir: Option<PathBuf>,

    /// Number of molecules looked up at once
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Skip the "logged in as root" question
    #[arg(long)]
    yes: bool,
}

fn init_tracing(debug: bool) {
    let default_directive = if debug {
        "oe_find_sds=debug"
    } else {
        "oe_find_sds=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> oe_find_sds::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.download_dir {
        config.download.download_dir = dir.clone();
    }
    if let Some(workers) = cli.workers {
        config.download.workers = workers;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let credentials = match console::prompt_credentials(&config.database.user, cli.yes) {
        Ok(PromptOutcome::Proceed(credentials)) => credentials,
        Ok(outcome) => {
            let code = outcome.exit_code().unwrap_or(console::EXIT_NOT_ROOT);
            return ExitCode::from(code as u8);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let db = match Database::connect_mysql(
        &config.database,
        &credentials.password,
        &credentials.database,
    )
    .await
    {
        Ok(db) => Arc::new(db),
        Err(Error::Database(e)) => {
            println!("{}", e.operator_message());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            println!("{e}");
            return ExitCode::SUCCESS;
        }
    };

    let finder = match SdsFinder::new(config) {
        Ok(finder) => finder,
        Err(e) => {
            eprintln!("Error: {e}");
            db.pool().close().await;
            return ExitCode::FAILURE;
        }
    };

    println!("Searching for missing SDS files. Please wait!");
    match finder.run(db.clone()).await {
        Ok(summary) => print!("{}", console::render_summary(&summary, cli.debug)),
        Err(e) => println!("Error: {e}"),
    }

    db.pool().close().await;
    ExitCode::SUCCESS
}
