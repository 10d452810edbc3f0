mod aggregate;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod notify;
mod render;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{AccountsCommands, Cli, Commands, Context};

const LOG_ENV: &str = "TXSUMMARY_LOG";

fn init_tracing(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(configured)),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let settings = match settings::load_settings() {
        Ok(settings) => settings,
        // `init` rewrites the file, so a broken one must not block it.
        Err(_) if matches!(cli.command, Commands::Init { .. }) => settings::Settings::default(),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Fix or delete {} (or run `txsummary init`) to continue.",
                settings::settings_path().display()
            );
            std::process::exit(1);
        }
    };
    init_tracing(cli.verbose, &settings.log_level);

    let ctx = Context {
        settings,
        db: cli.db,
        outbox: cli.outbox,
    };

    let result = match cli.command {
        Commands::Init {
            data_dir,
            reference_year,
            email_from,
        } => cli::init::run(data_dir, reference_year, email_from),
        Commands::Accounts { command } => match command {
            AccountsCommands::Create => cli::accounts::create(&ctx),
            AccountsCommands::Show { id } => cli::accounts::show(&ctx, id),
        },
        Commands::Import { file, account } => cli::import::run(&ctx, &file, account),
        Commands::Summarize { account } => cli::summarize::summarize(&ctx, account),
        Commands::Show { account } => cli::summarize::show(&ctx, account),
        Commands::Run {
            file,
            email_to,
            in_memory,
            stdout,
        } => cli::run::run(&ctx, &file, &email_to, in_memory, stdout),
        Commands::Status => cli::status::run(&ctx),
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
