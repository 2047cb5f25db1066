use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{picnic, quiz, weather};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize core
    climatask_core::init()?;

    let mut app = climatask_core::App::new()?;
    app.initialize()?;
    let config = app.shared_config();

    let outcome = match cli.command {
        Commands::Weather { city } => weather::run(&config, &city).await,
        Commands::Picnic {
            city,
            days,
            date,
            save,
            items,
            skipped_items,
            participants,
        } => {
            let request = picnic::PicnicRequest {
                city,
                num_days: days.unwrap_or(config.planner.num_days),
                date,
                save,
                extra_items: items,
                skipped_items,
                participants,
            };
            picnic::run(&config, request).await
        }
        Commands::Plans => picnic::list_plans(&config),
        Commands::Categories => quiz::list_categories(&config).await,
        Commands::Streak => quiz::show_streak(&config),
        Commands::Quiz { category } => quiz::run(&config, category).await,
    };

    app.shutdown()?;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
