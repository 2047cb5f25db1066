use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Weather lookups, picnic planning and a daily trivia quiz.
#[derive(Debug, Parser)]
#[command(name = "climatask", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Current conditions and the coming days for a city
    Weather {
        city: String,
    },

    /// Recommend picnic dates for a city, optionally saving a plan
    Picnic {
        city: String,

        /// How many recommended dates to show (defaults to planner.num_days)
        #[arg(long)]
        days: Option<usize>,

        /// Show details for this date instead of the top recommendation
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Save a plan for the selected date under this name
        #[arg(long)]
        save: Option<String>,

        /// Extra item to pack (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,

        /// Recommended item to leave out of the saved plan (repeatable)
        #[arg(long = "skip-item")]
        skipped_items: Vec<String>,

        /// Participant name (repeatable)
        #[arg(long = "participant")]
        participants: Vec<String>,
    },

    /// List saved picnic plans
    Plans,

    /// List trivia categories
    Categories,

    /// Show the current quiz streak
    Streak,

    /// Play today's quiz, then practice
    Quiz {
        /// Category id (see `categories`); asked interactively when omitted
        #[arg(long)]
        category: Option<u32>,
    },
}
