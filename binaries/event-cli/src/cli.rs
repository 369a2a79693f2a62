use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "event-cli")]
#[command(about = "Inspect and edit users and events through the cache-aside repositories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Skip the cache probe and talk to the database only
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Overrides PG_URI / DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// User operations
    #[command(subcommand)]
    User(UserCommand),
    /// Event operations
    #[command(subcommand)]
    Event(EventCommand),
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Credential hash to store as-is
        #[arg(long)]
        password: String,
    },
    Get {
        id: i64,
    },
    GetByEmail {
        email: String,
    },
    List,
    Update {
        id: i64,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    Create {
        #[arg(long)]
        owner_id: i64,
        #[command(flatten)]
        fields: EventFields,
    },
    Get {
        id: i64,
    },
    List,
    ListByOwner {
        owner_id: i64,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: EventFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct EventFields {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: NaiveDate,
    #[arg(long)]
    pub location: String,
}
