//! Command-line interface definitions.
//!
//! Defines the `roverdb` CLI using `clap`. Every command opens the database
//! named by the configuration (or `--db`) and creates missing tables first.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{MAX_AGE_DAYS, MAX_AGE_SECONDS};
use crate::domain::BanTarget;

/// Inspect and maintain the SQLite store of a Reddit bot framework
#[derive(Parser, Debug)]
#[command(name = "roverdb")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file [default: ~/.roverdb/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the configuration
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and a default configuration file
    Init(InitArgs),

    /// Manage registered bot modules
    #[command(subcommand)]
    Modules(ModulesCommand),

    /// Inspect and prune the session storage
    #[command(subcommand)]
    Storage(StorageCommand),

    /// Inspect update threads
    #[command(subcommand)]
    Updates(UpdatesCommand),

    /// Manage user and subreddit bans
    #[command(subcommand)]
    Bans(BansCommand),

    /// Inspect response statistics
    #[command(subcommand)]
    Stats(StatsCommand),

    /// Inspect the inbox message log
    #[command(subcommand)]
    Messages(MessagesCommand),

    /// Inspect daily meta counters
    #[command(subcommand)]
    Meta(MetaCommand),
}

/// Arguments for `roverdb init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Subcommands for `roverdb modules`.
#[derive(Subcommand, Debug)]
pub enum ModulesCommand {
    /// List registered modules
    List,
    /// Register a module (no-op when already registered)
    Register(ModuleNameArg),
    /// Delete a module and every row it owns
    Wipe(WipeArgs),
}

#[derive(Args, Debug)]
pub struct ModuleNameArg {
    /// Module name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct WipeArgs {
    /// Module name
    pub name: String,
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

/// Subcommands for `roverdb storage`.
#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    /// List seen things
    List(ModuleFilterArg),
    /// Delete old storage rows and expired update threads
    Cleanup(CleanupArgs),
}

#[derive(Args, Debug)]
pub struct ModuleFilterArg {
    /// Only show rows of this module
    #[arg(short, long)]
    pub module: Option<String>,
}

#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Storage age cutoff in seconds [default: storage.session_seconds]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_AGE_SECONDS))]
    pub older_than: Option<u64>,
}

/// Subcommands for `roverdb updates`.
#[derive(Subcommand, Debug)]
pub enum UpdatesCommand {
    /// List all update threads
    List,
    /// List update threads of a module that are due
    Due(ModuleNameArg),
}

/// Ban table selector.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TargetArg {
    /// Users (`userbans`)
    User,
    /// Subreddits (`subbans`)
    Subreddit,
}

impl From<TargetArg> for BanTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::User => Self::User,
            TargetArg::Subreddit => Self::Subreddit,
        }
    }
}

/// Subcommands for `roverdb bans`.
#[derive(Subcommand, Debug)]
pub enum BansCommand {
    /// List bans
    List(BanListArgs),
    /// Ban a user or subreddit, globally unless a module is given
    Add(BanArgs),
    /// Lift a ban, for every module unless a module is given
    Remove(BanArgs),
    /// Remove every ban of one kind
    Purge(BanPurgeArgs),
}

#[derive(Args, Debug)]
pub struct BanListArgs {
    /// Only list this kind of ban
    #[arg(value_enum)]
    pub target: Option<TargetArg>,
}

#[derive(Args, Debug)]
pub struct BanArgs {
    #[arg(value_enum)]
    pub target: TargetArg,
    /// Username or subreddit name
    pub name: String,
    /// Restrict to one module
    #[arg(short, long)]
    pub module: Option<String>,
}

#[derive(Args, Debug)]
pub struct BanPurgeArgs {
    #[arg(value_enum)]
    pub target: TargetArg,
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

/// Subcommands for `roverdb stats`.
#[derive(Subcommand, Debug)]
pub enum StatsCommand {
    /// List recorded responses
    List(ModuleFilterArg),
    /// List responses whose karma is due to be loaded
    Karma(KarmaArgs),
    /// Show responses and karma per module, busiest subreddits and hourly activity
    Summary,
}

#[derive(Args, Debug)]
pub struct KarmaArgs {
    /// Minimum age in days [default: storage.karma_age_days]
    #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_AGE_DAYS)))]
    pub days: Option<u32>,
}

/// Subcommands for `roverdb messages`.
#[derive(Subcommand, Debug)]
pub enum MessagesCommand {
    /// List logged inbox messages
    List(ModuleFilterArg),
}

/// Subcommands for `roverdb meta`.
#[derive(Subcommand, Debug)]
pub enum MetaCommand {
    /// Show the counters of one day
    Show(MetaShowArgs),
}

#[derive(Args, Debug)]
pub struct MetaShowArgs {
    /// Day as YYYY-MM-DD [default: today, UTC]
    #[arg(long)]
    pub day: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["roverdb", "modules", "list", "--json", "--db", "x.db"]);
        assert!(cli.json);
        assert_eq!(cli.db.as_deref(), Some("x.db"));
        assert!(matches!(cli.command, Commands::Modules(ModulesCommand::List)));
    }

    #[test]
    fn ban_add_parses_target_and_module() {
        let cli = Cli::parse_from(["roverdb", "bans", "add", "user", "MioMoto", "-m", "LeafeatorBot"]);
        match cli.command {
            Commands::Bans(BansCommand::Add(args)) => {
                assert_eq!(BanTarget::from(args.target), BanTarget::User);
                assert_eq!(args.name, "MioMoto");
                assert_eq!(args.module.as_deref(), Some("LeafeatorBot"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn age_arguments_are_bounded() {
        let too_old = (MAX_AGE_DAYS + 1).to_string();
        assert!(Cli::try_parse_from(["roverdb", "stats", "karma", "--days", &too_old]).is_err());
        assert!(Cli::try_parse_from(["roverdb", "stats", "karma", "--days", "30"]).is_ok());

        let too_old = (MAX_AGE_SECONDS + 1).to_string();
        assert!(Cli::try_parse_from(["roverdb", "storage", "cleanup", "--older-than", &too_old])
            .is_err());
        assert!(Cli::try_parse_from(["roverdb", "storage", "cleanup", "--older-than", "0"]).is_err());
    }

    #[test]
    fn meta_day_is_parsed_as_date() {
        let cli = Cli::parse_from(["roverdb", "meta", "show", "--day", "2026-10-18"]);
        match cli.command {
            Commands::Meta(MetaCommand::Show(args)) => {
                assert_eq!(args.day, NaiveDate::from_ymd_opt(2026, 10, 18));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
