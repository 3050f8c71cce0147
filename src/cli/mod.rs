//! CLI module graph and dispatch.

pub mod bans;
pub mod command;
pub mod init;
pub mod messages;
pub mod meta;
pub mod modules;
pub mod output;
pub mod paths;
pub mod stats;
pub mod storage;
pub mod updates;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::store::Database;

use command::{Cli, Commands};

/// Resolved settings shared by every handler.
#[derive(Debug)]
pub struct Context {
    /// Effective configuration, after environment and `--db` overrides.
    pub config: Config,
    /// Configuration as read from `config_path`, or the defaults.
    pub file_config: Config,
    pub config_path: PathBuf,
}

impl Context {
    /// Load the configuration named on the command line, or the default one
    /// when it exists, and apply `--db`.
    ///
    /// `init` accepts a config path that does not exist yet.
    ///
    /// # Errors
    /// Returns an error if an explicit config file is missing or any config
    /// file is invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (file_config, config_path) = match &cli.config {
            Some(path) if matches!(cli.command, Commands::Init(_)) => {
                (Config::load_file_or_default(path)?, path.clone())
            }
            Some(path) => (Config::load_file(path)?, path.clone()),
            None => {
                let path = paths::default_config();
                (Config::load_file_or_default(&path)?, path)
            }
        };
        let mut config = file_config.clone().resolve()?;
        if let Some(db) = &cli.db {
            config.database.path = db.clone();
        }
        Ok(Self {
            config,
            file_config,
            config_path,
        })
    }

    /// Open the configured database, creating its directory and tables.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open_database(&self) -> Result<Database> {
        if !self.config.database.is_in_memory() {
            paths::ensure_parent_dir(Path::new(&self.config.database.url()))?;
        }
        Database::open(&self.config.database)
    }
}

/// Run one parsed command.
///
/// # Errors
/// Returns the first error raised by the handler.
pub fn execute(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Init(args) => init::execute(&args, ctx),
        Commands::Modules(cmd) => modules::execute(cmd, ctx),
        Commands::Storage(cmd) => storage::execute(cmd, ctx),
        Commands::Updates(cmd) => updates::execute(cmd, ctx),
        Commands::Bans(cmd) => bans::execute(cmd, ctx),
        Commands::Stats(cmd) => stats::execute(cmd, ctx),
        Commands::Messages(cmd) => messages::execute(cmd, ctx),
        Commands::Meta(cmd) => meta::execute(cmd, ctx),
    }
}

/// Format an optional timestamp for tables.
pub(crate) fn timestamp(value: Option<chrono::NaiveDateTime>) -> String {
    output::or_dash(value.map(|t| t.format("%F %T")))
}
