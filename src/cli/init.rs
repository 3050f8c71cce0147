//! Handler for `roverdb init`.

use serde_json::json;

use super::command::InitArgs;
use super::{output, paths, Context};
use crate::error::{ConfigError, Result};
use crate::store::database::{existing_tables, TABLES};

/// Write the configuration file if needed and create the database.
///
/// The file gets the configuration as loaded, so one-off `--db` and
/// environment overrides are not persisted.
pub fn execute(args: &InitArgs, ctx: &Context) -> Result<()> {
    let write_config = args.force || !ctx.config_path.exists();
    if write_config {
        paths::ensure_parent_dir(&ctx.config_path)?;
        let rendered = toml::to_string_pretty(&ctx.file_config).map_err(ConfigError::Serialize)?;
        std::fs::write(&ctx.config_path, rendered)?;
    }

    let db = ctx.open_database()?;
    let tables = {
        let mut conn = db.conn()?;
        existing_tables(&mut conn)?
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "init",
            "config": ctx.config_path.display().to_string(),
            "config_written": write_config,
            "database": ctx.config.database.url(),
            "tables": tables,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    if write_config {
        output::success(&format!("Wrote {}", ctx.config_path.display()));
    } else {
        output::note(&format!("Kept existing {}", ctx.config_path.display()));
    }
    output::success(&format!(
        "Database ready at {} ({}/{} tables)",
        output::highlight(ctx.config.database.url()),
        tables.len(),
        TABLES.len()
    ));
    Ok(())
}
