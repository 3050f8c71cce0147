//! Handler for the `modules` command group.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::{ModulesCommand, WipeArgs};
use super::{output, Context};
use crate::error::Result;
use crate::store::Database;

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Module")]
    name: String,
}

pub fn execute(command: ModulesCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    match command {
        ModulesCommand::List => list(&db),
        ModulesCommand::Register(arg) => register(&db, &arg.name),
        ModulesCommand::Wipe(args) => wipe(&db, &args),
    }
}

fn list(db: &Database) -> Result<()> {
    let modules = db.all_modules()?;

    if output::is_json() {
        output::json_output(json!({ "command": "modules.list", "modules": modules }));
        return Ok(());
    }

    output::section("Modules");
    if modules.is_empty() {
        output::note("No modules registered");
        return Ok(());
    }
    let rows = modules.into_iter().map(|m| ModuleRow {
        id: m.id.get(),
        name: m.name,
    });
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

fn register(db: &Database, name: &str) -> Result<()> {
    let id = db.register_module(name)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "modules.register",
            "module": name,
            "id": id,
        }));
        return Ok(());
    }

    output::success(&format!("Module {} has id {id}", output::highlight(name)));
    Ok(())
}

fn wipe(db: &Database, args: &WipeArgs) -> Result<()> {
    if !args.yes {
        output::warning(&format!(
            "This deletes every row of {}; pass --yes to confirm",
            args.name
        ));
        return Ok(());
    }

    let wiped = db.wipe_module(&args.name)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "modules.wipe",
            "module": args.name,
            "wiped": wiped,
        }));
        return Ok(());
    }

    if wiped {
        output::success(&format!("Wiped module {}", output::highlight(&args.name)));
    } else {
        output::warning(&format!("Module {} is not registered", args.name));
    }
    Ok(())
}
