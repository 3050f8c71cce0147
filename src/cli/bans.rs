//! Handler for the `bans` command group.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::{BanArgs, BanListArgs, BanPurgeArgs, BansCommand};
use super::{output, Context};
use crate::domain::{Ban, BanScope, BanTarget};
use crate::error::Result;
use crate::store::Database;

#[derive(Tabled)]
struct BanRow {
    #[tabled(rename = "Kind")]
    target: BanTarget,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Scope")]
    scope: String,
}

impl From<Ban> for BanRow {
    fn from(ban: Ban) -> Self {
        let scope = match (ban.global, ban.module) {
            (true, _) => "global".to_string(),
            (false, Some(module)) => module,
            (false, None) => "unknown module".to_string(),
        };
        Self {
            target: ban.target,
            name: ban.name,
            scope,
        }
    }
}

fn scope_of(module: Option<&String>) -> BanScope {
    module.map_or(BanScope::Global, BanScope::module)
}

fn describe(scope: &BanScope) -> String {
    match scope {
        BanScope::Module(module) => format!("for {module}"),
        BanScope::Global => "globally".to_string(),
    }
}

pub fn execute(command: BansCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    match command {
        BansCommand::List(args) => list(&db, &args),
        BansCommand::Add(args) => add(&db, &args),
        BansCommand::Remove(args) => remove(&db, &args),
        BansCommand::Purge(args) => purge(&db, &args),
    }
}

fn list(db: &Database, args: &BanListArgs) -> Result<()> {
    let targets = match args.target {
        Some(target) => vec![BanTarget::from(target)],
        None => vec![BanTarget::User, BanTarget::Subreddit],
    };
    let mut bans = Vec::new();
    for target in targets {
        bans.extend(db.all_bans(target)?);
    }

    if output::is_json() {
        output::json_output(json!({ "command": "bans.list", "bans": bans }));
        return Ok(());
    }

    output::section("Bans");
    if bans.is_empty() {
        output::note("No bans");
        return Ok(());
    }
    output::lines(&Table::new(bans.into_iter().map(BanRow::from)).to_string());
    Ok(())
}

fn add(db: &Database, args: &BanArgs) -> Result<()> {
    let target = BanTarget::from(args.target);
    let scope = scope_of(args.module.as_ref());
    db.ban(target, &args.name, &scope)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "bans.add",
            "target": target,
            "name": args.name,
            "module": args.module,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Banned {target} {} {}",
        output::highlight(&args.name),
        describe(&scope)
    ));
    Ok(())
}

fn remove(db: &Database, args: &BanArgs) -> Result<()> {
    let target = BanTarget::from(args.target);
    let scope = scope_of(args.module.as_ref());
    let removed = db.unban(target, &args.name, &scope)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "bans.remove",
            "target": target,
            "name": args.name,
            "module": args.module,
            "removed": removed,
        }));
        return Ok(());
    }

    if removed == 0 {
        output::warning(&format!("No ban on {target} {} {}", args.name, describe(&scope)));
    } else {
        output::success(&format!(
            "Lifted {removed} ban(s) on {target} {}",
            output::highlight(&args.name)
        ));
    }
    Ok(())
}

fn purge(db: &Database, args: &BanPurgeArgs) -> Result<()> {
    let target = BanTarget::from(args.target);
    if !args.yes {
        output::warning(&format!("This removes every {target} ban; pass --yes to confirm"));
        return Ok(());
    }
    let removed = db.purge_bans(target)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "bans.purge",
            "target": target,
            "removed": removed,
        }));
        return Ok(());
    }

    output::success(&format!("Removed {removed} {target} ban(s)"));
    Ok(())
}
