//! Subcommand execution.

use crate::cli::{AdminCommand, ServeArgs};
use crate::config::AppConfig;
use anyhow::{anyhow, Context, Result};
use blogengine_core::db::open_db;
use blogengine_core::{
    AdminAction, AdminError, AdminForm, AdminSite, ContentService, SqliteContentStore,
};
use blogengine_web::AppState;
use log::info;

pub async fn serve(config: &AppConfig, args: ServeArgs) -> Result<()> {
    let bind_addr = args.bind.unwrap_or_else(|| config.bind_addr.clone());
    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let state = AppState::new(conn, config.site_settings())?;
    info!("event=serve module=cli status=start addr={bind_addr}");
    println!("Serving {} on http://{bind_addr}/", state.site().title);
    blogengine_web::serve(state, &bind_addr)
        .await
        .with_context(|| format!("server failed on `{bind_addr}`"))
}

/// Runs one admin action and returns the message shown to the user.
pub fn admin(config: &AppConfig, command: AdminCommand) -> Result<String> {
    let action = admin_action(command)?;
    let mut conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let mut content = ContentService::new(SqliteContentStore::try_new(&mut conn)?);
    let site = AdminSite::new();

    match site.dispatch(&mut content, &action) {
        Ok(outcome) => Ok(outcome.message()),
        Err(AdminError::Invalid(errors)) => {
            let details = errors
                .iter()
                .flat_map(|(field, messages)| {
                    messages
                        .iter()
                        .map(move |message| format!("  {field}: {message}"))
                })
                .collect::<Vec<_>>()
                .join("\n");
            Err(anyhow!("Please correct the errors below.\n{details}"))
        }
        Err(err) => Err(err.into()),
    }
}

fn admin_action(command: AdminCommand) -> Result<AdminAction> {
    let parse = |pairs: Vec<String>| AdminForm::parse_pairs(pairs).map_err(|err| anyhow!(err));
    Ok(match command {
        AdminCommand::Add { entity, fields } => AdminAction::Add {
            kind: entity,
            form: parse(fields.pairs)?,
        },
        AdminCommand::Change { entity, id, fields } => AdminAction::Change {
            kind: entity,
            id,
            form: parse(fields.pairs)?,
        },
        AdminCommand::Delete { entity, id } => AdminAction::Delete { kind: entity, id },
    })
}
