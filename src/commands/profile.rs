use std::path::Path;

use super::CommandRunner;
use crate::app::App;
use crate::cli;
use crate::repository::{Entity, ProfileType, Template};
use crate::storage::DocumentStore;
use anyhow::{Context, Result};
use serde_json::Value;

impl CommandRunner for cli::ProfileCmd {
    fn run(&self, app: &App) -> Result<()> {
        match self {
            cli::ProfileCmd::Show { uid } => {
                let (kind, data) = app
                    .db
                    .find(uid)
                    .context("loading profile")?
                    .ok_or_else(|| anyhow::anyhow!("no profile for {uid}"))?;
                log::info!("{} profile {} in {}", kind, uid, kind.collection());
                println!("{}", serde_json::to_string_pretty(&data)?);
                Ok(())
            }
            cli::ProfileCmd::Delete { uid } => {
                if !app.db.delete_profile(uid).context("deleting profile")? {
                    anyhow::bail!("no profile for {uid}");
                }
                log::info!("deleted profile {}", uid);
                Ok(())
            }
            cli::ProfileCmd::Validate { kind, file } => {
                let form = read_form(file)?;
                let document = match kind {
                    ProfileType::Individual => validate_with(&app.db.inds, &form)?,
                    ProfileType::Organization => validate_with(&app.db.orgs, &form)?,
                };
                println!("{}", serde_json::to_string_pretty(&document)?);
                Ok(())
            }
        }
    }
}

fn read_form(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading form {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing form {}", path.display()))
}

fn validate_with<E: Entity, S: DocumentStore>(repo: &Template<E, S>, form: &Value) -> Result<Value> {
    let validated = repo.validate(form).context("form rejected")?;
    Ok(serde_json::to_value(repo.create(validated))?)
}
