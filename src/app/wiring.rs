use std::sync::Arc;

use crate::{context, repository::Database, schema::ZipTable, storage};
use anyhow::{Context, Result};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStore> {
    let sqlite = storage::SqliteStore::new(ctx.db_path());
    if ctx.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}

pub fn load_zip_table(ctx: &context::Context) -> Result<Arc<ZipTable>> {
    let table = match &ctx.zip_table {
        Some(path) => {
            let table = ZipTable::from_path(path)?;
            log::info!(
                "📮 Zip table: {} ({} codes)",
                path.display(),
                table.code_count()
            );
            table
        }
        None => {
            let table = ZipTable::bundled()?;
            log::info!("📮 Zip table: bundled ({} codes)", table.code_count());
            table
        }
    };
    Ok(Arc::new(table))
}

pub fn build_database(
    storage: storage::SqliteStore,
    zips: Arc<ZipTable>,
) -> Arc<Database<storage::SqliteStore>> {
    Arc::new(Database::new(storage, zips))
}
