mod wiring;

use crate::{cli, context, repository::Database, rest, storage::SqliteStore};
use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub db: Arc<Database<SqliteStore>>,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::logging::init(ctx.log_file.as_deref())?;
        log::info!("🚀 Starting profile-service");
        log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;
        let zips = wiring::load_zip_table(&ctx).context("loading zip table")?;
        let db = wiring::build_database(storage, zips);

        Ok((Self { ctx, db }, cli))
    }
}

pub async fn run_daemon(app: App) -> Result<()> {
    log::info!("🌐 REST API: http://{}", app.ctx.api_listen);
    if let Some(path) = app.ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.to_string_lossy());
    }

    let shutdown = CancellationToken::new();

    let api_addr = app.ctx.api_listen;
    let rest_db = app.db.clone();
    let rest_shutdown = shutdown.clone();

    let mut rest_handle =
        tokio::spawn(async move { rest::serve(api_addr, rest_db, rest_shutdown).await });

    let finished = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        res = &mut rest_handle => Some(res),
    };

    let rest_result = match finished {
        Some(res) => res,
        None => {
            log::info!("🧨 Ctrl-C received, shutting down");
            shutdown.cancel();
            rest_handle.await
        }
    };

    match rest_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::error!("REST server error: {}", e);
            return Err(e);
        }
        Err(e) => {
            log::error!("REST task failed: {}", e);
            return Err(e.into());
        }
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        // one-shot command mode
        cmd.run(&app)?;
        return Ok(());
    }

    run_daemon(app).await
}
