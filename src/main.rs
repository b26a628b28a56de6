mod app;
mod cli;
mod commands;
mod context;
mod logging;
mod repository;
mod rest;
mod schema;
mod storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
