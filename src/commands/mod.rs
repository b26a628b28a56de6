use crate::app::App;
use crate::cli::Command;

pub mod profile;

pub trait CommandRunner {
    fn run(&self, app: &App) -> anyhow::Result<()>;
}

impl Command {
    pub fn run(&self, app: &App) -> anyhow::Result<()> {
        match self {
            Command::Profile { cmd } => cmd.run(app),
        }
    }
}
