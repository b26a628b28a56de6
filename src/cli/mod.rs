mod args;
mod command;
mod profile_cmd;

pub use args::Cli;
pub use command::Command;
pub use profile_cmd::ProfileCmd;

pub use args::parse;
