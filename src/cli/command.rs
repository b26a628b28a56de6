use clap::Subcommand;

use crate::cli::profile_cmd::ProfileCmd;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Profile maintenance commands",
        long_about = "Inspect or remove stored profiles and check profile forms against the validation schema without starting the REST service."
    )]
    Profile {
        #[command(subcommand)]
        cmd: ProfileCmd,
    },
}
