use std::path::PathBuf;

use clap::Subcommand;

use crate::repository::ProfileType;

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCmd {
    #[command(
        about = "Print the stored profile of a user",
        long_about = "Look up the profile stored for a user identifier in every profile collection and print it as JSON."
    )]
    Show {
        #[arg(long, value_name = "UID", help = "User identifier")]
        uid: String,
    },
    #[command(
        about = "Delete the stored profile of a user",
        long_about = "Remove the profile stored for a user identifier. Fails when the user has no profile."
    )]
    Delete {
        #[arg(long, value_name = "UID", help = "User identifier")]
        uid: String,
    },
    #[command(
        about = "Validate a profile form",
        long_about = "Check a JSON form against the schema of the given profile type and print the document it would produce."
    )]
    Validate {
        #[arg(
            long = "type",
            value_name = "TYPE",
            help = "Profile type: individual or organization"
        )]
        kind: ProfileType,
        #[arg(long, value_name = "PATH", help = "JSON file holding the form")]
        file: PathBuf,
    },
}
