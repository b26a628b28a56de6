use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub api_listen: SocketAddr,
    pub log_file: Option<PathBuf>,
    pub zip_table: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            api_listen: cli.api_listen,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            zip_table: cli.zip_table.as_ref().map(PathBuf::from),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("profiles.sqlite")
    }
}
