use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ddi-console",
    version,
    about = "Drug-drug interaction prediction console"
)]
pub(crate) struct Args {
    /// Optional TOML config; flags given here take precedence.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Submit one drug pair and print the prediction.
    Query {
        drug1: String,
        drug2: String,
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Also write ddi-history.csv into the export directory.
        #[arg(long, default_value_t = false)]
        export: bool,
    },
}
