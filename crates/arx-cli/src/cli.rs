use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "arx",
    about = "arx: a content-addressed article catalog",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the configuration)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Payload directory (overrides the configuration)
    #[arg(long, global = true)]
    pub articles_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a file as a new article
    Add(AddArgs),
    /// Change an article's metadata
    Edit(EditArgs),
    /// Delete an article and its payload
    Rm(RmArgs),
    /// List every article
    Ls(LsArgs),
    /// Find articles by contributor or year
    Search(SearchArgs),
    /// Show an article's metadata
    Show(ShowArgs),
    /// Print an article's payload
    Cat(CatArgs),
    /// Print the content id of a file without registering it
    Hash(HashArgs),
    /// Check the index and payloads for problems
    Fsck,
}

#[derive(Args)]
pub struct AddArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub title: String,
    /// Comma-separated contributor names
    #[arg(long)]
    pub authors: String,
    #[arg(long)]
    pub year: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub authors: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    pub id: String,
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct LsArgs {
    #[arg(long, default_value = "title")]
    pub sort: SortArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SortArg {
    Title,
    Authors,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SearchArgs {
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct CatArgs {
    pub id: String,
}

#[derive(Args)]
pub struct HashArgs {
    pub file: PathBuf,
}
