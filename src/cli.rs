use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Join variable bundles and chart configs into tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join a variable bundle with a chart config and export CSV
    Csv(CsvArgs),
    /// Preview the first few joined rows in a formatted table
    Preview(PreviewArgs),
    /// List the columns a join would produce
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Variable bundle JSON file (variable id -> data + metadata)
    #[arg(short, long)]
    pub bundle: PathBuf,
    /// Chart configuration JSON file
    #[arg(short, long)]
    pub config: PathBuf,
    /// Output CSV path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Variable bundle JSON file (variable id -> data + metadata)
    #[arg(short, long)]
    pub bundle: PathBuf,
    /// Chart configuration JSON file
    #[arg(short, long)]
    pub config: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Variable bundle JSON file (variable id -> data + metadata)
    #[arg(short, long)]
    pub bundle: PathBuf,
    /// Chart configuration JSON file
    #[arg(short, long)]
    pub config: PathBuf,
}
