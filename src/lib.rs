pub mod cli;
pub mod column;
pub mod config;
pub mod entity;
pub mod error;
pub mod format;
pub mod join;
pub mod render;
pub mod table;
pub mod time;
pub mod variable;

use std::{
    env,
    fs::File,
    io::BufReader,
    path::Path,
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    config::ChartConfig,
    join::JoinOutput,
    variable::VariableBundle,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("chart_table", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Csv(args) => handle_csv(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn handle_csv(args: &cli::CsvArgs) -> Result<()> {
    let output = join_from_files(&args.bundle, &args.config)?;
    let csv = output
        .table
        .to_csv()
        .context("Rendering the CSV export")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{csv}\n"))
                .with_context(|| format!("Writing CSV to {path:?}"))?;
            info!(
                "Wrote {} row(s) across {} column(s) to {:?}",
                output.table.num_rows(),
                output.table.columns().len(),
                path
            );
        }
        None => println!("{csv}"),
    }
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let output = join_from_files(&args.bundle, &args.config)?;
    let table = &output.table;
    let headers = table
        .columns()
        .iter()
        .map(|column| column.def.label().to_string())
        .collect::<Vec<_>>();
    let shown = args.rows.min(table.num_rows());
    let rows = (0..shown)
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|column| column.cells[row].as_display())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    render::print_table(&headers, &rows);
    info!("Displayed {} of {} row(s)", shown, table.num_rows());
    Ok(())
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let output = join_from_files(&args.bundle, &args.config)?;
    let headers = vec![
        "slug".to_string(),
        "name".to_string(),
        "unit".to_string(),
        "role".to_string(),
        "target".to_string(),
    ];
    let rows = output
        .table
        .columns()
        .iter()
        .map(|column| {
            let def = &column.def;
            vec![
                def.slug.clone(),
                def.label().to_string(),
                def.unit.clone().unwrap_or_default(),
                def.property.map(|p| p.as_str().to_string()).unwrap_or_default(),
                def.target_time.map(|t| t.to_string()).unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    render::print_table(&headers, &rows);
    info!(
        "Resolved {} column(s) from {} dimension(s)",
        output.table.columns().len(),
        output.dimensions.len()
    );
    Ok(())
}

fn join_from_files(bundle_path: &Path, config_path: &Path) -> Result<JoinOutput> {
    let bundle: VariableBundle = read_json(bundle_path)
        .with_context(|| format!("Loading variable bundle from {bundle_path:?}"))?;
    let config: ChartConfig = read_json(config_path)
        .with_context(|| format!("Loading chart config from {config_path:?}"))?;
    info!(
        "Joining {} variable(s) across {} dimension(s)",
        bundle.len(),
        config.dimensions.len()
    );
    let output = join::legacy_to_table(&bundle, &config).context("Joining variables into a table")?;
    Ok(output)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Opening {path:?}"))?;
    let parsed = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing JSON from {path:?}"))?;
    Ok(parsed)
}
