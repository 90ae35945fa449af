use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

pub use config::AppConfig;

#[derive(Parser)]
#[command(name = "lecture-dates")]
#[command(about = "Creation dates for course curricula", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML config file ([client] and [driver] sections)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the course id found in saved page markup
    CourseId {
        /// HTML of a course page
        markup: PathBuf,
    },

    /// Run one annotation pass over a list of row titles
    Align {
        /// Rendered row titles, one per line, top to bottom
        #[arg(long)]
        rows: PathBuf,

        #[command(flatten)]
        items: ItemsArgs,
    },

    /// Feed row titles from stdin to the reactive driver as they arrive
    Watch {
        #[command(flatten)]
        items: ItemsArgs,
    },

    /// Print content items per creation year
    Histogram {
        #[command(flatten)]
        items: ItemsArgs,
    },
}

/// Where the curriculum comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub(crate) struct ItemsArgs {
    /// Saved curriculum JSON (array of items or an API page)
    #[arg(long)]
    items: Option<PathBuf>,

    /// Fetch the curriculum of this course from the API
    #[arg(long)]
    course_id: Option<u64>,

    /// Fetch the curriculum of the course found in this page markup
    #[arg(long)]
    page: Option<PathBuf>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // reqwest/hyper internals are noisy at debug
    if !cli.verbose {
        builder.filter_module("hyper", log::LevelFilter::Warn);
        builder.filter_module("reqwest", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base) = cli.api_base {
        config.client.base_url = base;
    }

    let output = match cli.command {
        Commands::CourseId { markup } => commands::course_id(&markup)?,
        Commands::Align { rows, items } => commands::align(&rows, &items, &config).await?,
        Commands::Watch { items } => commands::watch(&items, &config).await?,
        Commands::Histogram { items } => commands::histogram(&items, &config).await?,
    };

    let rendered = serde_json::to_string_pretty(&output).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}
