//! tmuxer - pick a project and open its tmux session
//!
//! Run with `tmuxer` or `tmuxer --help` for usage.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tmuxer::{
    config::Config,
    discovery::{discover, Project},
    tmux::{SessionOrchestrator, TmuxExecutor},
    tui::{select_project, FuzzyPicker},
    Error, APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Fuzzy-pick a project directory and open or attach its tmux session")]
#[command(long_about = None)]
struct Cli {
    /// Base patterns where projects are located (e.g. '~/code/**/{.git}')
    #[arg(short, long = "base", value_name = "PATTERN")]
    bases: Vec<String>,

    /// Directories containing any of these are projects, for bases ending in '**' [default: .git]
    #[arg(short, long = "marker", value_name = "NAME", value_delimiter = ',')]
    markers: Vec<String>,

    /// Globs for directories and projects to skip
    #[arg(short, long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    /// Path to config file ('-' for none) [default: ~/.config/tmux/tmuxer.yaml]
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a project and open its tmux session (default)
    Open {
        /// Initial query; an exact project name skips the picker
        query: Option<String>,
    },

    /// List discovered projects
    List {
        /// Print full paths instead of names
        #[arg(short, long)]
        paths: bool,
    },

    /// Show the effective configuration
    Config,
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("Configuration:");
    println!("  base:");
    for base in &config.base {
        println!("    - {}", base);
    }
    println!("  marker: {}", config.marker.join(", "));
    println!("  ignore: {}", config.ignore.join(", "));
    println!("  command_timeout_secs: {}", config.command_timeout_secs);
    match Config::default_file_path() {
        Some(path) => println!("\nDefault config file: {:?}", path),
        None => println!("\nDefault config file: (no home directory)"),
    }
}

fn print_projects(projects: &[Project], paths: bool) {
    for project in projects {
        if paths {
            println!("{}", project.full_path.display());
        } else {
            println!("{}\t{}", project.name, project.display_path());
        }
    }
}

async fn open_project(config: &Config, projects: &[Project], query: Option<String>) -> tmuxer::Result<()> {
    let mut picker = FuzzyPicker::new().with_query(query.clone().unwrap_or_default());
    let project = select_project(&mut picker, projects, query.as_deref()).await?;
    info!("Starting selected project: {}", project.name);

    let executor = TmuxExecutor::new().with_timeout(config.command_timeout());
    executor.check_installed().await?;

    let orchestrator = SessionOrchestrator::new(executor);
    let outcome = orchestrator.ensure_session(project).await?;
    info!(
        "{:?} session '{}' (created: {})",
        outcome.action, outcome.session, outcome.created
    );

    Ok(())
}

async fn run(cli: Cli) -> tmuxer::Result<()> {
    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_cli(cli.bases, cli.markers, cli.ignore);

    let command = cli.command.unwrap_or(Commands::Open { query: None });
    if let Commands::Config = command {
        print_config(&config);
        return Ok(());
    }

    let projects = discover(&config)?;

    match command {
        Commands::List { paths } => {
            print_projects(&projects, paths);
            Ok(())
        }
        Commands::Open { query } => open_project(&config, &projects, query).await,
        Commands::Config => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.debug, cli.log_file.as_deref())?;

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(Error::SelectionCancelled) => {
            eprintln!("{}", Error::SelectionCancelled);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
