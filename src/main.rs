use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use mapmaker::{
    AppConfig, CreationTracker, LocalBackend, MapBackend, ProgressStep, ProjectDraft,
    core::departments,
};

#[derive(Parser)]
#[command(name = "mapmaker")]
#[command(about = "Create and browse map projects")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Workspace holding resources/QGIS (overrides the config file)
    #[arg(long, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Pause between job phases in milliseconds (overrides the config file)
    #[arg(long, value_name = "MS")]
    phase_delay_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create a project without opening the window
    Create {
        /// Department code, e.g. 75 or 2A
        department: String,
        /// Name of the new project
        name: String,
    },
    /// List existing projects
    Projects,
    /// List known departments
    Departments,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mapmaker=debug" } else { "mapmaker=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(workspace) = args.workspace {
        config.workspace_dir = workspace;
    }
    if let Some(delay) = args.phase_delay_ms {
        config.phase_delay_ms = delay;
    }
    let backend = LocalBackend::from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(backend.setup_check())?;

    match args.command {
        None => run_gui(backend),
        Some(Command::Create { department, name }) => {
            runtime.block_on(create(&backend, ProjectDraft::new(department, name)))
        }
        Some(Command::Projects) => runtime.block_on(list_projects(&backend)),
        Some(Command::Departments) => {
            for (code, name) in departments::all() {
                println!("{code:>4}  {name}");
            }
            Ok(())
        }
    }
}

#[cfg(feature = "gui")]
fn run_gui(backend: LocalBackend) -> anyhow::Result<()> {
    mapmaker::gui::run(backend).context("Desktop app exited with an error")
}

#[cfg(not(feature = "gui"))]
fn run_gui(_backend: LocalBackend) -> anyhow::Result<()> {
    anyhow::bail!("built without the `gui` feature; use a subcommand instead")
}

async fn create(backend: &LocalBackend, draft: ProjectDraft) -> anyhow::Result<()> {
    let mut tracker = CreationTracker::new(draft);
    let mut events = tracker
        .activate(backend)
        .context("Creation was already started")?;

    while let Some(event) = events.next().await {
        if tracker.handle(event) {
            let progress = tracker.state();
            if let Some(error) = progress.error() {
                println!("  failed: {error}");
            } else if progress.is_completed() {
                println!("  done");
            } else if let Some(step) = progress
                .current_step_index()
                .checked_sub(1)
                .and_then(|i| ProgressStep::ALL.get(i))
            {
                println!(
                    "  [{}/{}] {}",
                    progress.current_step_index(),
                    ProgressStep::COUNT,
                    step.title()
                );
            }
        }
    }

    match tracker.state().error() {
        Some(error) => anyhow::bail!("Project creation failed: {error}"),
        None => Ok(()),
    }
}

async fn list_projects(backend: &LocalBackend) -> anyhow::Result<()> {
    let projects = backend.list_projects().await?;
    if projects.is_empty() {
        println!("No projects in {:?}", backend.projects_dir());
    }
    for (title, entry) in projects {
        match entry.image_path {
            Some(image) => println!("{title}  {:?}  (preview {:?})", entry.project_path, image),
            None => println!("{title}  {:?}", entry.project_path),
        }
    }
    Ok(())
}
