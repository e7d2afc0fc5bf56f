use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;

use commands::Context;

#[derive(Debug, Parser)]
#[command(name = "buffalo", version, about = "A workflow management tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the projects (default: ~/.local/share/buffalo/projects)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Workflow template used for new projects (default: bundled template)
    #[arg(long, global = true)]
    template: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create a project from the workflow template
    ///
    /// Creates `<base-dir>/<name>/workflow.yml` listing every work of the
    /// template as not started. If the project already exists it is left
    /// untouched and reused.
    ///
    /// Project names must be valid folder names: no `< > : " / \ | ? *`,
    /// and no leading or trailing dot or space.
    Create {
        /// Project name (used as the folder name)
        name: String,
    },
    /// List projects and their progress
    List,
    /// Show the works of a project
    Show {
        /// Project name
        project: String,
    },
    /// Show the next work of every project
    ///
    /// A work is ready when it is the first work of the workflow or the
    /// work before it is done. Otherwise it is blocked.
    Next,
    /// Find a project offering the named work
    Job {
        /// Work name
        work: String,

        /// Return the work whatever its state
        #[arg(long)]
        without_check: bool,
    },
    /// Set the status of a work (not_started, in_progress, done)
    SetStatus {
        /// Project name
        project: String,
        /// Work name
        work: String,
        /// New status
        status: String,
    },
    /// Mark a work as in progress
    Start {
        /// Project name
        project: String,
        /// Work name
        work: String,
    },
    /// Mark a work as done
    Finish {
        /// Project name
        project: String,
        /// Work name
        work: String,
    },
    /// Copy a file or directory into a project
    Copy {
        /// Project name
        project: String,
        /// File or directory to copy
        path: PathBuf,
    },
    /// Move a file or directory into a project
    Move {
        /// Project name
        project: String,
        /// File or directory to move
        path: PathBuf,
    },
    /// Print the bundled workflow template
    Template,
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Get a config value (or print the whole config file)
    Get {
        /// Config key (base_dir, template_path)
        key: Option<String>,
    },
    /// Set a config value in the config file
    Set {
        /// Config key (base_dir, template_path)
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = Context::new(cli.base_dir, cli.template);

    match cli.command {
        Commands::Create { name } => commands::create_project(&ctx, &name)?,
        Commands::List => commands::list_projects(&ctx)?,
        Commands::Show { project } => commands::show_project(&ctx, &project)?,
        Commands::Next => commands::show_next(&ctx)?,
        Commands::Job {
            work,
            without_check,
        } => commands::find_job(&ctx, &work, without_check)?,
        Commands::SetStatus {
            project,
            work,
            status,
        } => commands::set_status(&ctx, &project, &work, &status)?,
        Commands::Start { project, work } => {
            commands::set_status(&ctx, &project, &work, "in_progress")?;
        }
        Commands::Finish { project, work } => {
            commands::set_status(&ctx, &project, &work, "done")?;
        }
        Commands::Copy { project, path } => commands::copy_into(&ctx, &project, &path)?,
        Commands::Move { project, path } => commands::move_into(&ctx, &project, &path)?,
        Commands::Template => commands::show_template(),
        Commands::Config(command) => match command {
            ConfigCommands::Show => commands::config::show_config(&ctx)?,
            ConfigCommands::Get { key } => commands::config::get_config(&ctx, key)?,
            ConfigCommands::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommands::Path => commands::config::show_path(),
            ConfigCommands::Example => commands::config::show_example(),
            ConfigCommands::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
