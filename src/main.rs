//! dirserve - serve a directory tree over HTTP without letting requests escape it.
//!
//! Usage:
//!   dirserve [OPTIONS]                 Serve the root over HTTP
//!   dirserve serve [OPTIONS]           Same as above
//!   dirserve ls [PATH] [--root DIR]    Print a listing or file reference as JSON
//!   dirserve resolve PATH [--root DIR] Print where a request path resolves
//!   dirserve --help                    Show help

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use dirserve_core::{PathGuard, Root, ServeConfig};
use dirserve_list::{DirectoryLister, Lookup};
use dirserve_server::AppState;

#[derive(Parser)]
#[command(
    name = "dirserve",
    version,
    about = "Serve a directory tree over HTTP",
    long_about = "dirserve exposes a directory over a small HTTP API under /home.\n\n\
                  Every request path is canonicalized and must stay inside the \
                  configured root; anything else is rejected."
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    /// Log level filter (e.g. "info", "debug", "dirserve_core=trace")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the root over HTTP
    Serve(ServeArgs),

    /// Print the listing of a directory, or a file reference, as JSON
    Ls {
        /// Path relative to the root
        #[arg(default_value = "")]
        path: String,

        #[command(flatten)]
        root: RootArgs,
    },

    /// Print the canonical location a request path resolves to
    Resolve {
        /// Path relative to the root
        path: String,

        #[command(flatten)]
        root: RootArgs,
    },
}

#[derive(Args)]
struct RootArgs {
    /// Root directory (defaults to "target", created if missing)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Omit entries starting with '.' from listings
    #[arg(long)]
    no_hidden: bool,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    root: RootArgs,

    /// Address to listen on (defaults to 127.0.0.1:8080)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Apply create/upload/replace requests to disk instead of only validating them
    #[arg(long)]
    allow_writes: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Command::Serve(args)) => run_serve(&args)?,
        Some(Command::Ls { path, root }) => run_ls(&path, &root)?,
        Some(Command::Resolve { path, root }) => run_resolve(&path, &root)?,
        None => run_serve(&cli.serve)?,
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Merge defaults, the config file and command-line flags, in that order.
fn load_config(args: &RootArgs) -> Result<ServeConfig> {
    let mut config = match &args.config {
        Some(path) => ServeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ServeConfig::default(),
    };

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if args.no_hidden {
        config.include_hidden = false;
    }

    Ok(config)
}

/// Start the HTTP server.
fn run_serve(args: &ServeArgs) -> Result<()> {
    let mut config = load_config(&args.root)?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if args.allow_writes {
        config.writes_enabled = true;
    }

    let state = AppState::from_config(&config).context("Invalid root directory")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(dirserve_server::serve(state, config.bind))
        .with_context(|| format!("Server on {} failed", config.bind))?;

    Ok(())
}

/// Print a lookup result as JSON.
fn run_ls(path: &str, args: &RootArgs) -> Result<()> {
    let config = load_config(args)?;
    let root = Root::resolve(&config.root).context("Invalid root directory")?;
    let lister =
        DirectoryLister::new(PathGuard::new(root)).with_include_hidden(config.include_hidden);

    let lookup = match lister.lookup(path)? {
        Lookup::Directory(listing) => Lookup::Directory(listing.sorted()),
        file => file,
    };

    println!("{}", serde_json::to_string_pretty(&lookup)?);
    Ok(())
}

/// Print the canonical location of a request path.
fn run_resolve(path: &str, args: &RootArgs) -> Result<()> {
    let config = load_config(args)?;
    let root = Root::resolve(&config.root).context("Invalid root directory")?;
    let guard = PathGuard::new(root);

    let resolved = guard
        .resolve(path)
        .map_err(|e| eyre!("{e} (root: {})", guard.root().as_path().display()))?;

    println!("{}", resolved.as_path().display());
    Ok(())
}
