use clap::{Parser, Subcommand};
use debpool::format_error_with_help;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "debpool")]
#[command(about = "Maintain a signed Debian-style package repository")]
#[command(version)]
struct Cli {
    /// Repository root
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/debpool.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the pool and dists skeleton and export the public key
    Init,
    /// Add a package to the pool and republish its distribution
    AddPackage {
        /// Path to the package file
        package_path: PathBuf,
        /// Target distribution (e.g. stable)
        distribution: String,
        /// Target component (e.g. main)
        component: String,
    },
    /// Regenerate indices and re-sign Release
    Update {
        /// Only update this distribution (default: all)
        #[arg(short, long)]
        distribution: Option<String>,
    },
    /// List packages in the pool
    List {
        /// Only list this component
        #[arg(short = 'C', long)]
        component: Option<String>,
    },
    /// Re-export the public signing key
    ExportKey,
    /// Check a distribution's Release against the files on disk
    Verify {
        /// Distribution to verify
        #[arg(short, long)]
        distribution: String,
    },
    /// Check that the signing key is available
    CheckKey,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::RepoArgs {
        root: cli.root,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Init => cli::init::run(&args),
        Commands::AddPackage {
            package_path,
            distribution,
            component,
        } => cli::add_package::run(&args, &package_path, &distribution, &component),
        Commands::Update { distribution } => cli::update::run(&args, distribution).await,
        Commands::List { component } => cli::list::run(&args, component),
        Commands::ExportKey => cli::export_key::run(&args),
        Commands::Verify { distribution } => cli::verify::run(&args, &distribution),
        Commands::CheckKey => cli::check_key::run(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
