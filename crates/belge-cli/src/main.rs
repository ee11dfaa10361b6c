mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "belge",
    version,
    about = "Extract document metadata from filenames and content, and reconcile it with the master document list"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MissingStoreArg {
    Fresh,
    Fail,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DuplicatesArg {
    First,
    HighestRevision,
}

/// Options shared by every command that touches the master list.
#[derive(clap::Args)]
pub struct StoreArgs {
    /// JSON config file
    #[arg(short, long, value_name = "FILE", env = "BELGE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the master list (overrides config)
    #[arg(short, long, value_name = "DIR", env = "BELGE_STORE_DIR")]
    store_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process uploaded files or folders and update the master list
    Process {
        /// Files or folders. Folder contents keep their folder name as the
        /// responsible unit.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        store: StoreArgs,

        /// Where to write the report workbook
        #[arg(short = 'O', long = "out", value_name = "FILE", default_value = belge_core::render::REPORT_FILE_NAME)]
        out: PathBuf,

        /// What to do when no master list exists
        #[arg(long, value_enum)]
        on_missing_store: Option<MissingStoreArg>,

        /// Which upload wins when several share a document code
        #[arg(long, value_enum)]
        duplicates: Option<DuplicatesArg>,

        /// Summary format printed to stdout
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Show the record extracted from a single file, without touching the master list
    Extract {
        /// Path to the document
        input_file: PathBuf,

        /// Path the file is treated as uploaded under (default: file name only)
        #[arg(long, value_name = "PATH")]
        as_path: Option<String>,

        #[command(flatten)]
        store: StoreArgs,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Print the current master list
    Master {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Process {
            inputs,
            store,
            out,
            on_missing_store,
            duplicates,
            output,
        } => commands::process::run(
            inputs,
            &store,
            out,
            on_missing_store,
            duplicates,
            output,
        ),
        Commands::Extract {
            input_file,
            as_path,
            store,
            output,
        } => commands::extract::run(input_file, as_path, &store, output),
        Commands::Master { store, output } => commands::master::run(&store, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
