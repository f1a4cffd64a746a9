//! CLI frontend for the Encounter Codex catalog engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{AddArgs, FilterArgs};

#[derive(Parser)]
#[command(
    name = "ec",
    about = "Encounter Codex — a local-first adversary & environment catalog",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records with filters and sorting
    List {
        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Sort field: name, tier, category, source, difficulty
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Show one record in detail
    Show {
        /// Record name (case-insensitive)
        name: String,

        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Add a record to a catalog
    Add {
        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        #[command(flatten)]
        record: AddArgs,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Remove a record, optionally cascading to the remote store
    Remove {
        /// Record name (case-insensitive)
        name: String,

        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        /// Also delete the remote copy (requires --user and ownership)
        #[arg(long)]
        cascade: bool,

        /// Active identity for the remote cascade
        #[arg(long)]
        user: Option<String>,

        /// Shared remote file (default: <data-dir>/shared_codex.json)
        #[arg(long)]
        remote: Option<PathBuf>,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Import a JSON array of records into a catalog
    Import {
        /// File containing a JSON array of records
        file: PathBuf,

        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Export a catalog (or its filtered view) as pretty JSON
    Export {
        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Fetch the remote snapshot and merge it into a catalog
    Pull {
        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        /// Shared remote file (default: <data-dir>/shared_codex.json)
        #[arg(long)]
        remote: Option<PathBuf>,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Upload locally owned records to the remote store
    Push {
        /// Catalog kind: adversary or environment
        #[arg(short, long, default_value = "adversary")]
        kind: String,

        /// Active identity to publish as
        #[arg(long)]
        user: String,

        /// Shared remote file (default: <data-dir>/shared_codex.json)
        #[arg(long)]
        remote: Option<PathBuf>,

        /// Directory holding the catalog files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::List {
            kind,
            filters,
            sort,
            desc,
            data_dir,
        } => commands::list::run(data_dir, kind, filters, sort.as_deref(), *desc),
        Commands::Show {
            name,
            kind,
            data_dir,
        } => commands::show::run(data_dir, kind, name),
        Commands::Add {
            kind,
            record,
            data_dir,
        } => commands::add::run(data_dir, kind, record),
        Commands::Remove {
            name,
            kind,
            cascade,
            user,
            remote,
            data_dir,
        } => commands::remove::run(
            data_dir,
            kind,
            name,
            *cascade,
            user.as_deref(),
            remote.as_deref(),
        ),
        Commands::Import {
            file,
            kind,
            data_dir,
        } => commands::import::run(data_dir, kind, file),
        Commands::Export {
            kind,
            filters,
            output,
            data_dir,
        } => commands::export::run(data_dir, kind, filters, output.as_deref()),
        Commands::Pull {
            kind,
            remote,
            data_dir,
        } => commands::pull::run(data_dir, kind, remote.as_deref()),
        Commands::Push {
            kind,
            user,
            remote,
            data_dir,
        } => commands::push::run(data_dir, kind, user, remote.as_deref()),
    };

    if let Err(message) = result {
        eprintln!("{} {message}", "error:".red().bold());
        process::exit(1);
    }
}
