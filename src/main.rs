//! Backup Wizard - Main entry point
//!
//! Thin CLI over the snapshot/archive/restore engine. The CLI stages the
//! inputs the engine expects (archive path, confirmation flag, delete
//! target) and renders outcomes; all real work happens in the library.

use anyhow::{bail, Result};
use backup_wizard::{utils, BackupEngine, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Snapshot the live state into a new archive
    Backup,

    /// Restore an archive over the live state (takes a safety snapshot first)
    Restore {
        /// Archive to restore
        archive: PathBuf,

        /// Confirm the restore; without this flag nothing is touched
        #[arg(long)]
        yes: bool,
    },

    /// List archives in the backup directory, newest first
    List,

    /// Delete one archive from the backup directory by filename
    Delete {
        /// Bare archive filename, e.g. backup-2024-01-01T00-00-00-000Z.zip
        filename: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => Config::from_file(&path)?,
        None => {
            let home = std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/root"));
            Config::for_home(&home)
        }
    };

    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    tracing::info!(
        "Starting backup-wizard v{} (state: {})",
        env!("CARGO_PKG_VERSION"),
        config.paths.state_dir.display()
    );

    config.ensure_dirs()?;
    let engine = BackupEngine::new(config);

    match args.command {
        Command::Backup => {
            let path = engine.backup()?;
            println!("Backup created: {}", path.display());
        }
        Command::Restore { archive, yes } => {
            if !yes {
                bail!("Refusing to restore without explicit confirmation (pass --yes)");
            }
            let safety = engine.restore(&archive)?;
            println!("Restore complete. Pre-restore snapshot: {}", safety.display());
        }
        Command::List => {
            let records = engine.catalog().list()?;
            if records.is_empty() {
                println!("No backups found");
            }
            for record in records {
                println!(
                    "{:>12}  {}  {}",
                    record.size,
                    record.modified.to_rfc3339(),
                    record.file_name
                );
            }
        }
        Command::Delete { filename } => {
            if engine.catalog().delete(&filename)? {
                println!("Deleted {}", filename);
            } else {
                println!("No such backup: {}", filename);
            }
        }
    }

    Ok(())
}
