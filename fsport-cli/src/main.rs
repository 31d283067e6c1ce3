// SPDX-License-Identifier: AGPL-3.0-or-later
//! fsport CLI
//!
//! Inspect and exercise the local filesystem port from a shell.

mod commands;

use clap::{Parser, Subcommand};
use fsport_core::{FileSystemConfig, FsResult};
use fsport_local::LocalFileSystem;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsport")]
#[command(author, version, about = "fsport - portable filesystem diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the per-user config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show file or directory information
    Stat {
        /// Path to inspect
        path: String,
    },

    /// List directory contents
    #[command(alias = "dir")]
    Ls {
        /// Directory to list (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Only files
        #[arg(short, long, conflicts_with = "dirs")]
        files: bool,

        /// Only directories
        #[arg(short, long)]
        dirs: bool,

        /// Extension filter, repeatable (implies --files)
        #[arg(short, long = "ext")]
        extensions: Vec<String>,

        /// Match extensions case-sensitively
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Print the normalized form of a path
    Normalize {
        path: String,
    },

    /// Check whether two paths refer to the same location
    Equal {
        path1: String,
        path2: String,
    },

    /// Check whether a path lies inside a parent path
    Contains {
        parent: String,
        path: String,
    },

    /// Replace characters not allowed in file names
    ValidName {
        name: String,
    },

    /// Exchange the contents of two files
    Swap {
        file1: String,
        file2: String,
    },

    /// Remove files
    Rm {
        /// File(s) to remove
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Change file attributes
    Attrib {
        path: String,

        /// Set or clear the hidden attribute
        #[arg(long)]
        hidden: Option<bool>,

        /// Set or clear the read-only attribute
        #[arg(long)]
        read_only: Option<bool>,

        /// Mark the file executable by its owner
        #[arg(long)]
        executable: bool,
    },

    /// List mounted volumes
    Drives,

    /// Work with shortcut files
    Shortcut {
        #[command(subcommand)]
        action: ShortcutAction,
    },
}

#[derive(Subcommand)]
enum ShortcutAction {
    /// Print the target of a shortcut
    Resolve {
        path: String,
    },
    /// Write a shortcut pointing at a target
    Create {
        path: String,
        target: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> FsResult<FileSystemConfig> {
    match path {
        Some(path) => FileSystemConfig::load(path),
        None => FileSystemConfig::load_default(),
    }
}

fn run(cli: Cli) -> FsResult<()> {
    let config = load_config(cli.config.as_ref())?;
    let fs = LocalFileSystem::new(config);
    let verbose = cli.verbose;

    match cli.command {
        Commands::Stat { path } => commands::stat(&fs, &path, verbose),
        Commands::Ls { path, recursive, files, dirs, extensions, case_sensitive } => {
            let listing = commands::Listing { recursive, files, dirs, extensions, case_sensitive };
            commands::ls(&fs, &path, &listing, verbose)
        }
        Commands::Normalize { path } => commands::normalize(&fs, &path),
        Commands::Equal { path1, path2 } => commands::equal(&fs, &path1, &path2),
        Commands::Contains { parent, path } => commands::contains(&fs, &parent, &path),
        Commands::ValidName { name } => commands::valid_name(&fs, &name),
        Commands::Swap { file1, file2 } => commands::swap(&fs, &file1, &file2, verbose),
        Commands::Rm { paths } => commands::rm(&fs, &paths, verbose),
        Commands::Attrib { path, hidden, read_only, executable } => {
            commands::attrib(&fs, &path, hidden, read_only, executable)
        }
        Commands::Drives => commands::drives(&fs),
        Commands::Shortcut { action } => match action {
            ShortcutAction::Resolve { path } => commands::shortcut_resolve(&fs, &path),
            ShortcutAction::Create { path, target } => commands::shortcut_create(&fs, &path, &target),
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
