// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use chrono::{DateTime, Utc};
use console::style;
use fsport_core::{EntryKind, FileSystem, FileSystemMetadata, FsError, FsResult};
use tabled::{Table, Tabled};

/// `ls` selection flags
pub struct Listing {
    pub recursive: bool,
    pub files: bool,
    pub dirs: bool,
    pub extensions: Vec<String>,
    pub case_sensitive: bool,
}

impl Listing {
    fn kind(&self) -> EntryKind {
        if self.files || !self.extensions.is_empty() {
            EntryKind::File
        } else if self.dirs {
            EntryKind::Directory
        } else {
            EntryKind::Any
        }
    }
}

/// Format a timestamp for display
fn format_time(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_size(info: &FileSystemMetadata) -> String {
    if info.is_directory {
        "-".to_string()
    } else {
        bytesize::ByteSize(info.length).to_string()
    }
}

fn format_kind(info: &FileSystemMetadata) -> String {
    if info.is_directory {
        style("d").cyan().to_string()
    } else {
        "-".to_string()
    }
}

fn format_flags(info: &FileSystemMetadata) -> String {
    let h = if info.is_hidden { 'h' } else { '-' };
    let r = if info.is_read_only { 'r' } else { '-' };
    format!("{h}{r}")
}

fn format_bool(value: bool) -> String {
    if value {
        style("true").green().to_string()
    } else {
        style("false").red().to_string()
    }
}

#[derive(Tabled)]
struct LsEntry {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl LsEntry {
    fn new(info: &FileSystemMetadata, name: String) -> Self {
        Self {
            kind: format_kind(info),
            flags: format_flags(info),
            size: format_size(info),
            modified: format_time(info.last_write_time_utc),
            name,
        }
    }
}

/// Show file/directory information
pub fn stat(fs: &dyn FileSystem, path: &str, verbose: bool) -> FsResult<()> {
    if verbose {
        eprintln!("Getting info: {path}");
    }

    let info = fs.get_file_system_info(path);
    if !info.exists {
        return Err(FsError::NotFound(path.to_string()));
    }

    println!("  Path: {}", info.full_name);
    println!("  Name: {}", info.name);
    println!("  Type: {}", if info.is_file() { "file" } else { "directory" });
    if info.is_file() {
        println!("  Extension: {}", info.extension);
        println!("  Size: {} ({})", info.length, bytesize::ByteSize(info.length));
    }
    println!("  Hidden: {}", info.is_hidden);
    println!("  Read-only: {}", info.is_read_only);
    println!("  Modified: {}", format_time(fs.get_last_write_time_utc(&info)));
    println!("  Created: {}", format_time(fs.get_creation_time_utc(&info)));
    if fs.is_shortcut(path) {
        println!("  Shortcut: {}", fs.resolve_shortcut(path)?.unwrap_or_else(|| "-".into()));
    }

    Ok(())
}

/// List directory contents
pub fn ls(fs: &dyn FileSystem, path: &str, listing: &Listing, verbose: bool) -> FsResult<()> {
    let root = fs.normalize_path(path);
    if verbose {
        eprintln!("Listing: {root}");
    }

    let entries = match listing.kind() {
        EntryKind::File => {
            let extensions: Vec<&str> = listing.extensions.iter().map(String::as_str).collect();
            fs.get_files_with_extensions(&root, &extensions, listing.case_sensitive, listing.recursive)?
        }
        EntryKind::Directory => fs.get_directories(&root, listing.recursive)?,
        EntryKind::Any => fs.get_file_system_entries(&root, listing.recursive)?,
    };

    let rows: Vec<LsEntry> = entries
        .map(|info| {
            let name = if listing.recursive {
                info.full_name.clone()
            } else {
                info.name.clone()
            };
            LsEntry::new(&info, name)
        })
        .collect();

    if rows.is_empty() {
        println!("(empty directory)");
    } else {
        println!("{}", Table::new(rows));
    }

    Ok(())
}

pub fn normalize(fs: &dyn FileSystem, path: &str) -> FsResult<()> {
    println!("{}", fs.normalize_path(path));
    Ok(())
}

pub fn equal(fs: &dyn FileSystem, path1: &str, path2: &str) -> FsResult<()> {
    println!("{}", format_bool(fs.are_equal(path1, path2)));
    Ok(())
}

pub fn contains(fs: &dyn FileSystem, parent: &str, path: &str) -> FsResult<()> {
    println!("{}", format_bool(fs.contains_sub_path(parent, path)));
    Ok(())
}

pub fn valid_name(fs: &dyn FileSystem, name: &str) -> FsResult<()> {
    println!("{}", fs.get_valid_filename(name));
    Ok(())
}

/// Exchange two files
pub fn swap(fs: &dyn FileSystem, file1: &str, file2: &str, verbose: bool) -> FsResult<()> {
    if verbose {
        eprintln!("Swapping: {file1} <-> {file2}");
    }
    fs.swap_files(file1, file2)?;
    println!("Swapped {file1} <-> {file2}");
    Ok(())
}

/// Remove files
pub fn rm(fs: &dyn FileSystem, paths: &[String], verbose: bool) -> FsResult<()> {
    for path in paths {
        if verbose {
            eprintln!("Removing: {path}");
        }
        fs.delete_file(path)?;
        println!("Removed {path}");
    }
    Ok(())
}

/// Change attributes; unspecified ones are left alone
pub fn attrib(
    fs: &dyn FileSystem,
    path: &str,
    hidden: Option<bool>,
    read_only: Option<bool>,
    executable: bool,
) -> FsResult<()> {
    if hidden.is_none() && read_only.is_none() && !executable {
        return Err(FsError::InvalidArgument(
            "nothing to change: pass --hidden, --read-only or --executable".into(),
        ));
    }
    if let Some(hidden) = hidden {
        fs.set_hidden(path, hidden)?;
    }
    if let Some(read_only) = read_only {
        fs.set_read_only(path, read_only)?;
    }
    if executable {
        fs.set_executable(path)?;
    }

    let info = fs.get_file_system_info(path);
    println!("{} {}", format_flags(&info), info.full_name);
    Ok(())
}

/// List mounted volumes
pub fn drives(fs: &dyn FileSystem) -> FsResult<()> {
    let rows: Vec<LsEntry> = fs
        .get_drives()?
        .iter()
        .map(|info| LsEntry::new(info, info.name.clone()))
        .collect();

    if rows.is_empty() {
        println!("(no drives)");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

pub fn shortcut_resolve(fs: &dyn FileSystem, path: &str) -> FsResult<()> {
    match fs.resolve_shortcut(path)? {
        Some(target) => println!("{target}"),
        None => {
            return Err(FsError::InvalidArgument(format!("not a resolvable shortcut: {path}")));
        }
    }
    Ok(())
}

pub fn shortcut_create(fs: &dyn FileSystem, path: &str, target: &str) -> FsResult<()> {
    fs.create_shortcut(path, target)?;
    println!("Created {path} -> {target}");
    Ok(())
}
