//! Mounted volume discovery

use fsport_core::{FileSystemMetadata, FsResult};
use std::fs;

use crate::local::snapshot;

/// Filesystem types that never hold user media.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "autofs", "binfmt_misc", "bpf", "cgroup", "cgroup2", "configfs", "debugfs", "devpts",
    "devtmpfs", "efivarfs", "fusectl", "hugetlbfs", "mqueue", "nsfs", "proc",
    "pstore", "ramfs", "rpc_pipefs", "securityfs", "selinuxfs", "squashfs", "sysfs",
    "tmpfs", "tracefs",
];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) struct MountEntry {
    pub source: String,
    pub target: String,
    pub fs_type: String,
}

/// Parse `/proc/self/mounts` content; octal escapes in paths are decoded.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn parse_mounts(text: &str) -> Vec<MountEntry> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let source = fields.next()?;
            let target = fields.next()?;
            let fs_type = fields.next()?;
            Some(MountEntry {
                source: unescape(source),
                target: unescape(target),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let octal = bytes.get(i + 1..i + 4);
        if bytes[i] == b'\\' && octal.map_or(false, |o| o.iter().all(|b| (b'0'..=b'7').contains(b))) {
            let value = bytes[i + 1..i + 4]
                .iter()
                .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
            if let Ok(byte) = u8::try_from(value) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn is_media_mount(entry: &MountEntry) -> bool {
    !PSEUDO_FILESYSTEMS.contains(&entry.fs_type.as_str()) && entry.target.starts_with('/')
}

fn volume(root: &str) -> Option<FileSystemMetadata> {
    let meta = fs::metadata(root).ok()?;
    if !meta.is_dir() {
        return None;
    }
    let mut info = snapshot(root, &meta);
    info.name = root.to_string();
    Some(info)
}

#[cfg(target_os = "linux")]
fn has_capacity(root: &str) -> bool {
    let Ok(c_path) = std::ffi::CString::new(root) else {
        return false;
    };
    // SAFETY: statvfs is plain data; zeroed is a valid initial value.
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: `c_path` is NUL-terminated and `stat` is a valid out pointer.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    rc == 0 && stat.f_blocks > 0
}

#[cfg(target_os = "linux")]
pub(crate) fn list() -> FsResult<Vec<FileSystemMetadata>> {
    let text = fs::read_to_string("/proc/self/mounts")?;
    let mut seen = std::collections::HashSet::new();
    let drives = parse_mounts(&text)
        .into_iter()
        .filter(is_media_mount)
        .filter(|m| seen.insert(m.target.clone()))
        .filter(|m| has_capacity(&m.target))
        .filter_map(|m| volume(&m.target))
        .collect();
    Ok(drives)
}

#[cfg(target_os = "macos")]
pub(crate) fn list() -> FsResult<Vec<FileSystemMetadata>> {
    let mut drives: Vec<FileSystemMetadata> = volume("/").into_iter().collect();
    if let Ok(read_dir) = fs::read_dir("/Volumes") {
        for entry in read_dir.flatten() {
            let path = entry.path().to_string_lossy().into_owned();
            if let Some(info) = volume(&path) {
                drives.push(info);
            }
        }
    }
    Ok(drives)
}

#[cfg(windows)]
pub(crate) fn list() -> FsResult<Vec<FileSystemMetadata>> {
    Ok((b'A'..=b'Z')
        .filter_map(|letter| volume(&format!("{}:\\", letter as char)))
        .collect())
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub(crate) fn list() -> FsResult<Vec<FileSystemMetadata>> {
    Ok(volume("/").into_iter().collect())
}
