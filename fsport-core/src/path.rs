//! Pure path utilities
//!
//! Everything here is a string transform: no filesystem access, no
//! environment lookups. Windows and Unix path grammars are both available
//! regardless of the host so adapters and tests can pick either.

use std::fmt;

/// Characters that are invalid in a filename on at least one supported OS.
const INVALID_FILENAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Path grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    Unix,
    Windows,
}

/// Anchor of a parsed path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Root {
    /// `/` on Unix, `\` on Windows
    Separator,
    /// `C:\` when anchored, `C:` when drive-relative
    Drive { letter: char, anchored: bool },
    /// `\\server\share`
    Unc(String),
}

/// A lexically normalized path: optional root plus segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    style: PathStyle,
    root: Option<Root>,
    segments: Vec<String>,
}

impl NormalizedPath {
    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    fn root_string(&self) -> String {
        let sep = self.style.separator();
        match &self.root {
            None => String::new(),
            Some(Root::Separator) => sep.to_string(),
            Some(Root::Drive { letter, anchored: true }) => format!("{letter}:{sep}"),
            Some(Root::Drive { letter, anchored: false }) => format!("{letter}:"),
            Some(Root::Unc(unc)) => unc.clone(),
        }
    }

    fn same_root(&self, other: &Self, case_sensitive: bool) -> bool {
        segment_eq(&self.root_string(), &other.root_string(), case_sensitive)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = self.style.separator().to_string();
        let root = self.root_string();
        let body = self.segments.join(&sep);
        match &self.root {
            None if body.is_empty() => write!(f, "."),
            None => write!(f, "{body}"),
            Some(Root::Unc(_)) if !body.is_empty() => write!(f, "{root}{sep}{body}"),
            Some(_) => write!(f, "{root}{body}"),
        }
    }
}

fn segment_eq(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a == b || a.to_lowercase() == b.to_lowercase()
    }
}

impl PathStyle {
    /// Grammar of the host operating system.
    pub const fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Unix
        }
    }

    pub fn separator(self) -> char {
        match self {
            PathStyle::Unix => '/',
            PathStyle::Windows => '\\',
        }
    }

    pub fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Unix => c == '/',
            PathStyle::Windows => c == '/' || c == '\\',
        }
    }

    /// Split `path` into root and resolved segments.
    pub fn parse(self, path: &str) -> NormalizedPath {
        let (root, rest) = self.split_root(path);
        let anchored = match &root {
            Some(Root::Drive { anchored, .. }) => *anchored,
            Some(_) => true,
            None => false,
        };

        let mut segments: Vec<String> = Vec::new();
        for seg in rest.split(|c| self.is_separator(c)) {
            match seg {
                "" | "." => {}
                ".." => match segments.last() {
                    Some(last) if last != ".." => {
                        segments.pop();
                    }
                    _ if anchored => {}
                    _ => segments.push("..".to_string()),
                },
                other => segments.push(other.to_string()),
            }
        }

        NormalizedPath { style: self, root, segments }
    }

    fn split_root(self, path: &str) -> (Option<Root>, &str) {
        let bytes = path.as_bytes();
        let is_sep = |b: u8| self.is_separator(b as char);

        match self {
            PathStyle::Unix => {
                if bytes.first() == Some(&b'/') {
                    (Some(Root::Separator), &path[1..])
                } else {
                    (None, path)
                }
            }
            PathStyle::Windows => {
                if bytes.len() >= 2 && is_sep(bytes[0]) && is_sep(bytes[1]) {
                    let tail = &path[2..];
                    let mut parts = tail.splitn(3, |c| self.is_separator(c));
                    let server = parts.next().unwrap_or("");
                    let share = parts.next().unwrap_or("");
                    let rest = parts.next().unwrap_or("");
                    let mut unc = String::from("\\\\");
                    unc.push_str(server);
                    if !share.is_empty() {
                        unc.push('\\');
                        unc.push_str(share);
                    }
                    (Some(Root::Unc(unc)), rest)
                } else if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
                    let letter = bytes[0] as char;
                    if bytes.len() >= 3 && is_sep(bytes[2]) {
                        (Some(Root::Drive { letter, anchored: true }), &path[3..])
                    } else {
                        (Some(Root::Drive { letter, anchored: false }), &path[2..])
                    }
                } else if bytes.first().map(|b| is_sep(*b)).unwrap_or(false) {
                    (Some(Root::Separator), &path[1..])
                } else {
                    (None, path)
                }
            }
        }
    }

    /// Collapse separators, drop `.`, resolve `..` and trim trailing
    /// separators. Idempotent.
    pub fn normalize(self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        self.parse(path).to_string()
    }

    /// Whether `path` carries a root (`/`, `C:\`, `C:`, `\\server\share`).
    pub fn has_root(self, path: &str) -> bool {
        self.split_root(path).0.is_some()
    }

    /// Resolve `file` against `folder` unless it is already rooted or a URL.
    pub fn make_absolute(self, folder: &str, file: &str) -> String {
        if file.is_empty() || file.contains("://") || self.has_root(file) {
            return file.to_string();
        }
        let mut joined = String::with_capacity(folder.len() + file.len() + 1);
        joined.push_str(folder);
        joined.push(self.separator());
        joined.push_str(file);
        self.normalize(&joined)
    }

    /// True when the normalized path has a root and nothing below it.
    pub fn is_root(self, path: &str) -> bool {
        let parsed = self.parse(path);
        parsed.has_root() && parsed.segments.is_empty()
    }

    /// True when `path` lies strictly below `parent`, segment-wise.
    pub fn contains_sub_path(self, parent: &str, path: &str, case_sensitive: bool) -> bool {
        if parent.is_empty() || path.is_empty() {
            return false;
        }
        let parent = self.parse(parent);
        let child = self.parse(path);

        if !parent.same_root(&child, case_sensitive) {
            return false;
        }
        if child.segments.len() <= parent.segments.len() {
            return false;
        }
        parent
            .segments
            .iter()
            .zip(&child.segments)
            .all(|(a, b)| segment_eq(a, b, case_sensitive))
    }

    pub fn are_equal(self, a: &str, b: &str, case_sensitive: bool) -> bool {
        segment_eq(&self.normalize(a), &self.normalize(b), case_sensitive)
    }

    /// Final component, ignoring trailing separators.
    pub fn file_name(self, path: &str) -> &str {
        path.trim_end_matches(|c| self.is_separator(c))
            .rsplit(|c| self.is_separator(c))
            .next()
            .unwrap_or("")
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle::native()
    }
}

/// Case sensitivity of the host's usual filesystems.
pub const fn native_case_sensitive() -> bool {
    !cfg!(any(windows, target_os = "macos", target_os = "ios"))
}

/// Final component of `path` in the host grammar.
pub fn file_name(path: &str) -> &str {
    PathStyle::native().file_name(path)
}

/// Extension of a filename including the leading dot, or empty.
pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[idx..],
        _ => "",
    }
}

/// Filename without its last extension.
pub fn file_stem(name: &str) -> &str {
    let ext = extension(name);
    if ext.is_empty() {
        name.strip_suffix('.').unwrap_or(name)
    } else {
        &name[..name.len() - ext.len()]
    }
}

/// Replace every character that is invalid in a filename with a space.
pub fn valid_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if (c as u32) < 0x20 || INVALID_FILENAME_CHARS.contains(&c) {
                ' '
            } else {
                c
            }
        })
        .collect();
    replaced.trim().to_string()
}

/// False for URLs other than `file://` ones.
pub fn is_path_file(path: &str) -> bool {
    if path.contains("://") {
        return path
            .get(..7)
            .map(|scheme| scheme.eq_ignore_ascii_case("file://"))
            .unwrap_or(false);
    }
    true
}

/// Compare two extensions, tolerating a missing leading dot on either side.
pub fn extension_matches(ext: &str, wanted: &str, case_sensitive: bool) -> bool {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    let wanted = wanted.strip_prefix('.').unwrap_or(wanted);
    !wanted.is_empty() && segment_eq(ext, wanted, case_sensitive)
}
