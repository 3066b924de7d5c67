//! Artifact directory management.
//!
//! Layout on disk:
//!
//! ```text
//! <directory>/
//!   workspace_<id>_layout.json
//!   workspace_<id>_programs.json
//!   kitty-session-<pid>
//!   profiles/
//!     <id>_layout.json
//!     <id>_programs.json
//! ```

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use resurrect_core::error::FilesystemError;
use resurrect_core::naming::{self, ArtifactName, FileKind, ScopeKind};
use tracing::{info, warn};

const PROFILES_DIR: &str = "profiles";
const SESSION_FILE_PREFIX: &str = "kitty-session-";

/// Which artifacts of a workspace or profile an operation touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    Both,
    LayoutOnly,
    ProgramsOnly,
}

impl Target {
    pub fn kinds(self) -> &'static [FileKind] {
        match self {
            Target::Both => &[FileKind::Layout, FileKind::Programs],
            Target::LayoutOnly => &[FileKind::Layout],
            Target::ProgramsOnly => &[FileKind::Programs],
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("valid env var pattern")
    })
}

/// Expand `$VAR` and `${VAR}`. Unset variables are left as written.
pub fn expand_vars(input: &str) -> String {
    env_var_pattern()
        .replace_all(input, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Expand a leading `~` or `~/` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

/// Resolve the configured directory, descending into `profiles/` for profiles.
pub fn resolve_directory(directory: &str, scope: ScopeKind) -> PathBuf {
    let directory = expand_home(&expand_vars(directory));
    match scope {
        ScopeKind::Workspace => directory,
        ScopeKind::Profile => directory.join(PROFILES_DIR),
    }
}

pub fn session_file_name(pid: u32) -> String {
    format!("{}{}", SESSION_FILE_PREFIX, pid)
}

/// Write a compiled session script, creating the directory if needed.
///
/// Concurrent saves for the same pid race; the last writer wins.
pub fn write_session_file(
    directory: &Path,
    pid: u32,
    script: &str,
) -> Result<PathBuf, FilesystemError> {
    std::fs::create_dir_all(directory)
        .map_err(|e| FilesystemError::new("failed to create directory", directory, e))?;

    let path = directory.join(session_file_name(pid));
    std::fs::write(&path, script)
        .map_err(|e| FilesystemError::new("failed to write session file", &path, e))?;

    info!("Wrote {} bytes to {:?}", script.len(), path);
    Ok(path)
}

/// List the artifacts of one scope stored in `directory`, naturally sorted.
///
/// Files that do not decode as artifacts are skipped. A missing profiles
/// directory simply means there are no profiles.
pub fn list_artifacts(
    directory: &Path,
    scope: ScopeKind,
) -> Result<Vec<ArtifactName>, FilesystemError> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && scope == ScopeKind::Profile => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(FilesystemError::new("failed to read directory", directory, e)),
    };

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| FilesystemError::new("failed to read directory", directory, e))?;
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if filename.starts_with(SESSION_FILE_PREFIX) {
            continue;
        }

        let decoded = match scope {
            ScopeKind::Workspace => naming::decode(&filename),
            ScopeKind::Profile => naming::decode_in(ScopeKind::Profile, &filename),
        };
        match decoded {
            Ok(name) if name.scope == scope => artifacts.push(name),
            Ok(_) => {}
            Err(e) => warn!("Skipping {:?}: {}", entry.path(), e),
        }
    }

    artifacts.sort_by(|a, b| natural_cmp(&a.id, &b.id).then(a.kind.as_str().cmp(b.kind.as_str())));
    Ok(artifacts)
}

/// Delete the selected artifacts of a workspace or profile.
///
/// Stops at the first file that cannot be removed.
pub fn remove_artifacts(
    directory: &Path,
    scope: ScopeKind,
    id: &str,
    target: Target,
) -> Result<Vec<PathBuf>, FilesystemError> {
    let mut removed = Vec::new();
    for &kind in target.kinds() {
        let path = directory.join(naming::encode(scope, id, kind));
        std::fs::remove_file(&path)
            .map_err(|e| FilesystemError::new("failed to remove", &path, e))?;
        info!("Removed {:?}", path);
        removed.push(path);
    }
    Ok(removed)
}

/// Compare strings so that embedded numbers sort by value (`2` < `10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_number(&mut a);
                let y = take_number(&mut b);
                let ord = x
                    .trim_start_matches('0')
                    .len()
                    .cmp(&y.trim_start_matches('0').len())
                    .then_with(|| x.trim_start_matches('0').cmp(y.trim_start_matches('0')))
                    .then_with(|| x.len().cmp(&y.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}
