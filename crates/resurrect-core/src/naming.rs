//! Artifact filenames.
//!
//! Every saved artifact is addressed by a (scope, identifier, file kind)
//! triple flattened into a single filename:
//!
//! | Scope | Layout | Programs |
//! |-------|--------|----------|
//! | Workspace | `workspace_<id>_layout.json` | `workspace_<id>_programs.json` |
//! | Profile | `<id>_layout.json` | `<id>_programs.json` |
//!
//! Identifiers are stripped of characters that are unsafe in filenames before
//! encoding. Underscores inside an identifier are preserved: decoding splits
//! on the *first* underscore (workspace prefix) and the *last* one (file kind).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Characters removed from identifiers before they become part of a filename.
pub const FILENAME_BLACKLIST: &[char] = &['/', '\\', ':', '*', '"', '<', '>', '|'];

const WORKSPACE_PREFIX: &str = "workspace_";
const JSON_SUFFIX: &str = ".json";

/// Remove every blacklisted character from `name`.
pub fn filename_filter(name: &str) -> String {
    name.chars()
        .filter(|c| !FILENAME_BLACKLIST.contains(c))
        .collect()
}

/// Whether an artifact belongs to a live workspace or a user-chosen profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Workspace,
    Profile,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Workspace => write!(f, "Workspace"),
            ScopeKind::Profile => write!(f, "Profile"),
        }
    }
}

/// What an artifact file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Layout,
    Programs,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Layout => "layout",
            FileKind::Programs => "programs",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layout" => Ok(FileKind::Layout),
            "programs" => Ok(FileKind::Programs),
            other => Err(other.to_string()),
        }
    }
}

/// A decoded artifact filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactName {
    pub scope: ScopeKind,
    pub id: String,
    pub kind: FileKind,
}

impl ArtifactName {
    /// Build a name, filtering `id` the same way [`encode`] does.
    pub fn new(scope: ScopeKind, id: &str, kind: FileKind) -> Self {
        Self {
            scope,
            id: filename_filter(id),
            kind,
        }
    }

    pub fn filename(&self) -> String {
        encode(self.scope, &self.id, self.kind)
    }
}

impl fmt::Display for ArtifactName {
    /// Listing form: `Workspace 1 layout`, `Profile work programs`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.scope, self.id, self.kind)
    }
}

/// Encode a triple as a filename.
pub fn encode(scope: ScopeKind, id: &str, kind: FileKind) -> String {
    let id = filename_filter(id);
    match scope {
        ScopeKind::Workspace => format!("{}{}_{}{}", WORKSPACE_PREFIX, id, kind, JSON_SUFFIX),
        ScopeKind::Profile => format!("{}_{}{}", id, kind, JSON_SUFFIX),
    }
}

/// Decode a filename, inferring the scope from the `workspace_` prefix.
///
/// A prefixed name with no separator left after the prefix can only be a
/// profile (`workspace_layout.json` is the profile `workspace`). A profile
/// whose own identifier begins with `workspace_` is still indistinguishable
/// from a workspace here; use [`decode_in`] when the scope is known from the
/// directory being read.
pub fn decode(filename: &str) -> Result<ArtifactName, DecodeError> {
    if !filename.starts_with(WORKSPACE_PREFIX) {
        return decode_in(ScopeKind::Profile, filename);
    }
    match decode_in(ScopeKind::Workspace, filename) {
        Err(DecodeError::MissingSeparator { .. }) => decode_in(ScopeKind::Profile, filename),
        result => result,
    }
}

/// Decode a filename whose scope is already known.
pub fn decode_in(scope: ScopeKind, filename: &str) -> Result<ArtifactName, DecodeError> {
    let stem = filename
        .strip_suffix(JSON_SUFFIX)
        .ok_or_else(|| DecodeError::MissingJsonSuffix {
            filename: filename.to_string(),
        })?;

    let missing_separator = || DecodeError::MissingSeparator {
        filename: filename.to_string(),
    };

    let rest = match scope {
        ScopeKind::Workspace => stem.split_once('_').ok_or_else(missing_separator)?.1,
        ScopeKind::Profile => stem,
    };
    let (id, kind) = rest.rsplit_once('_').ok_or_else(missing_separator)?;

    let kind = kind
        .parse::<FileKind>()
        .map_err(|kind| DecodeError::UnknownFileKind {
            filename: filename.to_string(),
            kind,
        })?;

    Ok(ArtifactName {
        scope,
        id: id.to_string(),
        kind,
    })
}
