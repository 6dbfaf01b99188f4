// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::{IdError, Note, NoteId, UserId};

const NOTES_DIR: &str = "notes";
const NOTES_FILE_SUFFIX: &str = ".notes.json";

/// File-backed notes store.
///
/// Each user's rows live in one JSON file under `<root>/notes/`. Writes go
/// through a temp file and an atomic rename; durability (fsync of file and
/// directory) is opt-in. A missing rows file is the defined first-run state
/// and reads as an empty row set; the folder is provisioned on first
/// write. Every other failure surfaces as a [`StoreError`].
#[derive(Debug, Clone)]
pub struct NoteFolder {
    root: PathBuf,
    durability: WriteDurability,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to
    /// stable storage where possible. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    NoteExists {
        note_id: NoteId,
    },
    NoteNotFound {
        note_id: NoteId,
    },
    InvalidRelativePath {
        field: &'static str,
        value: PathBuf,
    },
    PathOutsideStore {
        store_dir: PathBuf,
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl StoreError {
    /// Stable machine-readable code, kept in sync with the web surface's
    /// error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Json { .. } => "malformed_row",
            Self::InvalidId { .. } => "invalid_id",
            Self::NoteExists { .. } => "row_exists",
            Self::NoteNotFound { .. } => "row_not_found",
            Self::InvalidRelativePath { .. } => "invalid_relative_path",
            Self::PathOutsideStore { .. } => "path_outside_store",
            Self::SymlinkRefused { .. } => "symlink_refused",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::NoteExists { note_id } => write!(f, "note already exists (id={note_id})"),
            Self::NoteNotFound { note_id } => write!(f, "note not found (id={note_id})"),
            Self::InvalidRelativePath { field, value } => {
                write!(f, "invalid relative path for {field}: {value:?}")
            }
            Self::PathOutsideStore { store_dir, path } => write!(
                f,
                "path is outside store dir: store_dir={store_dir:?} path={path:?}"
            ),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// On-disk row shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoteRecord {
    note_id: String,
    user_id: String,
    title: String,
    body: String,
    created_at_millis: u64,
}

impl NoteRecord {
    fn from_note(note: &Note) -> Self {
        Self {
            note_id: note.note_id().to_string(),
            user_id: note.user_id().to_string(),
            title: note.title().to_owned(),
            body: note.body().to_owned(),
            created_at_millis: note.created_at_millis(),
        }
    }

    fn into_note(self) -> Result<Note, StoreError> {
        let note_id = NoteId::new(self.note_id.clone()).map_err(|source| StoreError::InvalidId {
            field: "note_id",
            value: self.note_id.clone(),
            source: Box::new(source),
        })?;
        let user_id = UserId::new(self.user_id.clone()).map_err(|source| StoreError::InvalidId {
            field: "user_id",
            value: self.user_id.clone(),
            source: Box::new(source),
        })?;
        Ok(Note::new(
            note_id,
            user_id,
            self.title,
            self.body,
            self.created_at_millis,
        ))
    }
}

fn encode_persisted_id_segment(segment: &str) -> String {
    if !needs_windows_safe_filename_segment_encoding(segment) {
        return segment.to_owned();
    }

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + segment.len().saturating_mul(2));
    out.push('~');
    for &b in segment.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn needs_windows_safe_filename_segment_encoding(segment: &str) -> bool {
    if segment.starts_with('~') {
        return true;
    }
    if segment == "." || segment == ".." {
        return true;
    }
    if segment.ends_with(' ') || segment.ends_with('.') {
        return true;
    }

    let trimmed = segment.trim_end_matches([' ', '.']);
    let base = trimmed.split('.').next().unwrap_or(trimmed);
    if is_windows_device_name(base) {
        return true;
    }

    for ch in segment.chars() {
        if matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            return true;
        }
        if ch <= '\u{1f}' || ch == '\u{7f}' {
            return true;
        }
    }

    false
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => {
            if let Some(num) = base.strip_prefix("COM") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else if let Some(num) = base.strip_prefix("LPT") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else {
                false
            }
        }
    }
}

impl NoteFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn notes_path(&self, user_id: &UserId) -> PathBuf {
        let file_stem = encode_persisted_id_segment(user_id.as_str());
        self.root
            .join(NOTES_DIR)
            .join(format!("{file_stem}{NOTES_FILE_SUFFIX}"))
    }

    /// All of one user's rows, newest first (creation time descending,
    /// note id descending as the tie-breaker so the order is total).
    pub fn list_notes(&self, user_id: &UserId) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.load_rows(user_id)?;
        notes.sort_by(|a, b| {
            b.created_at_millis()
                .cmp(&a.created_at_millis())
                .then_with(|| b.note_id().cmp(a.note_id()))
        });
        Ok(notes)
    }

    pub fn insert_note(&self, note: &Note) -> Result<(), StoreError> {
        let mut rows = self.load_rows(note.user_id())?;
        if rows.iter().any(|row| row.note_id() == note.note_id()) {
            return Err(StoreError::NoteExists {
                note_id: note.note_id().clone(),
            });
        }
        rows.push(note.clone());
        self.save_rows(note.user_id(), &rows)
    }

    pub fn update_note(
        &self,
        user_id: &UserId,
        note_id: &NoteId,
        title: &str,
        body: &str,
    ) -> Result<Note, StoreError> {
        let mut rows = self.load_rows(user_id)?;
        let Some(row) = rows.iter_mut().find(|row| row.note_id() == note_id) else {
            return Err(StoreError::NoteNotFound {
                note_id: note_id.clone(),
            });
        };
        row.set_title(title);
        row.set_body(body);
        let updated = row.clone();
        self.save_rows(user_id, &rows)?;
        Ok(updated)
    }

    pub fn delete_note(&self, user_id: &UserId, note_id: &NoteId) -> Result<(), StoreError> {
        let mut rows = self.load_rows(user_id)?;
        let before = rows.len();
        rows.retain(|row| row.note_id() != note_id);
        if rows.len() == before {
            return Err(StoreError::NoteNotFound {
                note_id: note_id.clone(),
            });
        }
        self.save_rows(user_id, &rows)
    }

    /// Bulk delete for multi-select consumers. Ids with no matching row are
    /// skipped; returns how many rows were removed.
    pub fn delete_notes(
        &self,
        user_id: &UserId,
        note_ids: &BTreeSet<NoteId>,
    ) -> Result<usize, StoreError> {
        if note_ids.is_empty() {
            return Ok(0);
        }
        let mut rows = self.load_rows(user_id)?;
        let before = rows.len();
        rows.retain(|row| !note_ids.contains(row.note_id()));
        let removed = before - rows.len();
        if removed > 0 {
            self.save_rows(user_id, &rows)?;
        }
        Ok(removed)
    }

    /// Allocates the next free row id for a user.
    pub fn next_note_id(&self, user_id: &UserId) -> Result<NoteId, StoreError> {
        let rows = self.load_rows(user_id)?;
        let max_numbered = rows
            .iter()
            .filter_map(|row| row.note_id().as_str().strip_prefix("n:"))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(NoteId::new(format!("n:{:04}", max_numbered + 1))
            .expect("generated note id is a valid segment"))
    }

    fn load_rows(&self, user_id: &UserId) -> Result<Vec<Note>, StoreError> {
        let path = self.notes_path(user_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let records: Vec<NoteRecord> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        records
            .into_iter()
            .map(NoteRecord::into_note)
            .collect::<Result<Vec<_>, _>>()
    }

    fn save_rows(&self, user_id: &UserId, rows: &[Note]) -> Result<(), StoreError> {
        let path = self.notes_path(user_id);
        let records: Vec<NoteRecord> = rows.iter().map(NoteRecord::from_note).collect();
        let mut json =
            serde_json::to_string_pretty(&records).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        if !json.ends_with('\n') {
            json.push('\n');
        }
        write_atomic_in_store(&self.root, &path, json.as_bytes(), self.durability)
    }
}

fn validate_relative_path(field: &'static str, path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().is_empty() {
        return Err(StoreError::InvalidRelativePath {
            field,
            value: path.to_path_buf(),
        });
    }

    if path.is_absolute() {
        return Err(StoreError::InvalidRelativePath {
            field,
            value: path.to_path_buf(),
        });
    }

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(StoreError::InvalidRelativePath {
                    field,
                    value: path.to_path_buf(),
                });
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

fn to_relative_path(
    store_dir: &Path,
    path: &Path,
    field: &'static str,
) -> Result<PathBuf, StoreError> {
    let relative = if path.is_absolute() {
        path.strip_prefix(store_dir)
            .map(PathBuf::from)
            .map_err(|_| StoreError::PathOutsideStore {
                store_dir: store_dir.to_path_buf(),
                path: path.to_path_buf(),
            })?
    } else {
        path.to_path_buf()
    };

    validate_relative_path(field, &relative)?;
    Ok(relative)
}

fn create_dir_all_safe(store_dir: &Path, relative: &Path) -> Result<(), StoreError> {
    if relative.as_os_str().is_empty() {
        return Ok(());
    }

    validate_relative_path("dir", relative)?;

    let mut current = store_dir.to_path_buf();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };

        current.push(part);

        match fs::symlink_metadata(&current) {
            Ok(md) => {
                if md.file_type().is_symlink() {
                    return Err(StoreError::SymlinkRefused { path: current });
                }
                if !md.is_dir() {
                    return Err(StoreError::Io {
                        path: current,
                        source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
                    });
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|source| StoreError::Io {
                    path: current.clone(),
                    source,
                })?;
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: current,
                    source,
                })
            }
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic_in_store(
    store_dir: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(store_dir).map_err(|source| StoreError::Io {
        path: store_dir.to_path_buf(),
        source,
    })?;

    let relative = to_relative_path(store_dir, path, "path")?;
    let parent_rel = relative.parent().unwrap_or_else(|| Path::new(""));
    create_dir_all_safe(store_dir, parent_rel)?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".naiad.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
