// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{NoteFolder, StoreError, WriteDurability};
use crate::model::{Note, NoteId, UserId};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("naiad-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct NoteFolderTestCtx {
    #[allow(dead_code)]
    tmp: TempDir,
    folder: NoteFolder,
    user_id: UserId,
}

impl NoteFolderTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let folder = NoteFolder::new(tmp.path().join("workspace"));
        let user_id = UserId::new("u:0001").expect("user id");
        Self { tmp, folder, user_id }
    }

    fn note(&self, note_id: &str, title: &str, created_at_millis: u64) -> Note {
        Note::new(
            NoteId::new(note_id).expect("note id"),
            self.user_id.clone(),
            title,
            format!("{title} body"),
            created_at_millis,
        )
    }
}

#[fixture]
fn ctx() -> NoteFolderTestCtx {
    NoteFolderTestCtx::new("note-folder")
}

#[rstest]
fn missing_rows_file_reads_as_empty(ctx: NoteFolderTestCtx) {
    let notes = ctx.folder.list_notes(&ctx.user_id).expect("list notes");
    assert!(notes.is_empty());
}

#[rstest]
fn insert_then_list_round_trips(ctx: NoteFolderTestCtx) {
    let note = ctx.note("n:0001", "First", 1_000);
    ctx.folder.insert_note(&note).expect("insert note");

    let notes = ctx.folder.list_notes(&ctx.user_id).expect("list notes");
    assert_eq!(notes, vec![note]);
}

#[rstest]
fn list_orders_newest_first_with_id_tiebreak(ctx: NoteFolderTestCtx) {
    ctx.folder.insert_note(&ctx.note("n:0001", "Oldest", 1_000)).expect("insert");
    ctx.folder.insert_note(&ctx.note("n:0002", "Newest", 3_000)).expect("insert");
    ctx.folder.insert_note(&ctx.note("n:0003", "Middle", 2_000)).expect("insert");
    ctx.folder.insert_note(&ctx.note("n:0004", "MiddleTie", 2_000)).expect("insert");

    let notes = ctx.folder.list_notes(&ctx.user_id).expect("list notes");
    let titles: Vec<&str> = notes.iter().map(Note::title).collect();
    assert_eq!(titles, vec!["Newest", "MiddleTie", "Middle", "Oldest"]);
}

#[rstest]
fn insert_duplicate_id_reports_row_exists(ctx: NoteFolderTestCtx) {
    ctx.folder.insert_note(&ctx.note("n:0001", "First", 1_000)).expect("insert");
    let err = ctx
        .folder
        .insert_note(&ctx.note("n:0001", "Again", 2_000))
        .unwrap_err();
    assert_eq!(err.code(), "row_exists");
}

#[rstest]
fn update_rewrites_title_and_body(ctx: NoteFolderTestCtx) {
    ctx.folder.insert_note(&ctx.note("n:0001", "Draft", 1_000)).expect("insert");

    let note_id = NoteId::new("n:0001").expect("note id");
    let updated = ctx
        .folder
        .update_note(&ctx.user_id, &note_id, "Final", "Final body")
        .expect("update note");
    assert_eq!(updated.title(), "Final");
    assert_eq!(updated.body(), "Final body");
    assert_eq!(updated.created_at_millis(), 1_000);

    let notes = ctx.folder.list_notes(&ctx.user_id).expect("list notes");
    assert_eq!(notes, vec![updated]);
}

#[rstest]
fn update_of_absent_row_reports_row_not_found(ctx: NoteFolderTestCtx) {
    let note_id = NoteId::new("n:0042").expect("note id");
    let err = ctx
        .folder
        .update_note(&ctx.user_id, &note_id, "T", "B")
        .unwrap_err();
    assert_eq!(err.code(), "row_not_found");
}

#[rstest]
fn delete_removes_only_the_addressed_row(ctx: NoteFolderTestCtx) {
    ctx.folder.insert_note(&ctx.note("n:0001", "Keep", 1_000)).expect("insert");
    ctx.folder.insert_note(&ctx.note("n:0002", "Drop", 2_000)).expect("insert");

    let note_id = NoteId::new("n:0002").expect("note id");
    ctx.folder.delete_note(&ctx.user_id, &note_id).expect("delete note");

    let notes = ctx.folder.list_notes(&ctx.user_id).expect("list notes");
    let titles: Vec<&str> = notes.iter().map(Note::title).collect();
    assert_eq!(titles, vec!["Keep"]);

    let err = ctx.folder.delete_note(&ctx.user_id, &note_id).unwrap_err();
    assert_eq!(err.code(), "row_not_found");
}

#[rstest]
fn bulk_delete_skips_absent_ids_and_reports_count(ctx: NoteFolderTestCtx) {
    ctx.folder.insert_note(&ctx.note("n:0001", "A", 1_000)).expect("insert");
    ctx.folder.insert_note(&ctx.note("n:0002", "B", 2_000)).expect("insert");
    ctx.folder.insert_note(&ctx.note("n:0003", "C", 3_000)).expect("insert");

    let mut selection = BTreeSet::new();
    selection.insert(NoteId::new("n:0001").expect("note id"));
    selection.insert(NoteId::new("n:0003").expect("note id"));
    selection.insert(NoteId::new("n:0099").expect("note id"));

    let removed = ctx.folder.delete_notes(&ctx.user_id, &selection).expect("bulk delete");
    assert_eq!(removed, 2);

    let notes = ctx.folder.list_notes(&ctx.user_id).expect("list notes");
    let titles: Vec<&str> = notes.iter().map(Note::title).collect();
    assert_eq!(titles, vec!["B"]);
}

#[rstest]
fn bulk_delete_of_empty_selection_touches_nothing(ctx: NoteFolderTestCtx) {
    let removed = ctx
        .folder
        .delete_notes(&ctx.user_id, &BTreeSet::new())
        .expect("bulk delete");
    assert_eq!(removed, 0);
    assert!(!ctx.folder.notes_path(&ctx.user_id).exists());
}

#[rstest]
fn rows_are_isolated_per_user(ctx: NoteFolderTestCtx) {
    ctx.folder.insert_note(&ctx.note("n:0001", "Mine", 1_000)).expect("insert");

    let other = UserId::new("u:0002").expect("user id");
    let theirs = ctx.folder.list_notes(&other).expect("list notes");
    assert!(theirs.is_empty());
}

#[rstest]
fn next_note_id_continues_the_numbered_sequence(ctx: NoteFolderTestCtx) {
    assert_eq!(
        ctx.folder.next_note_id(&ctx.user_id).expect("next id").as_str(),
        "n:0001"
    );

    ctx.folder.insert_note(&ctx.note("n:0007", "Seventh", 1_000)).expect("insert");
    assert_eq!(
        ctx.folder.next_note_id(&ctx.user_id).expect("next id").as_str(),
        "n:0008"
    );
}

#[rstest]
fn corrupt_rows_file_surfaces_malformed_row(ctx: NoteFolderTestCtx) {
    let path = ctx.folder.notes_path(&ctx.user_id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"{not json").unwrap();

    let err = ctx.folder.list_notes(&ctx.user_id).unwrap_err();
    assert_eq!(err.code(), "malformed_row");
}

#[rstest]
fn durable_mode_round_trips(ctx: NoteFolderTestCtx) {
    let folder = NoteFolder::new(ctx.folder.root()).with_durability(WriteDurability::Durable);
    folder.insert_note(&ctx.note("n:0001", "Durable", 1_000)).expect("insert");

    let notes = folder.list_notes(&ctx.user_id).expect("list notes");
    assert_eq!(notes.len(), 1);
}

#[cfg(unix)]
#[rstest]
fn refuses_to_write_through_symlinked_rows_file(ctx: NoteFolderTestCtx) {
    let path = ctx.folder.notes_path(&ctx.user_id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let target = path.parent().unwrap().join("elsewhere.json");
    std::fs::write(&target, b"[]").unwrap();
    std::os::unix::fs::symlink(&target, &path).unwrap();

    let err = ctx
        .folder
        .insert_note(&ctx.note("n:0001", "Nope", 1_000))
        .unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
}

#[rstest]
fn encoded_user_ids_stay_inside_the_notes_dir(ctx: NoteFolderTestCtx) {
    // A user id needing windows-safe encoding must not escape the folder.
    let odd = UserId::new("u:what?").expect("user id");
    let note = Note::new(
        NoteId::new("n:0001").expect("note id"),
        odd.clone(),
        "Odd",
        "Odd body",
        1_000,
    );
    ctx.folder.insert_note(&note).expect("insert");

    let path = ctx.folder.notes_path(&odd);
    assert!(path.starts_with(ctx.folder.root()));
    assert!(path.exists());
    assert_eq!(ctx.folder.list_notes(&odd).expect("list notes").len(), 1);
}
