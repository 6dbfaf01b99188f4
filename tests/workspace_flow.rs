// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end flow over the public API: an account signs up, the gate
//! admits it, rows land in the store, a drag selection resolves against
//! them, and a sign-out closes everything down.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use naiad::gate::{RouteDecision, RouteGate, SESSION_COOKIE};
use naiad::model::Note;
use naiad::select::{is_inside, Bounds, SelectionEngine};
use naiad::session::{IdentityProvider, LocalIdentity, SessionWatcher};
use naiad::store::NoteFolder;

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("naiad-{prefix}-{}-{nanos}", std::process::id()));
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

#[test]
fn sign_up_gate_store_select_sign_out() {
    let tmp = TempDir::new("workspace-flow");
    let identity = Arc::new(LocalIdentity::new());
    let folder = NoteFolder::new(tmp.path().join("store"));
    let gate = RouteGate::default();

    // Anonymous requests to the notes workspace bounce to sign-in.
    assert_eq!(
        gate.evaluate(identity.as_ref(), "/notes", None),
        RouteDecision::Redirect("/sign-in".to_owned())
    );

    // Sign up, and watch the session signal flip on.
    let mut watcher = SessionWatcher::new(identity.clone() as Arc<dyn IdentityProvider>);
    let signed_in = identity.sign_up("flow@example.com", "pw").expect("sign up");
    assert!(watcher.poll_change().expect("session change").is_some());

    let cookie = format!("{SESSION_COOKIE}={}", signed_in.token());
    assert_eq!(
        gate.evaluate(identity.as_ref(), "/notes", Some(&cookie)),
        RouteDecision::Allow
    );
    assert_eq!(
        gate.evaluate(identity.as_ref(), "/sign-in", Some(&cookie)),
        RouteDecision::Redirect("/protected".to_owned())
    );

    // Two rows for the account.
    let user_id = signed_in.principal().user_id().clone();
    for (idx, title) in ["First", "Second"].iter().enumerate() {
        let note_id = folder.next_note_id(&user_id).expect("next id");
        let note = Note::new(
            note_id,
            user_id.clone(),
            *title,
            format!("{title} body"),
            1_000 + idx as u64,
        );
        folder.insert_note(&note).expect("insert note");
    }
    let notes = folder.list_notes(&user_id).expect("list notes");
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].title(), "Second");

    // Rubber-band over rows laid out one per line; the drag covers row 0 only.
    let mut engine: SelectionEngine<()> = SelectionEngine::new(|_| false);
    engine.session_changed(watcher.present());
    engine.pointer_down(0, 0, &());
    engine.pointer_move(40, 1, &());

    let bounds: Vec<Bounds> = (0..notes.len() as i32)
        .map(|row| Bounds::new(0, row, 60, row + 1))
        .collect();
    let selected: Vec<&Note> = notes
        .iter()
        .zip(&bounds)
        .filter(|(_, bounds)| is_inside(**bounds, engine.rect()))
        .map(|(note, _)| note)
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].title(), "Second");

    // Sign out mid-drag: the session signal drops and the engine resets in
    // the same event turn.
    identity.sign_out(signed_in.token()).expect("sign out");
    let change = watcher.poll_change().expect("session change");
    assert!(change.is_none());
    engine.session_changed(change.is_some());
    assert!(!engine.rect().active());

    assert_eq!(
        gate.evaluate(identity.as_ref(), "/notes", Some(&cookie)),
        RouteDecision::Redirect("/sign-in".to_owned())
    );
}
