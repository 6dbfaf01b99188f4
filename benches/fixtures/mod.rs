// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use naiad::model::{Note, NoteId, UserId};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("naiad_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    NotesSmall,
    NotesMedium,
    NotesLarge,
}

impl Case {
    fn count(self) -> usize {
        match self {
            Self::NotesSmall => 8,
            Self::NotesMedium => 128,
            Self::NotesLarge => 1024,
        }
    }
}

pub fn bench_user_id() -> UserId {
    UserId::new("u:bench").expect("bench user id")
}

/// A deterministic set of rows: stable ids, staggered creation times, and
/// titles/bodies long enough to exercise serialization.
pub fn notes(case: Case) -> Vec<Note> {
    let user_id = bench_user_id();
    (0..case.count())
        .map(|idx| {
            let note_id = NoteId::new(format!("n:{idx:05}")).expect("bench note id");
            Note::new(
                note_id,
                user_id.clone(),
                format!("Benchmark note {idx} with a realistically sized title"),
                format!(
                    "Body text for note {idx}. Lorem ipsum dolor sit amet, consectetur \
                     adipiscing elit, sed do eiusmod tempor incididunt ut labore."
                ),
                1_700_000_000_000 + (idx as u64) * 1_000,
            )
        })
        .collect()
}
