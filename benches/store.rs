// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use naiad::store::NoteFolder;

mod fixtures;
mod profiler;

use fixtures::TempDir;

// Benchmark identity (keep stable):
// - Group name in this file: `store.notes`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `insert_medium`, `list_large`).
// - If implementations move/deduplicate, update the wiring but do not rename
//   group or case IDs.
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.notes");

    let medium = fixtures::notes(fixtures::Case::NotesMedium);
    group.bench_function("insert_medium", |b| {
        b.iter_batched_ref(
            || TempDir::new("store_notes_insert_medium"),
            |tmp| {
                let folder = NoteFolder::new(tmp.path());
                for note in &medium {
                    folder.insert_note(black_box(note)).expect("insert_note");
                }
                black_box(
                    std::fs::metadata(folder.notes_path(&fixtures::bench_user_id()))
                        .expect("notes file metadata")
                        .len(),
                )
            },
            BatchSize::SmallInput,
        )
    });

    let large = fixtures::notes(fixtures::Case::NotesLarge);
    let user_id = fixtures::bench_user_id();
    let tmp = TempDir::new("store_notes_list_large");
    let folder = NoteFolder::new(tmp.path());
    for note in &large {
        folder.insert_note(note).expect("insert_note");
    }
    group.bench_function("list_large", |b| {
        b.iter(|| {
            let rows = folder.list_notes(black_box(&user_id)).expect("list_notes");
            black_box(rows.len())
        })
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_store
}
criterion_main!(benches);
