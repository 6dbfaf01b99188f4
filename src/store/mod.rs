// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for notes on disk.
//!
//! The store module reads/writes per-user note row files used by both the
//! terminal workspace and the web surface. Errors carry a machine-readable
//! code for programmatic consumers.

pub mod note_folder;

pub use note_folder::{NoteFolder, StoreError, WriteDurability};
