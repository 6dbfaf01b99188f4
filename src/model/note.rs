// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{NoteId, UserId};

/// A single note row, always scoped to its owning user.
///
/// Creation time is kept as milliseconds since the Unix epoch; listings are
/// ordered by it, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    note_id: NoteId,
    user_id: UserId,
    title: String,
    body: String,
    created_at_millis: u64,
}

impl Note {
    pub fn new(
        note_id: NoteId,
        user_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at_millis: u64,
    ) -> Self {
        Self {
            note_id,
            user_id,
            title: title.into(),
            body: body.into(),
            created_at_millis,
        }
    }

    pub fn note_id(&self) -> &NoteId {
        &self.note_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn created_at_millis(&self) -> u64 {
        self.created_at_millis
    }
}
