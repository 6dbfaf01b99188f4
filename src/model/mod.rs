// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Notes are owned by users; the authenticated principal is an eventually
//! consistent snapshot of the identity provider's session state.

pub mod ids;
pub mod note;
pub mod principal;

pub use ids::{Id, IdError, NoteId, UserId};
pub use note::Note;
pub use principal::SessionPrincipal;
