// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::UserId;

/// The authenticated principal attached to a live session.
///
/// The identity provider is the source of truth; this value is an opaque,
/// eventually-consistent snapshot of it. `Option<SessionPrincipal>` is the
/// observable "is anyone signed in" signal consumed by the selection engine
/// host and the route gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    user_id: UserId,
    email: String,
}

impl SessionPrincipal {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
