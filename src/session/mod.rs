// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Identity seam and session observation.
//!
//! The identity provider is an external collaborator; naiad consumes it
//! through [`IdentityProvider`] and funnels its "current session" pull and
//! change-notification push into one [`SessionWatcher`], shared by reference
//! between the terminal workspace and the web gate so the two never hold
//! divergent session views during a login/logout race.
//!
//! Subscriptions are owned guard objects: dropping a [`SessionSubscription`]
//! detaches its listener. No teardown is left implicit.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{SessionPrincipal, UserId};

pub mod local;

pub use local::LocalIdentity;

/// A successful sign-in/sign-up: the principal plus the session token the
/// caller stores client-side (for the web surface, in the session cookie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    principal: SessionPrincipal,
    token: String,
}

impl SignedIn {
    pub fn new(principal: SessionPrincipal, token: impl Into<String>) -> Self {
        Self {
            principal,
            token: token.into(),
        }
    }

    pub fn principal(&self) -> &SessionPrincipal {
        &self.principal
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    InvalidCredentials,
    EmailTaken { email: String },
    UnknownUser { user_id: UserId },
    MalformedToken,
    Unavailable { reason: String },
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => f.write_str("invalid email or password"),
            Self::EmailTaken { email } => write!(f, "an account already exists for {email}"),
            Self::UnknownUser { user_id } => write!(f, "no account for user {user_id}"),
            Self::MalformedToken => f.write_str("session token is malformed"),
            Self::Unavailable { reason } => write!(f, "identity provider unavailable: {reason}"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// The identity-provider surface naiad consumes.
///
/// `validate_token` is the route gate's single suspension point per request;
/// an `Err` result is treated by the gate exactly like an absent session
/// (fail closed). `current_session`/`subscribe` feed the workspace-side
/// session signal. The bundled [`LocalIdentity`] implements this for
/// development and tests; hosted deployments substitute their identity
/// service behind the same trait.
pub trait IdentityProvider: Send + Sync {
    fn current_session(&self) -> Option<SessionPrincipal>;

    fn subscribe(&self) -> SessionSubscription;

    fn validate_token(&self, token: &str) -> Result<Option<SessionPrincipal>, IdentityError>;

    fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError>;

    fn sign_out(&self, token: &str) -> Result<(), IdentityError>;

    fn display_name(&self, user_id: &UserId) -> Option<String>;

    fn set_display_name(&self, user_id: &UserId, name: &str) -> Result<(), IdentityError>;
}

/// An owned change-notification subscription.
///
/// Holding the value keeps the listener attached; dropping it releases the
/// listener. The receiver end never blocks the provider.
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<SessionPrincipal>>,
    provider_gone: bool,
}

impl SessionSubscription {
    pub fn new(receiver: watch::Receiver<Option<SessionPrincipal>>) -> Self {
        Self {
            receiver,
            provider_gone: false,
        }
    }

    /// The latest observed value, without consuming the change flag. A gone
    /// provider reads as no session.
    pub fn current(&self) -> Option<SessionPrincipal> {
        if self.provider_gone {
            return None;
        }
        self.receiver.borrow().clone()
    }

    /// Non-blocking poll used by the terminal event loop: returns
    /// `Some(new_value)` when the session changed since the last call, and
    /// marks it seen. A dropped provider is reported once, as a lost
    /// session.
    pub fn poll_change(&mut self) -> Option<Option<SessionPrincipal>> {
        if self.provider_gone {
            return None;
        }

        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            Ok(false) => None,
            Err(_) => {
                let lost = self.receiver.borrow().is_some();
                self.provider_gone = true;
                if lost {
                    Some(None)
                } else {
                    None
                }
            }
        }
    }

    /// Awaits the next change. Resolves to `None` permanently once the
    /// provider is gone (fail closed).
    pub async fn changed(&mut self) -> Option<SessionPrincipal> {
        if self.provider_gone {
            return None;
        }
        match self.receiver.changed().await {
            Ok(()) => self.receiver.borrow_and_update().clone(),
            Err(_) => {
                self.provider_gone = true;
                None
            }
        }
    }
}

impl fmt::Debug for SessionSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSubscription")
            .field("current", &self.receiver.borrow().is_some())
            .finish()
    }
}

/// One observable session value: initial pull plus change subscription.
pub struct SessionWatcher {
    provider: Arc<dyn IdentityProvider>,
    subscription: SessionSubscription,
}

impl SessionWatcher {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let subscription = provider.subscribe();
        Self {
            provider,
            subscription,
        }
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    pub fn current(&self) -> Option<SessionPrincipal> {
        self.subscription.current()
    }

    pub fn present(&self) -> bool {
        self.subscription.current().is_some()
    }

    /// See [`SessionSubscription::poll_change`].
    pub fn poll_change(&mut self) -> Option<Option<SessionPrincipal>> {
        self.subscription.poll_change()
    }

    /// A further independent subscription for another component; each guard
    /// detaches on drop.
    pub fn subscribe(&self) -> SessionSubscription {
        self.provider.subscribe()
    }
}
