// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-process identity provider.
//!
//! `LocalIdentity` backs development, the demo workspace, and tests. It
//! keeps accounts and live session tokens in memory and broadcasts the most
//! recent auth event over a watch channel, which is what lets a sign-out on
//! the web surface terminate a drag in the terminal workspace in the same
//! event turn. Hosted deployments replace this with an implementation
//! against their identity service; token entropy and expiry live there.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tokio::sync::watch;

use crate::model::{SessionPrincipal, UserId};

use super::{IdentityError, IdentityProvider, SessionSubscription, SignedIn};

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    email: String,
    password: String,
    display_name: Option<String>,
}

#[derive(Debug, Default)]
struct IdentityState {
    accounts_by_email: BTreeMap<String, Account>,
    sessions_by_token: BTreeMap<String, UserId>,
    next_user: u64,
    next_token: u64,
}

pub struct LocalIdentity {
    state: Mutex<IdentityState>,
    broadcast: watch::Sender<Option<SessionPrincipal>>,
    boot_nanos: u128,
}

impl LocalIdentity {
    pub fn new() -> Self {
        let (broadcast, _) = watch::channel(None);
        let boot_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        Self {
            state: Mutex::new(IdentityState::default()),
            broadcast,
            boot_nanos,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IdentityState> {
        self.state.lock().expect("identity state lock poisoned")
    }

    fn mint_token(&self, user_id: &UserId, counter: u64) -> String {
        let raw = format!("u:{user_id}:{}:{counter}", self.boot_nanos);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    fn principal_for(account: &Account) -> SessionPrincipal {
        SessionPrincipal::new(account.user_id.clone(), account.email.clone())
    }

    fn account_by_user<'a>(
        state: &'a IdentityState,
        user_id: &UserId,
    ) -> Option<&'a Account> {
        state
            .accounts_by_email
            .values()
            .find(|account| &account.user_id == user_id)
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_session(&self) -> Option<SessionPrincipal> {
        self.broadcast.borrow().clone()
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.broadcast.subscribe())
    }

    fn validate_token(&self, token: &str) -> Result<Option<SessionPrincipal>, IdentityError> {
        if URL_SAFE_NO_PAD.decode(token.as_bytes()).is_err() {
            return Err(IdentityError::MalformedToken);
        }

        let state = self.lock();
        let Some(user_id) = state.sessions_by_token.get(token) else {
            return Ok(None);
        };
        let Some(account) = Self::account_by_user(&state, user_id) else {
            return Ok(None);
        };
        Ok(Some(Self::principal_for(account)))
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        let email = email.trim().to_ascii_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }

        let signed_in = {
            let mut state = self.lock();
            if state.accounts_by_email.contains_key(&email) {
                return Err(IdentityError::EmailTaken { email });
            }

            state.next_user += 1;
            let user_id = UserId::new(format!("u:{:04}", state.next_user))
                .expect("generated user id is a valid segment");
            let account = Account {
                user_id: user_id.clone(),
                email: email.clone(),
                password: password.to_owned(),
                display_name: None,
            };
            state.accounts_by_email.insert(email, account.clone());

            state.next_token += 1;
            let token = self.mint_token(&user_id, state.next_token);
            state.sessions_by_token.insert(token.clone(), user_id);
            SignedIn::new(Self::principal_for(&account), token)
        };

        self.broadcast.send_replace(Some(signed_in.principal().clone()));
        Ok(signed_in)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        let email = email.trim().to_ascii_lowercase();

        let signed_in = {
            let mut state = self.lock();
            let Some(account) = state.accounts_by_email.get(&email).cloned() else {
                return Err(IdentityError::InvalidCredentials);
            };
            if account.password != password {
                return Err(IdentityError::InvalidCredentials);
            }

            state.next_token += 1;
            let token = self.mint_token(&account.user_id, state.next_token);
            state
                .sessions_by_token
                .insert(token.clone(), account.user_id.clone());
            SignedIn::new(Self::principal_for(&account), token)
        };

        self.broadcast.send_replace(Some(signed_in.principal().clone()));
        Ok(signed_in)
    }

    fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        let signed_out_user = {
            let mut state = self.lock();
            state.sessions_by_token.remove(token)
        };

        if let Some(user_id) = signed_out_user {
            let clears_broadcast = self
                .broadcast
                .borrow()
                .as_ref()
                .is_some_and(|principal| principal.user_id() == &user_id);
            if clears_broadcast {
                self.broadcast.send_replace(None);
            }
        }
        Ok(())
    }

    fn display_name(&self, user_id: &UserId) -> Option<String> {
        let state = self.lock();
        Self::account_by_user(&state, user_id).and_then(|account| account.display_name.clone())
    }

    fn set_display_name(&self, user_id: &UserId, name: &str) -> Result<(), IdentityError> {
        let mut state = self.lock();
        let account = state
            .accounts_by_email
            .values_mut()
            .find(|account| &account.user_id == user_id)
            .ok_or_else(|| IdentityError::UnknownUser {
                user_id: user_id.clone(),
            })?;

        let name = name.trim();
        account.display_name = if name.is_empty() {
            None
        } else {
            Some(name.to_owned())
        };
        Ok(())
    }
}
