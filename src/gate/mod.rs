// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Route-authorization gate.
//!
//! One stateless decision per inbound navigation request: allow it through
//! or redirect, based solely on the request path and whether a valid
//! session is attached. The decision short-circuits: no page logic runs on
//! a redirect outcome. Static asset paths are matched and skipped before
//! the decision is ever invoked.
//!
//! Failure semantics: a session-validation error is indistinguishable from
//! an absent session. The gate fails closed toward the sign-in redirect; it
//! never surfaces a validation error to the user.

use std::sync::OnceLock;

use regex::Regex;

use crate::session::IdentityProvider;

/// Name of the session cookie carried by the web surface.
pub const SESSION_COOKIE: &str = "naiad_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

/// Paths that never reach the gate: static assets, favicon, and anything
/// with a static-file extension.
fn asset_exclusion() -> &'static Regex {
    static ASSET_EXCLUSION: OnceLock<Regex> = OnceLock::new();
    ASSET_EXCLUSION.get_or_init(|| {
        Regex::new(r"^/assets/|^/favicon\.ico$|\.(?:svg|png|jpg|jpeg|gif|webp|css|js|ico)$")
            .expect("hard-coded asset exclusion pattern is valid")
    })
}

/// The gate's route table: exact authenticated-only paths, the
/// pre-authentication prefixes, and the two redirect targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGate {
    protected_paths: Vec<String>,
    auth_prefixes: Vec<String>,
    sign_in_path: String,
    landing_path: String,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self {
            protected_paths: vec!["/notes".to_owned(), "/protected".to_owned()],
            auth_prefixes: vec!["/sign-in".to_owned(), "/sign-up".to_owned()],
            sign_in_path: "/sign-in".to_owned(),
            landing_path: "/protected".to_owned(),
        }
    }
}

impl RouteGate {
    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// True when the path is excluded from gating entirely.
    pub fn skips(&self, path: &str) -> bool {
        asset_exclusion().is_match(path)
    }

    /// The pure decision function. No persisted state, no side effects.
    pub fn decide(&self, path: &str, has_session: bool) -> RouteDecision {
        if !has_session && self.protected_paths.iter().any(|protected| protected == path) {
            return RouteDecision::Redirect(self.sign_in_path.clone());
        }

        if has_session
            && self
                .auth_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return RouteDecision::Redirect(self.landing_path.clone());
        }

        RouteDecision::Allow
    }

    /// Full per-request evaluation: resolve session presence from the
    /// request's cookie header via the identity provider, then decide.
    /// This validation is the request path's one blocking step; its failure
    /// maps to `has_session = false` with no retry.
    pub fn evaluate(
        &self,
        provider: &dyn IdentityProvider,
        path: &str,
        cookie_header: Option<&str>,
    ) -> RouteDecision {
        let has_session = match cookie_header.and_then(session_token_from_cookies) {
            Some(token) => match provider.validate_token(token) {
                Ok(principal) => principal.is_some(),
                Err(err) => {
                    log::warn!("session validation failed for {path}: {err}");
                    false
                }
            },
            None => false,
        };

        let decision = self.decide(path, has_session);
        if let RouteDecision::Redirect(target) = &decision {
            log::debug!("gate: {path} (session={has_session}) -> redirect {target}");
        }
        decision
    }
}

/// Extracts the session token from a `Cookie` request header.
pub fn session_token_from_cookies(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name.trim() == SESSION_COOKIE {
            let value = value.trim();
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}
