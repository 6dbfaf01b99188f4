// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Multi-page web surface.
//!
//! Sign-in/sign-up/sign-out, the notes page, profile pages, and the
//! protected landing page, with the route gate layered in front of every
//! request. Mutating handlers re-resolve the principal themselves so that
//! rows are always scoped to their owner, independent of the page gate.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Form, Path, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::gate::{session_token_from_cookies, RouteDecision, RouteGate, SESSION_COOKIE};
use crate::model::{Note, NoteId, SessionPrincipal};
use crate::session::IdentityProvider;
use crate::store::{NoteFolder, StoreError};
use crate::ui::WorkspaceState;

mod pages;


/// Shared state behind the web surface: the identity seam, the notes store,
/// the gate's route table, and the workspace snapshot published by the TUI.
pub struct Gateway {
    identity: Arc<dyn IdentityProvider>,
    notes: NoteFolder,
    gate: RouteGate,
    workspace: Arc<Mutex<WorkspaceState>>,
}

impl Gateway {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        notes: NoteFolder,
        workspace: Arc<Mutex<WorkspaceState>>,
    ) -> Self {
        Self {
            identity,
            notes,
            gate: RouteGate::default(),
            workspace,
        }
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub fn notes(&self) -> &NoteFolder {
        &self.notes
    }

    pub fn gate(&self) -> &RouteGate {
        &self.gate
    }

    pub fn workspace(&self) -> &Arc<Mutex<WorkspaceState>> {
        &self.workspace
    }
}

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/sign-in", get(sign_in_page).post(sign_in_submit))
        .route("/sign-up", get(sign_up_page).post(sign_up_submit))
        .route("/sign-out", post(sign_out_submit))
        .route("/protected", get(protected_page))
        .route("/profile", get(profile_page))
        .route("/profile/edit", get(profile_edit_page).post(profile_edit_submit))
        .route("/notes", get(notes_page).post(note_create))
        .route("/notes/{note_id}", post(note_update))
        .route("/notes/{note_id}/delete", post(note_delete))
        .route("/api/selection", get(selection_snapshot))
        .layer(middleware::from_fn_with_state(gateway.clone(), gate_layer))
        .with_state(gateway)
}

/// The per-request authorization gate. Asset paths never reach the
/// decision; a redirect outcome short-circuits before any handler runs.
async fn gate_layer(
    State(gateway): State<Arc<Gateway>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if gateway.gate.skips(&path) {
        return next.run(request).await;
    }

    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);

    match gateway
        .gate
        .evaluate(gateway.identity.as_ref(), &path, cookie_header.as_deref())
    {
        RouteDecision::Allow => next.run(request).await,
        RouteDecision::Redirect(target) => Redirect::temporary(&target).into_response(),
    }
}

fn principal_from_headers(gateway: &Gateway, headers: &HeaderMap) -> Option<SessionPrincipal> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = session_token_from_cookies(cookie_header)?;
    match gateway.identity.validate_token(token) {
        Ok(principal) => principal,
        Err(err) => {
            log::warn!("session validation failed in handler: {err}");
            None
        }
    }
}

/// Mutating handlers fail closed the same way the gate does: no principal,
/// no row access.
fn require_principal(
    gateway: &Gateway,
    headers: &HeaderMap,
) -> Result<SessionPrincipal, Response> {
    principal_from_headers(gateway, headers)
        .ok_or_else(|| Redirect::to(gateway.gate.sign_in_path()).into_response())
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn redirect_with_cookie(target: &str, cookie: &str) -> Response {
    let mut response = Redirect::to(target).into_response();
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

fn store_error_response(err: StoreError) -> Response {
    let status = match err.code() {
        "row_not_found" => StatusCode::NOT_FOUND,
        "invalid_id" => StatusCode::BAD_REQUEST,
        _ => {
            log::warn!("store error: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "code": err.code(), "message": err.to_string() }))).into_response()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Deserialize)]
struct CredentialsForm {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct NoteForm {
    title: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct ProfileForm {
    #[serde(default)]
    display_name: String,
}

async fn landing(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Html<String> {
    let signed_in = principal_from_headers(&gateway, &headers).is_some();
    Html(pages::landing(signed_in))
}

async fn sign_in_page() -> Html<String> {
    Html(pages::sign_in(None))
}

async fn sign_in_submit(
    State(gateway): State<Arc<Gateway>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match gateway.identity.sign_in(&form.email, &form.password) {
        Ok(signed_in) => redirect_with_cookie(
            gateway.gate.landing_path(),
            &session_cookie(signed_in.token()),
        ),
        Err(err) => Html(pages::sign_in(Some(&err.to_string()))).into_response(),
    }
}

async fn sign_up_page() -> Html<String> {
    Html(pages::sign_up(None))
}

async fn sign_up_submit(
    State(gateway): State<Arc<Gateway>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match gateway.identity.sign_up(&form.email, &form.password) {
        Ok(signed_in) => redirect_with_cookie(
            gateway.gate.landing_path(),
            &session_cookie(signed_in.token()),
        ),
        Err(err) => Html(pages::sign_up(Some(&err.to_string()))).into_response(),
    }
}

async fn sign_out_submit(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Response {
    let token = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session_token_from_cookies);
    if let Some(token) = token {
        if let Err(err) = gateway.identity.sign_out(token) {
            log::warn!("sign-out failed: {err}");
        }
    }
    redirect_with_cookie("/", &clear_session_cookie())
}

async fn protected_page(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };

    let note_count = match gateway.notes.list_notes(principal.user_id()) {
        Ok(notes) => notes.len(),
        Err(err) => return store_error_response(err),
    };
    let display_name = gateway.identity.display_name(principal.user_id());
    Html(pages::protected(&principal, display_name.as_deref(), note_count)).into_response()
}

async fn profile_page(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Html<String> {
    match principal_from_headers(&gateway, &headers) {
        Some(principal) => {
            let display_name = gateway.identity.display_name(principal.user_id());
            Html(pages::profile(&principal, display_name.as_deref()))
        }
        None => Html(pages::profile_signed_out()),
    }
}

async fn profile_edit_page(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };
    let display_name = gateway.identity.display_name(principal.user_id());
    Html(pages::profile_edit(display_name.as_deref())).into_response()
}

async fn profile_edit_submit(
    State(gateway): State<Arc<Gateway>>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };

    match gateway
        .identity
        .set_display_name(principal.user_id(), &form.display_name)
    {
        Ok(()) => Redirect::to("/profile").into_response(),
        Err(err) => {
            log::warn!("profile update failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn notes_page(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };

    match gateway.notes.list_notes(principal.user_id()) {
        Ok(notes) => Html(pages::notes(&notes, None)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn note_create(
    State(gateway): State<Arc<Gateway>>,
    headers: HeaderMap,
    Form(form): Form<NoteForm>,
) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };

    let title = form.title.trim();
    let body = form.body.trim();
    if title.is_empty() || body.is_empty() {
        let notes = gateway
            .notes
            .list_notes(principal.user_id())
            .unwrap_or_default();
        return Html(pages::notes(&notes, Some("Title and content are required")))
            .into_response();
    }

    let result = gateway
        .notes
        .next_note_id(principal.user_id())
        .and_then(|note_id| {
            let note = Note::new(
                note_id,
                principal.user_id().clone(),
                title,
                body,
                now_millis(),
            );
            gateway.notes.insert_note(&note)
        });

    match result {
        Ok(()) => {
            gateway.workspace.lock().await.bump_notes_rev();
            Redirect::to("/notes").into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn note_update(
    State(gateway): State<Arc<Gateway>>,
    Path(note_id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<NoteForm>,
) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };

    let note_id = match NoteId::new(note_id) {
        Ok(note_id) => note_id,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match gateway.notes.update_note(
        principal.user_id(),
        &note_id,
        form.title.trim(),
        form.body.trim(),
    ) {
        Ok(_) => {
            gateway.workspace.lock().await.bump_notes_rev();
            Redirect::to("/notes").into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn note_delete(
    State(gateway): State<Arc<Gateway>>,
    Path(note_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let principal = match require_principal(&gateway, &headers) {
        Ok(principal) => principal,
        Err(redirect) => return redirect,
    };

    let note_id = match NoteId::new(note_id) {
        Ok(note_id) => note_id,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match gateway.notes.delete_note(principal.user_id(), &note_id) {
        Ok(()) => {
            gateway.workspace.lock().await.bump_notes_rev();
            Redirect::to("/notes").into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// Read-side snapshot of the terminal workspace's rubber-band selection.
/// Consumers poll this per render; the rectangle's geometry is zero when
/// inactive.
async fn selection_snapshot(State(gateway): State<Arc<Gateway>>) -> Json<serde_json::Value> {
    let workspace = gateway.workspace.lock().await;
    let selection = workspace.selection();
    let selected: Vec<String> = workspace
        .selected_note_ids()
        .iter()
        .map(ToString::to_string)
        .collect();

    Json(json!({
        "rev": workspace.rev(),
        "selection": {
            "active": selection.active(),
            "left": selection.left(),
            "top": selection.top(),
            "width": selection.width(),
            "height": selection.height(),
        },
        "selected_note_ids": selected,
    }))
}
