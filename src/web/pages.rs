// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Server-side page assembly for the web surface.
///
/// Plain string templates, escaped at every interpolation point. Styling is
/// a single embedded sheet; presentation niceties are out of scope.
use chrono::DateTime;

use crate::model::{Note, SessionPrincipal};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;color:#1a202c}\
nav{display:flex;gap:1rem;align-items:center;border-bottom:1px solid #e2e8f0;padding-bottom:.75rem;margin-bottom:1.5rem}\
nav .spacer{flex:1}\
a{color:#2b6cb0;text-decoration:none}\
form.inline{display:inline}\
input,textarea{display:block;width:100%;margin:.25rem 0 .75rem;padding:.4rem;border:1px solid #cbd5e0;border-radius:4px}\
button{padding:.4rem .9rem;border:1px solid #2b6cb0;border-radius:4px;background:#2b6cb0;color:#fff;cursor:pointer}\
button.subtle{background:#fff;color:#2b6cb0}\
.card{border:1px solid #e2e8f0;border-radius:6px;padding:1rem;margin-bottom:1rem}\
.error{color:#c53030;margin-bottom:1rem}\
.muted{color:#718096;font-size:.85rem}";

pub(crate) fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn format_created_at(millis: u64) -> String {
    let millis = i64::try_from(millis).unwrap_or(i64::MAX);
    match DateTime::from_timestamp_millis(millis) {
        Some(when) => when.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown".to_owned(),
    }
}

fn layout(title: &str, signed_in: bool, body: &str) -> String {
    let session_nav = if signed_in {
        "<a href=\"/notes\">Notes</a><a href=\"/profile\">Profile</a><span class=\"spacer\"></span>\
         <form class=\"inline\" method=\"post\" action=\"/sign-out\"><button class=\"subtle\">Sign out</button></form>"
            .to_owned()
    } else {
        "<span class=\"spacer\"></span><a href=\"/sign-in\">Sign in</a><a href=\"/sign-up\">Sign up</a>"
            .to_owned()
    };

    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} — naiad</title><style>{STYLE}</style></head>\
         <body><nav><a href=\"/\"><strong>naiad</strong></a>{session_nav}</nav>{body}</body></html>",
        title = html_escape(title),
    )
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("<p class=\"error\">{}</p>", html_escape(message)),
        None => String::new(),
    }
}

pub(crate) fn landing(signed_in: bool) -> String {
    let cta = if signed_in {
        "<p><a href=\"/notes\">Open your notes</a>.</p>"
    } else {
        "<p><a href=\"/sign-in\">Sign in</a> or <a href=\"/sign-up\">create an account</a> to start taking notes.</p>"
    };
    layout(
        "Home",
        signed_in,
        &format!(
            "<h1>naiad</h1>\
             <p>Short notes, scoped to your account. Multi-select them in the \
             terminal workspace with a drag rectangle.</p>{cta}"
        ),
    )
}

pub(crate) fn sign_in(error: Option<&str>) -> String {
    layout(
        "Sign in",
        false,
        &format!(
            "<h1>Sign in</h1>{}\
             <form method=\"post\" action=\"/sign-in\">\
             <label>Email<input type=\"email\" name=\"email\" required></label>\
             <label>Password<input type=\"password\" name=\"password\" required></label>\
             <button>Sign in</button></form>\
             <p class=\"muted\">No account? <a href=\"/sign-up\">Sign up</a>.</p>",
            error_block(error),
        ),
    )
}

pub(crate) fn sign_up(error: Option<&str>) -> String {
    layout(
        "Sign up",
        false,
        &format!(
            "<h1>Sign up</h1>{}\
             <form method=\"post\" action=\"/sign-up\">\
             <label>Email<input type=\"email\" name=\"email\" required></label>\
             <label>Password<input type=\"password\" name=\"password\" required></label>\
             <button>Create account</button></form>\
             <p class=\"muted\">Already registered? <a href=\"/sign-in\">Sign in</a>.</p>",
            error_block(error),
        ),
    )
}

pub(crate) fn protected(
    principal: &SessionPrincipal,
    display_name: Option<&str>,
    note_count: usize,
) -> String {
    let who = display_name.unwrap_or_else(|| principal.email());
    layout(
        "Workspace",
        true,
        &format!(
            "<h1>Welcome back, {}</h1>\
             <p>You have {note_count} note{}.</p>\
             <p><a href=\"/notes\">Go to your notes</a> · <a href=\"/profile\">Your profile</a></p>",
            html_escape(who),
            if note_count == 1 { "" } else { "s" },
        ),
    )
}

pub(crate) fn profile(principal: &SessionPrincipal, display_name: Option<&str>) -> String {
    let name_row = match display_name {
        Some(name) => format!("<p>Display name: {}</p>", html_escape(name)),
        None => "<p class=\"muted\">No display name set.</p>".to_owned(),
    };
    layout(
        "Profile",
        true,
        &format!(
            "<h1>Profile</h1>\
             <div class=\"card\"><p>Email: {}</p>{name_row}\
             <p><a href=\"/profile/edit\">Edit profile</a></p></div>",
            html_escape(principal.email()),
        ),
    )
}

pub(crate) fn profile_signed_out() -> String {
    layout(
        "Profile",
        false,
        "<h1>Profile</h1><p><a href=\"/sign-in\">Sign in</a> to view your profile.</p>",
    )
}

pub(crate) fn profile_edit(display_name: Option<&str>) -> String {
    layout(
        "Edit profile",
        true,
        &format!(
            "<h1>Edit profile</h1>\
             <form method=\"post\" action=\"/profile/edit\">\
             <label>Display name<input type=\"text\" name=\"display_name\" value=\"{}\"></label>\
             <button>Save</button></form>\
             <p class=\"muted\">Leave blank to clear it.</p>",
            html_escape(display_name.unwrap_or("")),
        ),
    )
}

fn note_card(note: &Note) -> String {
    let note_id = html_escape(note.note_id().as_str());
    format!(
        "<div class=\"card\"><h3>{title}</h3><p>{body}</p>\
         <p class=\"muted\">Created {created}</p>\
         <details><summary>Edit</summary>\
         <form method=\"post\" action=\"/notes/{note_id}\">\
         <label>Title<input type=\"text\" name=\"title\" value=\"{title}\" required></label>\
         <label>Content<textarea name=\"body\" required>{body}</textarea></label>\
         <button>Save</button></form></details>\
         <form class=\"inline\" method=\"post\" action=\"/notes/{note_id}/delete\">\
         <button class=\"subtle\">Delete</button></form></div>",
        title = html_escape(note.title()),
        body = html_escape(note.body()),
        created = format_created_at(note.created_at_millis()),
    )
}

pub(crate) fn notes(notes: &[Note], error: Option<&str>) -> String {
    let cards = if notes.is_empty() {
        "<p class=\"muted\">No notes yet.</p>".to_owned()
    } else {
        notes.iter().map(note_card).collect::<String>()
    };

    layout(
        "My Notes",
        true,
        &format!(
            "<h1>My Notes</h1>{}\
             <form method=\"post\" action=\"/notes\">\
             <label>Title<input type=\"text\" name=\"title\" placeholder=\"Note title...\" required></label>\
             <label>Content<textarea name=\"body\" placeholder=\"Note content...\" required></textarea></label>\
             <button>Add Note</button></form>{cards}",
            error_block(error),
        ),
    )
}
