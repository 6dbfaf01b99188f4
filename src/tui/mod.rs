// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal workspace.
//!
//! Provides the interactive notes workspace (ratatui + crossterm) with
//! mouse-driven rubber-band multi-select. The selection engine is fed from
//! the crossterm event stream; the session watcher's change notification is
//! polled in the same loop, so a sign-out arriving from the web surface is
//! just the next event handled and terminates a live drag in that turn.
//!
//! The embedded console pane owns its own pointer interactions and is the
//! workspace's exclusion zone: a drag may start outside it and cross it
//! without losing the gesture.

use std::{
    collections::BTreeSet,
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::sync::Mutex;

use crate::model::{Note, NoteId, SessionPrincipal, UserId};
use crate::select::{is_inside, Bounds, SelectionEngine, SelectionRect};
use crate::session::SessionWatcher;
use crate::store::NoteFolder;
use crate::ui::WorkspaceState;

mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "🅽 🅰 🅸 🅰 🅳 ";
const CONSOLE_LOG_LIMIT: usize = 64;

/// Runs the interactive notes workspace until the user quits.
pub fn run_with_workspace(
    watcher: SessionWatcher,
    notes_folder: NoteFolder,
    workspace: Option<Arc<Mutex<WorkspaceState>>>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(watcher, notes_folder, workspace)?;

    while !app.should_quit {
        app.drain_session_change();
        app.sync_notes_from_workspace();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        app.publish_selection_to_workspace();
    }

    Ok(())
}

/// Pointer target handed to the selection engine. Exclusion-zone
/// membership is computed live, per event, against the console pane's
/// current area; the engine only reads the flag through its predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointerHit {
    x: i32,
    y: i32,
    in_console: bool,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterMode {
    Inactive,
    Editing,
}

struct App {
    watcher: SessionWatcher,
    notes_folder: NoteFolder,
    workspace: Option<Arc<Mutex<WorkspaceState>>>,
    workspace_notes_rev: u64,
    principal: Option<SessionPrincipal>,
    notes: Vec<Note>,
    engine: SelectionEngine<PointerHit>,
    selected_note_ids: BTreeSet<NoteId>,
    note_bounds: Vec<(NoteId, Bounds)>,
    console_visible: bool,
    console_area: Option<Rect>,
    console_lines: Vec<String>,
    scroll: usize,
    filter_mode: FilterMode,
    filter_query: String,
    theme: TuiTheme,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(
        watcher: SessionWatcher,
        notes_folder: NoteFolder,
        workspace: Option<Arc<Mutex<WorkspaceState>>>,
    ) -> Result<Self, Box<dyn Error>> {
        let theme = TuiTheme::from_env()?;
        let principal = watcher.current();

        let mut app = Self {
            watcher,
            notes_folder,
            workspace,
            workspace_notes_rev: 0,
            principal,
            notes: Vec::new(),
            engine: SelectionEngine::new(|hit: &PointerHit| hit.in_console),
            selected_note_ids: BTreeSet::new(),
            note_bounds: Vec::new(),
            console_visible: false,
            console_area: None,
            console_lines: Vec::new(),
            scroll: 0,
            filter_mode: FilterMode::Inactive,
            filter_query: String::new(),
            theme,
            toast: None,
            should_quit: false,
        };

        app.engine.session_changed(app.principal.is_some());
        if let Some(principal) = app.principal.clone() {
            app.log_console(format!("session: {}", principal.email()));
        }
        app.reload_notes();
        Ok(app)
    }

    fn user_id(&self) -> Option<&UserId> {
        self.principal.as_ref().map(SessionPrincipal::user_id)
    }

    /// Serializes the watcher's change notification into this event turn.
    fn drain_session_change(&mut self) {
        let Some(change) = self.watcher.poll_change() else {
            return;
        };

        let present = change.is_some();
        self.engine.session_changed(present);
        self.principal = change;

        if present {
            let email = self
                .principal
                .as_ref()
                .map(SessionPrincipal::email)
                .unwrap_or_default()
                .to_owned();
            self.log_console(format!("session: signed in as {email}"));
            self.set_toast(format!("Signed in as {email}"));
            self.reload_notes();
        } else {
            self.selected_note_ids.clear();
            self.notes.clear();
            self.note_bounds.clear();
            self.scroll = 0;
            self.log_console("session: signed out".to_owned());
            self.set_toast("Signed out — workspace locked");
        }
    }

    /// Web-side note mutations bump the shared notes revision; pick them up.
    fn sync_notes_from_workspace(&mut self) {
        let Some(workspace) = self.workspace.as_ref() else {
            return;
        };

        let notes_rev = workspace.blocking_lock().notes_rev();
        if notes_rev != self.workspace_notes_rev {
            self.workspace_notes_rev = notes_rev;
            self.reload_notes();
        }
    }

    fn publish_selection_to_workspace(&self) {
        let Some(workspace) = self.workspace.as_ref() else {
            return;
        };

        workspace
            .blocking_lock()
            .set_selection(self.engine.rect(), self.selected_note_ids.clone());
    }

    fn reload_notes(&mut self) {
        let Some(user_id) = self.user_id().cloned() else {
            self.notes.clear();
            return;
        };

        match self.notes_folder.list_notes(&user_id) {
            Ok(notes) => {
                self.notes = notes;
                self.selected_note_ids
                    .retain(|id| self.notes.iter().any(|note| note.note_id() == id));
            }
            Err(err) => {
                log::warn!("reloading notes failed: {err}");
                self.set_toast(format!("Store error: {err}"));
            }
        }
    }

    /// Indices into `self.notes` in display order, honoring the filter.
    fn visible_note_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        if query.is_empty() {
            return (0..self.notes.len()).collect();
        }

        let mut scored: Vec<(i64, usize)> = self
            .notes
            .iter()
            .enumerate()
            .filter_map(|(idx, note)| {
                let haystack = format!("{} {}", note.title(), note.body());
                fuzzy_score(query, &haystack).map(|score| (score, idx))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, idx)| idx).collect()
    }

    fn pointer_hit(&self, column: u16, row: u16) -> PointerHit {
        let in_console = self
            .console_area
            .is_some_and(|area| area.contains(Position::new(column, row)));
        PointerHit {
            x: i32::from(column),
            y: i32::from(row),
            in_console,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let hit = self.pointer_hit(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.engine.pointer_down(hit.x, hit.y, &hit);
                if self.engine.rect().active() {
                    self.selected_note_ids.clear();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.engine.pointer_move(hit.x, hit.y, &hit);
                self.refresh_selection_from_rect();
            }
            MouseEventKind::Up(MouseButton::Left) => {
                // The rectangle resets; the ids it last covered stay
                // committed until Escape, session loss, or the next drag.
                let committed = self.selected_note_ids.len();
                self.engine.pointer_up();
                if committed > 0 {
                    self.set_toast(format!("{committed} selected — D deletes"));
                }
            }
            _ => {}
        }
    }

    fn refresh_selection_from_rect(&mut self) {
        let rect = self.engine.rect();
        self.selected_note_ids = self
            .note_bounds
            .iter()
            .filter(|(_, bounds)| is_inside(*bounds, rect))
            .map(|(note_id, _)| note_id.clone())
            .collect();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.filter_mode == FilterMode::Editing {
            match key.code {
                KeyCode::Esc => {
                    self.filter_mode = FilterMode::Inactive;
                    self.filter_query.clear();
                }
                KeyCode::Enter => {
                    self.filter_mode = FilterMode::Inactive;
                }
                KeyCode::Backspace => {
                    self.filter_query.pop();
                }
                KeyCode::Char(ch) => {
                    self.filter_query.push(ch);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.engine.escape();
                self.selected_note_ids.clear();
            }
            KeyCode::Char('`') => {
                self.console_visible = !self.console_visible;
                if !self.console_visible {
                    self.console_area = None;
                }
            }
            KeyCode::Char('t') => {
                self.theme.toggle();
                self.set_toast(format!("Theme: {}", self.theme.mode().label()));
            }
            KeyCode::Char('n') => {
                self.quick_add_note();
            }
            KeyCode::Char('D') => {
                self.delete_selected_notes();
            }
            KeyCode::Char('r') => {
                self.reload_notes();
                self.set_toast("Notes reloaded");
            }
            KeyCode::Char('/') => {
                self.filter_mode = FilterMode::Editing;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn quick_add_note(&mut self) {
        let Some(user_id) = self.user_id().cloned() else {
            self.set_toast("Sign in via the web surface first");
            return;
        };

        let result = self.notes_folder.next_note_id(&user_id).and_then(|note_id| {
            let title = format!("Quick note {}", note_id.as_str());
            let note = Note::new(note_id, user_id.clone(), title, "", now_millis());
            self.notes_folder.insert_note(&note)
        });

        match result {
            Ok(()) => {
                self.log_console("notes: quick note added".to_owned());
                self.set_toast("Note added");
                self.reload_notes();
            }
            Err(err) => self.set_toast(format!("Store error: {err}")),
        }
    }

    fn delete_selected_notes(&mut self) {
        if self.selected_note_ids.is_empty() {
            self.set_toast("Nothing selected — drag over notes first");
            return;
        }
        let Some(user_id) = self.user_id().cloned() else {
            return;
        };

        match self
            .notes_folder
            .delete_notes(&user_id, &self.selected_note_ids)
        {
            Ok(removed) => {
                self.log_console(format!("notes: deleted {removed} selected"));
                self.set_toast(format!("Deleted {removed} note{}", plural(removed)));
                self.selected_note_ids.clear();
                self.reload_notes();
            }
            Err(err) => self.set_toast(format!("Store error: {err}")),
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(2),
        });
    }

    fn log_console(&mut self, line: String) {
        self.console_lines.push(line);
        if self.console_lines.len() > CONSOLE_LOG_LIMIT {
            let excess = self.console_lines.len() - CONSOLE_LOG_LIMIT;
            self.console_lines.drain(..excess);
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

fn note_line(note: &Note, width: usize) -> String {
    let mut line = note.title().to_owned();
    if !note.body().is_empty() {
        line.push_str(" — ");
        line.push_str(note.body());
    }

    let mut truncated: String = line.chars().take(width.saturating_sub(1)).collect();
    if truncated.chars().count() < line.chars().count() {
        truncated.push('…');
    }
    truncated
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    frame.render_widget(
        Block::default().style(app.theme.base_style()),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let (notes_area, console_area) = if app.console_visible {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_area);
        (panes[0], Some(panes[1]))
    } else {
        (main_area, None)
    };
    app.console_area = console_area;

    draw_notes_pane(frame, app, notes_area);
    if let Some(console_area) = console_area {
        draw_console_pane(frame, app, console_area);
    }

    render_selection_overlay(
        frame,
        notes_area,
        app.engine.rect(),
        app.theme.selection_overlay_style(),
    );

    let toast_suffix = match &app.toast {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        _ => String::new(),
    };
    let status = Paragraph::new(footer_line(app, &toast_suffix));
    frame.render_widget(status, status_area);
    let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
    frame.render_widget(brand, status_area);
}

fn draw_notes_pane(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let selecting = app.engine.selecting_mode();
    let count = app.notes.len();
    let title = format!("─ Notes [{count}] ");
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(app.theme.panel_border_style(selecting));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.note_bounds.clear();

    let Some(principal) = app.principal.clone() else {
        let locked = Paragraph::new(
            "Workspace locked.\n\nSign in on the web surface to load your notes.",
        )
        .style(app.theme.error_style())
        .wrap(Wrap { trim: true });
        frame.render_widget(locked, inner);
        return;
    };

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let visible = app.visible_note_indices();
    let max_rows = inner.height as usize;
    let scroll = app.scroll.min(visible.len().saturating_sub(1));
    app.scroll = scroll;

    let mut lines = Vec::<Line<'static>>::new();
    for (row, note_idx) in visible.iter().skip(scroll).take(max_rows).enumerate() {
        let note = &app.notes[*note_idx];
        let top = inner.y as i32 + row as i32;
        app.note_bounds.push((
            note.note_id().clone(),
            Bounds::new(
                inner.x as i32,
                top,
                inner.x as i32 + inner.width as i32,
                top + 1,
            ),
        ));

        let text = note_line(note, inner.width as usize);
        let style = if app.selected_note_ids.contains(note.note_id()) {
            app.theme.selected_card_style()
        } else {
            app.theme.base_style()
        };
        lines.push(Line::styled(text, style));
    }

    if lines.is_empty() {
        let empty = if app.filter_query.trim().is_empty() {
            format!("No notes yet for {} — press n to add one.", principal.email())
        } else {
            format!("No notes match '{}'.", app.filter_query.trim())
        };
        lines.push(Line::styled(
            empty,
            app.theme.base_style().fg(app.theme.muted_color()),
        ));
    }

    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn draw_console_pane(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Console ")
        .border_style(app.theme.panel_border_style(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible_rows = inner.height as usize;
    let start = app.console_lines.len().saturating_sub(visible_rows);
    let lines: Vec<Line<'static>> = app.console_lines[start..]
        .iter()
        .map(|line| {
            Line::styled(
                line.clone(),
                app.theme.base_style().fg(app.theme.muted_color()),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

/// Paints the rubber-band rectangle over the notes pane. Pure presentation:
/// geometry comes from the engine, cells are restyled in place.
fn render_selection_overlay(frame: &mut Frame<'_>, area: Rect, rect: SelectionRect, style: Style) {
    if !rect.active() {
        return;
    }

    let left = rect.left().max(area.x as i32);
    let top = rect.top().max(area.y as i32);
    let right = (rect.left() + rect.width()).min(area.x as i32 + area.width as i32 - 1);
    let bottom = (rect.top() + rect.height()).min(area.y as i32 + area.height as i32 - 1);
    if left > right || top > bottom {
        return;
    }

    let buffer = frame.buffer_mut();
    for y in top..=bottom {
        for x in left..=right {
            buffer
                .get_mut(x as u16, y as u16)
                .set_style(style);
        }
    }
}

fn footer_line(app: &App, toast_suffix: &str) -> Line<'static> {
    if app.filter_mode == FilterMode::Editing {
        return filter_footer_line(app);
    }

    let mut spans = Vec::<Span<'static>>::new();
    if app.principal.is_none() {
        push_footer_entry(&mut spans, "LOCKED", "sign in on the web surface");
        push_footer_entry(&mut spans, "QUIT", "q");
    } else {
        let console = if app.console_visible { "`◼ " } else { "`◻ " };
        push_footer_entry(&mut spans, "SELECT", "drag");
        push_footer_entry(&mut spans, "DELETE", "D");
        push_footer_entry(&mut spans, "NEW", "n");
        push_footer_entry(&mut spans, "FILTER", "/");
        push_footer_entry(&mut spans, "CONSOLE", console);
        push_footer_entry(&mut spans, "THEME", "t");
        push_footer_entry(&mut spans, "QUIT", "q");
    }

    let toast_message = toast_suffix.strip_prefix(" | ").unwrap_or(toast_suffix).trim();
    if !toast_message.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::styled(
            "Toast:".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
        spans.push(Span::raw(toast_message.to_owned()));
    }

    Line::from(spans)
}

fn filter_footer_line(app: &App) -> Line<'static> {
    let matches = app.visible_note_indices().len();
    Line::from(vec![
        Span::styled(
            "/".to_owned(),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw(app.filter_query.clone()),
        Span::styled(
            format!("  ({matches} match{})", if matches == 1 { "" } else { "es" }),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ),
        Span::styled(
            "  Enter keeps, Esc clears".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ),
    ])
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_brand_line() -> Line<'static> {
    Line::from(Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    ))
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }

    let needle_lower = needle.to_lowercase();
    let haystack_lower = haystack.to_lowercase();

    let subseq = subsequence_stats(&needle_lower, &haystack_lower)?;
    let ratio = rapidfuzz::fuzz::ratio(needle_lower.chars(), haystack_lower.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack_lower.contains(&needle_lower) {
        score += 2000;
    } else {
        score += 500;
    }

    Some(score)
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last: usize = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive: usize = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();

            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }

            if let Some(prev) = prev_match {
                if idx == prev + 1 {
                    consecutive += 1;
                }
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | ':' | '-' | '_' | ' ')
}

/// Seed notes for `--demo` mode.
pub fn demo_notes(user_id: &UserId) -> Vec<Note> {
    let mut notes = Vec::new();
    let specs: [(&str, &str, &str); 4] = [
        ("n:0001", "Welcome to naiad", "Drag across this list to multi-select."),
        ("n:0002", "Exclusion zones", "Open the console with ` — drags inside it are its own."),
        ("n:0003", "Escape hatch", "Esc cancels a drag mid-gesture."),
        ("n:0004", "Web surface", "The same notes are editable at /notes."),
    ];
    for (offset, (raw_id, title, body)) in specs.into_iter().enumerate() {
        let note_id = NoteId::new(raw_id).expect("hard-coded demo note id is valid");
        notes.push(Note::new(
            note_id,
            user_id.clone(),
            title,
            body,
            now_millis().saturating_sub(60_000 * (specs.len() - offset) as u64),
        ));
    }
    notes
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
