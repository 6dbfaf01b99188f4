// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rubber-band selection state machine.
//!
//! The engine turns raw pointer/keyboard events into a [`SelectionRect`]
//! value. It is rendering-agnostic: the host supplies an exclusion predicate
//! over its own pointer-target type (regions that own their pointer
//! interactions, e.g. an embedded console pane), and reads the rectangle
//! back each frame. Hit-testing against item bounds is a pure predicate,
//! polled by consumers per render rather than delivered via callbacks.
//!
//! Every event handler runs to completion before the next event is handled;
//! the host must serialize session-change notifications into the same event
//! stream as pointer events.

/// Screen-space bounds of a selectable item, in the same coordinate space as
/// the pointer events fed to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// The rubber-band rectangle owned by [`SelectionEngine`].
///
/// When `active` is false the geometry fields are all zero and consumers
/// must treat them as absent. `width` and `height` are never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRect {
    active: bool,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl SelectionRect {
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

/// Strict rectangle-overlap hit test.
///
/// True iff the rectangle is active and `bounds` overlaps it with non-zero
/// area on both axes. Pure; consumers poll this per render.
pub fn is_inside(bounds: Bounds, rect: SelectionRect) -> bool {
    rect.active
        && bounds.left < rect.left + rect.width
        && bounds.right > rect.left
        && bounds.top < rect.top + rect.height
        && bounds.bottom > rect.top
}

/// Interaction-state machine for drag-rectangle multi-select.
///
/// `T` is the host's pointer-target type; the exclusion predicate is
/// consulted live on every event, so excluded regions may appear and
/// disappear without any invalidation step. The engine starts with no
/// session present and ignores pointer-downs until told otherwise; the
/// host syncs it from its session watcher.
pub struct SelectionEngine<T> {
    exclusion: Box<dyn Fn(&T) -> bool + Send>,
    session_present: bool,
    anchor: Option<(i32, i32)>,
    rect: SelectionRect,
    selecting_mode: bool,
}

impl<T> SelectionEngine<T> {
    pub fn new(exclusion: impl Fn(&T) -> bool + Send + 'static) -> Self {
        Self {
            exclusion: Box::new(exclusion),
            session_present: false,
            anchor: None,
            rect: SelectionRect::default(),
            selecting_mode: false,
        }
    }

    pub fn rect(&self) -> SelectionRect {
        self.rect
    }

    /// The process-wide "selecting" presentation mode: raised while a drag
    /// is in progress, cleared on every exit path.
    pub fn selecting_mode(&self) -> bool {
        self.selecting_mode
    }

    pub fn session_present(&self) -> bool {
        self.session_present
    }

    pub fn pointer_down(&mut self, x: i32, y: i32, target: &T) {
        if !self.session_present {
            return;
        }
        if (self.exclusion)(target) {
            return;
        }

        self.anchor = Some((x, y));
        self.rect = SelectionRect {
            active: true,
            left: x,
            top: y,
            width: 0,
            height: 0,
        };
        self.selecting_mode = true;
    }

    pub fn pointer_move(&mut self, x: i32, y: i32, target: &T) {
        if !self.rect.active {
            return;
        }
        // Crossing an excluded region freezes growth for the duration of the
        // crossing; the gesture itself survives.
        if (self.exclusion)(target) {
            return;
        }
        let Some((anchor_x, anchor_y)) = self.anchor else {
            return;
        };

        self.rect = SelectionRect {
            active: true,
            left: anchor_x.min(x),
            top: anchor_y.min(y),
            width: (x - anchor_x).abs(),
            height: (y - anchor_y).abs(),
        };
    }

    pub fn pointer_up(&mut self) {
        self.clear();
    }

    /// Escape terminates the gesture exactly like a pointer-up, regardless
    /// of the current button state.
    pub fn escape(&mut self) {
        self.clear();
    }

    /// Feeds a session presence change into the engine. A loss of session
    /// mid-drag terminates the selection within the same event turn; no
    /// drag affordance exists for unauthenticated views.
    pub fn session_changed(&mut self, present: bool) {
        self.session_present = present;
        if !present {
            self.clear();
        }
    }

    fn clear(&mut self) {
        self.anchor = None;
        self.rect = SelectionRect::default();
        self.selecting_mode = false;
    }
}

impl<T> std::fmt::Debug for SelectionEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("session_present", &self.session_present)
            .field("anchor", &self.anchor)
            .field("rect", &self.rect)
            .field("selecting_mode", &self.selecting_mode)
            .finish_non_exhaustive()
    }
}
