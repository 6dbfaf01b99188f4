// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    mode: ThemeMode,
}

impl TuiTheme {
    /// Reads `NAIAD_TUI_THEME` (`dark`/`light`); unset or empty falls back
    /// to the dark default.
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let mode = match env::var("NAIAD_TUI_THEME") {
            Ok(value) => match value.trim() {
                "" => ThemeMode::default(),
                "dark" => ThemeMode::Dark,
                "light" => ThemeMode::Light,
                other => {
                    return Err(ThemeError::InvalidEnv {
                        name: "NAIAD_TUI_THEME".to_owned(),
                        value: other.to_owned(),
                    });
                }
            },
            Err(env::VarError::NotPresent) => ThemeMode::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: "NAIAD_TUI_THEME".to_owned(),
                    value: "<non-unicode>".to_owned(),
                });
            }
        };
        Ok(Self { mode })
    }

    pub(crate) fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub(crate) fn toggle(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub(crate) fn base_style(&self) -> Style {
        match self.mode {
            ThemeMode::Dark => Style::default(),
            ThemeMode::Light => Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    pub(crate) fn panel_border_style(&self, selecting: bool) -> Style {
        if selecting {
            self.base_style().fg(Color::LightGreen)
        } else {
            self.base_style().fg(self.muted_color())
        }
    }

    pub(crate) fn selected_card_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn selection_overlay_style(&self) -> Style {
        match self.mode {
            ThemeMode::Dark => Style::default().bg(Color::DarkGray),
            ThemeMode::Light => Style::default().bg(Color::LightBlue),
        }
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }

    pub(crate) fn muted_color(&self) -> Color {
        match self.mode {
            ThemeMode::Dark => Color::DarkGray,
            ThemeMode::Light => Color::Gray,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
