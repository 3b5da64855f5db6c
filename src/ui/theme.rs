//! Night-radio theme for tubetui
//!
//! Color palette and style helpers for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::app::NoticeLevel;
use crate::models::SessionState;

/// Color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0d0b14 (ink)
    pub const BACKGROUND: Color = Color::Rgb(0x0d, 0x0b, 0x14);

    /// Primary: #7df9ff (electric blue)
    pub const PRIMARY: Color = Color::Rgb(0x7d, 0xf9, 0xff);

    /// Secondary: #ff4fd8 (orchid)
    pub const SECONDARY: Color = Color::Rgb(0xff, 0x4f, 0xd8);

    /// Accent: #ffd166 (amber)
    pub const ACCENT: Color = Color::Rgb(0xff, 0xd1, 0x66);

    /// Highlight: #ff5c8a (rose)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0x5c, 0x8a);

    /// Text: #e6e1f0
    pub const TEXT: Color = Color::Rgb(0xe6, 0xe1, 0xf0);

    /// Dim: #6b6485
    pub const DIM: Color = Color::Rgb(0x6b, 0x64, 0x85);

    /// Success: #5cf28e
    pub const SUCCESS: Color = Color::Rgb(0x5c, 0xf2, 0x8e);

    /// Warning: #ffb347
    pub const WARNING: Color = Color::Rgb(0xff, 0xb3, 0x47);

    /// Error: #ff4d6d
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x6d);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panel background
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x17, 0x14, 0x22);

    /// Border color (dim blue)
    pub const BORDER: Color = Color::Rgb(0x3a, 0x7c, 0x8a);

    /// Border color when focused
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Uploader and other secondary labels
    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Progress gauge
    pub fn gauge() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .bg(Self::BACKGROUND_LIGHT)
    }

    /// Highlighted result row
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Search input text
    pub fn input() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Key in the key-binding footer
    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner style
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::ITALIC)
    }

    /// Color of the session state label
    pub fn state(state: SessionState) -> Style {
        match state {
            SessionState::Playing => Self::success(),
            SessionState::Paused => Self::warning(),
            SessionState::Loading => Self::loading(),
            SessionState::Errored => Self::error(),
            SessionState::Idle | SessionState::Stopped => Self::dimmed(),
        }
    }

    /// Border and text color of a notice toast
    pub fn notice(level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => Self::title(),
            NoticeLevel::Success => Self::success(),
            NoticeLevel::Warning => Self::warning(),
            NoticeLevel::Error => Self::error(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance per https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for large text (>= 3:1)
pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
