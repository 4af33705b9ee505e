//! Color palette and style constants for the reel TUI.

use ratatui::style::{Color, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(3, 0, 20);
pub const C_ACCENT: Color = Color::Rgb(171, 139, 255);
pub const C_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MUTED: Color = Color::Rgb(80, 76, 110);
pub const C_SECONDARY: Color = Color::Rgb(168, 181, 219);
pub const C_PRIMARY: Color = Color::Rgb(226, 222, 245);
pub const C_SELECTION_BG: Color = Color::Rgb(24, 18, 52);
pub const C_PANEL_BORDER: Color = Color::Rgb(36, 30, 64);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(171, 139, 255);
pub const C_NUMBER_HINT: Color = Color::Rgb(100, 92, 140);
pub const C_INPUT_BG: Color = Color::Rgb(15, 13, 35);
pub const C_INPUT_FG: Color = Color::Rgb(255, 210, 120);
pub const C_RATING: Color = Color::Rgb(255, 210, 50);
pub const C_YEAR: Color = Color::Rgb(100, 160, 130);
pub const C_LANG: Color = Color::Rgb(80, 140, 200);
pub const C_TRENDING_RANK: Color = Color::Rgb(206, 206, 251);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_BROWSE: Color = Color::Rgb(168, 181, 219);
pub const C_MODE_SEARCH: Color = Color::Rgb(255, 210, 120);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
