//! Status bar: bottom line with input mode, key hints, and service info.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_BROWSE, C_MODE_SEARCH, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    /// Keys go to the search box.
    Search,
    /// Keys navigate lists and trigger shortcuts.
    Browse,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Browse => "BROWSE",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Search => C_MODE_SEARCH,
            Self::Browse => C_MODE_BROWSE,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Search => " type to search  Enter search now  Esc clear/leave  ↓/Tab results  Ctrl+C quit",
            Self::Browse => " ↑↓/jk select  y copy link  t trending  / search  Tab panes  L logs  ? help  q quit",
        }
    }
}

/// Draw the keybindings footer (one row) with `right` text on the far side.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, right: &str) {
    let right_w = (right.chars().count() as u16 + 1).min(area.width / 2);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_w)])
        .split(area);

    let left = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(left), cols[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(right, Style::default().fg(C_SECONDARY))).alignment(Alignment::Right),
        cols[1],
    );
}
