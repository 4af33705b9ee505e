//! Header: app title, tagline and the latest core message.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY};

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            " reel ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Find ", Style::default().fg(C_PRIMARY)),
        Span::styled(
            "Movies",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " You'll Enjoy Without the Hassle",
            Style::default().fg(C_PRIMARY),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let status = match state.last_log() {
        Some(msg) => Span::styled(format!(" {}", msg), Style::default().fg(C_SECONDARY)),
        None => Span::styled(" ready", Style::default().fg(C_MUTED)),
    };
    frame.render_widget(Paragraph::new(Line::from(status)), rows[1]);
}
