//! Detail pane for the movie selected in the results list.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use reel_core::movie::Movie;

use crate::app_state::AppState;
use crate::theme::{
    C_ACCENT, C_LANG, C_MUTED, C_PRIMARY, C_RATING, C_SECONDARY, C_YEAR,
};
use crate::widgets::pane_chrome::pane_chrome;

pub fn draw(frame: &mut Frame, area: Rect, movie: Option<&Movie>, state: &AppState) {
    let block = pane_chrome("details", None, false, None);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(movie) = movie else {
        frame.render_widget(
            Paragraph::new(Span::styled("  nothing selected", Style::default().fg(C_MUTED))),
            inner,
        );
        return;
    };

    let poster = movie
        .poster_url(&state.tmdb)
        .unwrap_or_else(|| "no poster".to_string());
    let overview = movie
        .overview
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No overview available.");

    let lines = vec![
        Line::from(Span::styled(
            movie.title.as_str(),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("★ ", Style::default().fg(C_RATING)),
            Span::styled(movie.rating_label(), Style::default().fg(C_RATING)),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(movie.language_label(), Style::default().fg(C_LANG)),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(movie.year_label(), Style::default().fg(C_YEAR)),
        ]),
        Line::from(""),
        Line::from(Span::styled(overview, Style::default().fg(C_SECONDARY))),
        Line::from(""),
        Line::from(vec![
            Span::styled("poster ", Style::default().fg(C_MUTED)),
            Span::styled(poster, Style::default().fg(C_ACCENT)),
        ]),
        Line::from(vec![
            Span::styled("page   ", Style::default().fg(C_MUTED)),
            Span::styled(movie.page_url(), Style::default().fg(C_ACCENT)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
