//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_BG, C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all keys while open
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.visible = !self.visible;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (section, rows) in SECTIONS {
            lines.push(Line::from(Span::styled(
                format!(" {}", section),
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )));
            lines.extend(rows.iter().map(|&(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("   {:<22}", key), Style::default().fg(C_ACCENT)),
                    Span::styled(desc, Style::default().fg(C_SECONDARY)),
                ])
            }));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            " press ? or esc to close",
            Style::default().fg(C_MUTED),
        )));

        let popup = popup_area(area, 64, lines.len() as u16 + 2);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(C_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "search box",
        &[
            ("type", "search after a short pause"),
            ("enter", "search now"),
            ("esc", "clear text, then leave the box"),
            ("↓ / tab", "move to results"),
        ],
    ),
    (
        "browsing",
        &[
            ("↑ / ↓  or  j / k", "move selection"),
            ("pg up / pg dn", "jump 10 rows"),
            ("home / end  or  g / G", "jump first / last"),
            ("tab / shift-tab", "focus next / previous pane"),
            ("1 / 2 / 3", "focus search / results / trending"),
            ("/  or  i", "back to the search box"),
            ("enter (trending)", "search that term"),
            ("y", "copy the movie page link"),
            ("t", "reload trending searches"),
            ("L", "toggle log panel"),
            ("?", "toggle this help overlay"),
            ("q / Ctrl+C", "quit"),
        ],
    ),
];

/// `percent_x` wide, `height` rows tall, centered in `area`.
fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
