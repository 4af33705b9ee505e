//! LogPanel component: tail of reel.log, toggled with `L`.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_SECONDARY},
    widgets::pane_chrome::pane_chrome,
};

pub struct LogPanel {
    pub visible: bool,
    scroll: usize,
    /// Stick to the newest line until the user scrolls up.
    follow: bool,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            visible: false,
            scroll: 0,
            follow: true,
        }
    }

    fn scroll_up(&mut self, n: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(n);
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_add(n);
    }
}

impl Component for LogPanel {
    fn id(&self) -> ComponentId {
        ComponentId::LogPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_up(usize::MAX),
            KeyCode::End | KeyCode::Char('G') => self.follow = true,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_up(1),
            MouseEventKind::ScrollDown => self.scroll_down(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleLogs = action {
            self.visible = !self.visible;
            if self.visible {
                self.follow = true;
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);
        let title = format!("log · {}", state.log_path.display());
        let block = pane_chrome(&title, None, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let logs = &state.log_lines;
        if logs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no log entries yet",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let max_scroll = logs.len().saturating_sub(height);
        if self.follow || self.scroll >= max_scroll {
            self.scroll = max_scroll;
            self.follow = true;
        }

        let lines: Vec<Line> = logs
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|msg| {
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(compact_log_line(msg), Style::default().fg(C_SECONDARY)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ── Log line formatting ───────────────────────────────────────────────────────

const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// `2026-10-19T09:12:03.51Z  INFO reel_core::core: text` becomes
/// `09:12:03 INFO text` (local time). Unrecognised lines pass through trimmed.
fn compact_log_line(raw: &str) -> String {
    let line = raw.trim();

    let (time, line) = match line.split_once(' ') {
        Some((first, rest)) => match chrono::DateTime::parse_from_rfc3339(first) {
            Ok(ts) => (
                Some(ts.with_timezone(&chrono::Local).format("%H:%M:%S").to_string()),
                rest.trim_start(),
            ),
            Err(_) => (None, line),
        },
        None => (None, line),
    };

    let (level, line) = match line.split_once(' ') {
        Some((first, rest)) if LEVELS.contains(&first) => (Some(first), rest.trim_start()),
        _ => (None, line),
    };

    let message = match line.split_once(": ") {
        Some((target, msg)) if is_target(target) => msg,
        _ => line,
    };

    [time.as_deref(), level, Some(message)]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A tracing target such as `reel_core::trending::file`.
fn is_target(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 48
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
