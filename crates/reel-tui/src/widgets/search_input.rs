//! SearchInput: wraps tui-input as the always-visible movie search box.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, PartialEq)]
pub enum SearchAction {
    /// The text is different from before this key.
    Changed(String),
    /// Enter: commit the current text now.
    Submitted(String),
    /// Esc on an already empty box.
    Leave,
    None,
}

pub struct SearchInput {
    input: Input,
    placeholder: String,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Esc clears a non-empty box (reported as a change), and asks to leave
    /// the box when it is already empty. Cursor movement is not a change.
    pub fn handle_key(&mut self, key: KeyEvent) -> SearchAction {
        match key.code {
            KeyCode::Esc => {
                if self.input.value().is_empty() {
                    SearchAction::Leave
                } else {
                    self.input = Input::default();
                    SearchAction::Changed(String::new())
                }
            }
            KeyCode::Enter => SearchAction::Submitted(self.input.value().to_string()),
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != before {
                    SearchAction::Changed(self.input.value().to_string())
                } else {
                    SearchAction::None
                }
            }
        }
    }

    /// Render the search line into `area`, placing the cursor when `active`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, active: bool) {
        const PROMPT: &str = "⌕ ";
        let prompt_w = PROMPT.width() as u16;
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(prompt_w + 1) as usize);
        let value = self.input.value();

        let text = if value.is_empty() {
            Span::styled(self.placeholder.clone(), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(visible, Style::default().fg(C_INPUT_FG))
        };

        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(C_SECONDARY)),
            text,
        ]))
        .style(Style::default().bg(C_INPUT_BG));
        frame.render_widget(paragraph, area);

        if active && area.width > 0 {
            let cursor_x = area.x + prompt_w + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}
