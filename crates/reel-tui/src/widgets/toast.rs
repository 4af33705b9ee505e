//! Toast notification system: transient status messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

/// Braille spinner, also used for the loading state of the results pane.
pub const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Info => C_TOAST_INFO,
            Self::Success => C_TOAST_SUCCESS,
            Self::Warning => C_TOAST_WARNING,
            Self::Error => C_TOAST_ERROR,
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning, Duration::from_secs(6));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Remove expired toasts. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Render the newest toasts stacked in the bottom-right corner of `area`,
    /// just above the status bar row.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let shown: Vec<&Toast> = self.toasts.iter().rev().take(self.max_visible).collect();
        if shown.is_empty() || area.height < 2 {
            return;
        }
        let widest = shown
            .iter()
            .map(|t| t.message.chars().count() as u16 + 4)
            .max()
            .unwrap_or(0);
        let width = widest.min(area.width.saturating_sub(2)).min(60);
        let height = (shown.len() as u16).min(area.height - 1);
        let popup = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + area.height - 1 - height,
            width,
            height,
        };

        // Oldest on top, newest right above the status bar.
        let lines: Vec<Line> = shown
            .iter()
            .rev()
            .map(|t| {
                Line::from(Span::styled(
                    format!(" {} {} ", t.severity.icon(), t.message),
                    Style::default()
                        .fg(t.severity.color())
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines), popup);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
