//! TrendingStrip component: horizontal strip of the most-searched terms.
//!
//! Hidden entirely when there are no records.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use reel_core::trending::TrendingRecord;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_TRENDING_RANK},
    widgets::{pane_chrome::pane_chrome, scrollable_list::ScrollableList},
};

pub struct TrendingStrip {
    pub list: ScrollableList<TrendingRecord>,
    /// Column spans of the last drawn cells, for mouse hits.
    cells: Vec<(u16, u16)>,
}

impl TrendingStrip {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            cells: Vec::new(),
        }
    }

    /// Replace the records only when they differ, so a refresh that returns
    /// the same list keeps the selection.
    pub fn sync_records(&mut self, records: &[TrendingRecord]) {
        if self.list.items.as_slice() != records {
            self.list.set_items(records.to_vec());
        }
    }

    fn label(record: &TrendingRecord) -> &str {
        if record.title.is_empty() {
            &record.search_term
        } else {
            &record.title
        }
    }
}

impl Component for TrendingStrip {
    fn id(&self) -> ComponentId {
        ComponentId::Trending
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_up(1)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_down(1)
            }
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => {
                if let Some(record) = self.list.selected_item() {
                    return vec![
                        Action::SearchTerm(record.search_term.clone()),
                        Action::FocusPane(ComponentId::MovieGrid),
                    ];
                }
            }
            KeyCode::Char('y') => {
                if let Some(record) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(record.page_url())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .cells
                    .iter()
                    .position(|&(start, end)| event.column >= start && event.column < end);
                if let Some(idx) = hit {
                    self.list.selected = idx;
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        if self.list.is_empty() || area.height == 0 {
            return;
        }
        let block = pane_chrome("trending", Some('3'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut spans = Vec::new();
        self.cells.clear();
        let mut col = inner.x;
        for (idx, record) in self.list.items.iter().enumerate() {
            let selected = idx == self.list.selected;
            let bg = if selected && focused {
                Style::default().bg(C_SELECTION_BG)
            } else {
                Style::default()
            };
            let title_style = if selected {
                bg.fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                bg.fg(C_SECONDARY)
            };
            let rank = format!(" {} ", idx + 1);
            let title = Self::label(record).to_string();
            let count = format!(" ×{} ", record.count);
            let width = (rank.chars().count() + title.chars().count() + count.chars().count()) as u16;
            self.cells.push((col, col + width));
            col += width + 2;

            spans.push(Span::styled(
                rank,
                bg.fg(C_TRENDING_RANK).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(title, title_style));
            spans.push(Span::styled(count, bg.fg(C_MUTED)));
            spans.push(Span::raw("  "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}
