//! MovieGrid component: the results pane.
//!
//! Shows exactly one of: spinner while loading, the catalog's error message,
//! or the movie list.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use reel_core::movie::Movie;
use reel_core::state::LoadState;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_ACCENT, C_ERROR, C_LANG, C_MUTED, C_PRIMARY, C_RATING, C_SECONDARY, C_SELECTION_BG,
        C_YEAR,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        toast::SPINNER_FRAMES,
    },
};

pub struct MovieGrid {
    pub list: ScrollableList<Movie>,
    list_state: ListState,
}

impl MovieGrid {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            list_state: ListState::default(),
        }
    }

    /// Take a new result list. Selection is kept when the same movies come
    /// back (a repeated search), and reset otherwise.
    pub fn sync_movies(&mut self, movies: &[Movie]) {
        let same = self.list.len() == movies.len()
            && self.list.items.iter().zip(movies).all(|(a, b)| a.id == b.id);
        if !same {
            self.list.set_items(movies.to_vec());
        }
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.list.selected_item()
    }

    fn title(state: &AppState) -> String {
        match state.discovery.committed_query.as_deref() {
            None | Some("") => "all movies".to_string(),
            Some(q) => format!("results · {}", q),
        }
    }

    fn render_item<'a>(movie: &'a Movie, is_selected: bool) -> ListItem<'a> {
        let title_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let marker = if is_selected { "▸ " } else { "  " };
        let spans = vec![
            Span::styled(marker, Style::default().fg(C_ACCENT)),
            Span::styled(movie.title.as_str(), title_style),
            Span::raw("  "),
            Span::styled("★ ", Style::default().fg(C_RATING)),
            Span::styled(movie.rating_label(), Style::default().fg(C_RATING)),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(movie.language_label(), Style::default().fg(C_LANG)),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(movie.year_label(), Style::default().fg(C_YEAR)),
        ];
        let item = ListItem::new(Line::from(spans));
        if is_selected {
            item.style(Style::default().bg(C_SELECTION_BG))
        } else {
            item
        }
    }
}

impl Component for MovieGrid {
    fn id(&self) -> ComponentId {
        ComponentId::MovieGrid
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.list.selected == 0 {
                    return vec![Action::FocusPane(ComponentId::SearchBar)];
                }
                self.list.select_up(step);
            }
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Char('y') => {
                if let Some(movie) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(movie.page_url())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let rel_row = event.row.saturating_sub(area.y + 1) as usize;
                self.list.handle_click(rel_row);
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let title = Self::title(state);
        let badge = match &state.discovery.load {
            LoadState::Ready(movies) if !movies.is_empty() => Some(Badge {
                text: movies.len().to_string(),
                color: C_SECONDARY,
            }),
            _ => None,
        };
        let block = pane_chrome(&title, Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &state.discovery.load {
            LoadState::Loading => {
                let icon = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
                frame.render_widget(
                    Paragraph::new(Line::from(vec![
                        Span::styled(format!("  {} ", icon), Style::default().fg(C_ACCENT)),
                        Span::styled("loading…", Style::default().fg(C_SECONDARY)),
                    ])),
                    inner,
                );
            }
            LoadState::Error(msg) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  {}", msg),
                        Style::default().fg(C_ERROR),
                    ))
                    .wrap(Wrap { trim: false }),
                    inner,
                );
            }
            LoadState::Ready(movies) if movies.is_empty() => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        "  no movies found",
                        Style::default().fg(C_MUTED),
                    )),
                    inner,
                );
            }
            LoadState::Ready(_) => {
                let height = inner.height as usize;
                self.list.ensure_visible(height);
                let sel_in_view = self.list.selected_in_view(height);
                let items: Vec<ListItem> = self
                    .list
                    .visible_items(height)
                    .iter()
                    .enumerate()
                    .map(|(row, movie)| Self::render_item(movie, row == sel_in_view))
                    .collect();
                self.list_state.select(Some(sel_in_view));
                frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
            }
        }
    }
}
