//! SearchBar component: the movie search box.
//!
//! Every edit is forwarded as `QueryChanged`; the core decides when the text
//! becomes a committed query. Enter skips the wait.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{layout::Rect, Frame};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    widgets::{
        pane_chrome::pane_chrome,
        search_input::{SearchAction, SearchInput},
    },
};

pub struct SearchBar {
    input: SearchInput,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            input: SearchInput::new("Search through thousands of movies"),
        }
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::SearchBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Down {
            return vec![Action::FocusPane(ComponentId::MovieGrid)];
        }
        match self.input.handle_key(key) {
            SearchAction::Changed(text) => vec![Action::QueryChanged(text)],
            SearchAction::Submitted(text) => vec![Action::SubmitQuery(text)],
            SearchAction::Leave => vec![Action::FocusPane(ComponentId::MovieGrid)],
            SearchAction::None => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SearchTerm(term) => {
                self.input.set_value(term);
                vec![Action::SubmitQuery(term.clone())]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("search", Some('1'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.input.draw(frame, inner, focused);
    }
}
