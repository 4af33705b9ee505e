//! App: component-based terminal event loop.
//!
//! - `App` owns every component and the `AppState` they read from.
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks
//!   (terminal input, core broadcasts).
//! - Components return `Vec<Action>`; the App dispatches each one.
//! - Search input flows out to the `DiscoveryCore` as `DiscoveryEvent`s.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use reel_core::config::TmdbConfig;
use reel_core::core::{BroadcastMessage, DiscoveryEvent};
use reel_core::state::{DiscoveryState, StateManager};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        header, help_overlay::HelpOverlay, log_panel::LogPanel, movie_detail,
        movie_grid::MovieGrid, search_bar::SearchBar, trending_strip::TrendingStrip,
    },
    focus::FocusRing,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::{ToastManager, SPINNER_FRAMES},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    StateUpdated(DiscoveryState),
    Log(String),
}

/// Screen rectangles from the last frame, for mouse hit-testing.
#[derive(Default)]
struct PaneAreas {
    search: Rect,
    trending: Rect,
    grid: Rect,
    log: Rect,
}

const MAX_SESSION_LOGS: usize = 200;
const MAX_LOG_TAIL: usize = 500;

pub struct App {
    state: AppState,
    state_manager: Arc<StateManager>,
    event_tx: mpsc::Sender<DiscoveryEvent>,

    focus: FocusRing,
    search_bar: SearchBar,
    movie_grid: MovieGrid,
    trending: TrendingStrip,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(
        tmdb: TmdbConfig,
        log_path: PathBuf,
        http_addr: Option<String>,
        trending_backend: &'static str,
        event_tx: mpsc::Sender<DiscoveryEvent>,
        state_manager: Arc<StateManager>,
    ) -> Self {
        let mut app = Self {
            state: AppState::new(tmdb, log_path, http_addr, trending_backend),
            state_manager,
            event_tx,
            focus: FocusRing::default(),
            search_bar: SearchBar::new(),
            movie_grid: MovieGrid::new(),
            trending: TrendingStrip::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            areas: PaneAreas::default(),
            should_quit: false,
        };
        app.sync_focus_ring();
        app
    }

    /// Show a warning toast once the UI is up.
    pub fn warn_on_start(&mut self, msg: impl Into<String>) {
        self.toast.warning(msg);
    }

    pub async fn run(
        mut self,
        mut broadcast_rx: broadcast::Receiver<BroadcastMessage>,
    ) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // The core may have published before we subscribed.
        let initial = self.state_manager.get_state().await;
        self.on_state_updated(initial);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let input_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if input_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: broadcast receiver (DiscoveryCore → AppMessage) ──
        let bc_tx = tx.clone();
        let bc_state_manager = Arc::clone(&self.state_manager);
        tokio::spawn(async move {
            loop {
                let app_msg = match broadcast_rx.recv().await {
                    Ok(BroadcastMessage::StateUpdated) => {
                        AppMessage::StateUpdated(bc_state_manager.get_state().await)
                    }
                    Ok(BroadcastMessage::Log(s)) => AppMessage::Log(s),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("broadcast receiver lagged by {} messages", n);
                        AppMessage::StateUpdated(bc_state_manager.get_state().await)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if bc_tx.send(app_msg).await.is_err() {
                    break;
                }
            }
        });
        drop(tx);

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry + spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // reel.log tail refresh, only while the log panel is open.
        let mut log_refresh = tokio::time::interval(Duration::from_secs(2));
        log_refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    self.handle_message(msg).await;
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next).await;
                    }
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    let animating = self.state.discovery.is_loading() || !self.toast.is_empty();
                    self.toast.tick();
                    if self.state.discovery.is_loading() {
                        self.state.spinner_frame =
                            (self.state.spinner_frame + 1) % SPINNER_FRAMES.len();
                    }
                    needs_redraw = animating;
                }

                _ = log_refresh.tick() => {
                    if self.log_panel.visible {
                        self.reload_log_tail();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                for a in self.handle_key(key) {
                    self.dispatch(a).await;
                }
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for a in self.handle_mouse(mouse) {
                    self.dispatch(a).await;
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::StateUpdated(state) => self.on_state_updated(state),
            AppMessage::Log(msg) => self.push_log(msg),
        }
    }

    fn on_state_updated(&mut self, new_state: DiscoveryState) {
        if new_state.rev < self.state.discovery.rev {
            return;
        }
        self.movie_grid.sync_movies(new_state.movies());
        self.trending.sync_records(&new_state.trending);
        self.state.discovery = new_state;
        self.sync_focus_ring();
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        if self.state.input_mode == InputMode::Search {
            return self.search_bar.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('L') => return vec![Action::ToggleLogs],
            KeyCode::Char('t') => return vec![Action::RefreshTrending],
            KeyCode::Char('/') | KeyCode::Char('i') => {
                return vec![Action::FocusPane(ComponentId::SearchBar)]
            }
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::SearchBar)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::MovieGrid)],
            KeyCode::Char('3') => return vec![Action::FocusPane(ComponentId::Trending)],
            _ => {}
        }

        match self.focus.current() {
            Some(ComponentId::MovieGrid) => self.movie_grid.handle_key(key, &self.state),
            Some(ComponentId::Trending) => self.trending.handle_key(key, &self.state),
            Some(ComponentId::LogPanel) => self.log_panel.handle_key(key, &self.state),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible {
            return vec![];
        }
        if !matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        ) {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
        }

        let (col, row) = (event.column, event.row);
        let target = if hit(self.areas.search, col, row) {
            ComponentId::SearchBar
        } else if hit(self.areas.trending, col, row) {
            ComponentId::Trending
        } else if hit(self.areas.grid, col, row) {
            ComponentId::MovieGrid
        } else if hit(self.areas.log, col, row) {
            ComponentId::LogPanel
        } else {
            return vec![];
        };

        let mut actions = Vec::new();
        if matches!(event.kind, MouseEventKind::Down(_)) {
            actions.push(Action::FocusPane(target));
        }
        actions.extend(match target {
            ComponentId::MovieGrid => {
                self.movie_grid
                    .handle_mouse(event, self.areas.grid, &self.state)
            }
            ComponentId::Trending => {
                self.trending
                    .handle_mouse(event, self.areas.trending, &self.state)
            }
            ComponentId::LogPanel => self.log_panel.handle_mouse(event, self.areas.log, &self.state),
            _ => vec![],
        });
        actions
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.search_bar.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        // Secondary actions are applied one level deep only.
        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Search ────────────────────────────────────────────────────────
            Action::QueryChanged(text) => {
                self.send_event(DiscoveryEvent::QueryChanged(text)).await;
            }
            Action::SubmitQuery(text) => {
                self.send_event(DiscoveryEvent::Submit(text)).await;
            }
            // Handled by the search bar, which answers with SubmitQuery.
            Action::SearchTerm(_) => {}
            Action::RefreshTrending => {
                self.toast.info("reloading trending searches");
                self.send_event(DiscoveryEvent::RefreshTrending).await;
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_input_mode();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
                self.sync_input_mode();
            }

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleLogs => {
                if self.log_panel.visible {
                    self.reload_log_tail();
                }
                self.sync_focus_ring();
            }
            Action::ToggleHelp => {}
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    async fn send_event(&self, evt: DiscoveryEvent) {
        if self.event_tx.send(evt).await.is_err() {
            warn!("DiscoveryCore is gone; event dropped");
        }
    }

    // ── Focus ─────────────────────────────────────────────────────────────────

    /// Rebuild the focus ring from what is currently on screen.
    fn sync_focus_ring(&mut self) {
        let mut items = vec![ComponentId::SearchBar, ComponentId::MovieGrid];
        if !self.state.discovery.trending.is_empty() {
            items.push(ComponentId::Trending);
        }
        if self.log_panel.visible {
            items.push(ComponentId::LogPanel);
        }
        self.focus.set_items(items);
        self.sync_input_mode();
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.focus.is_focused(ComponentId::SearchBar) {
            InputMode::Search
        } else {
            InputMode::Browse
        };
    }

    // ── Logs ──────────────────────────────────────────────────────────────────

    fn push_log(&mut self, msg: String) {
        self.state.logs.push(msg);
        if self.state.logs.len() > MAX_SESSION_LOGS {
            self.state.logs.remove(0);
        }
    }

    /// Read the tail of reel.log into `state.log_lines`.
    fn reload_log_tail(&mut self) {
        match std::fs::read_to_string(&self.state.log_path) {
            Ok(content) => {
                let lines: Vec<&str> = content.lines().collect();
                let start = lines.len().saturating_sub(MAX_LOG_TAIL);
                self.state.log_lines = lines[start..].iter().map(|l| l.to_string()).collect();
            }
            Err(e) => debug!("log tail unavailable: {}", e),
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let trending_h = if self.trending.list.is_empty() { 0 } else { 3 };
        let log_h = if self.log_panel.visible { 10 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(trending_h),
                Constraint::Min(5),
                Constraint::Length(log_h),
                Constraint::Length(1),
            ])
            .split(area);

        header::draw(frame, rows[0], &self.state);

        self.areas.search = rows[1];
        let focused = self.focus.is_focused(ComponentId::SearchBar);
        self.search_bar.draw(frame, rows[1], focused, &self.state);

        self.areas.trending = rows[2];
        let focused = self.focus.is_focused(ComponentId::Trending);
        self.trending.draw(frame, rows[2], focused, &self.state);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[3]);
        self.areas.grid = body[0];
        let focused = self.focus.is_focused(ComponentId::MovieGrid);
        self.movie_grid.draw(frame, body[0], focused, &self.state);
        let selected = if self.state.discovery.movies().is_empty() {
            None
        } else {
            self.movie_grid.selected()
        };
        movie_detail::draw(frame, body[1], selected, &self.state);

        self.areas.log = rows[4];
        if self.log_panel.visible {
            let focused = self.focus.is_focused(ComponentId::LogPanel);
            self.log_panel.draw(frame, rows[4], focused, &self.state);
        }

        let right = match &self.state.http_addr {
            Some(addr) => format!("trending: {} · api: {} ", self.state.trending_backend, addr),
            None => format!("trending: {} ", self.state.trending_backend),
        };
        status_bar::draw_keys_bar(frame, rows[5], self.state.input_mode, &right);

        self.help_overlay.draw(frame, area, true, &self.state);
        self.toast.draw(frame, area);
    }
}
