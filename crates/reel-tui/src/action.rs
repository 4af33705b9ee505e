//! Action enum: all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    SearchBar,
    MovieGrid,
    Trending,
    LogPanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Search ───────────────────────────────────────────────────────────────
    /// Raw search text changed; goes through the debounce window.
    QueryChanged(String),
    /// Commit this text now.
    SubmitQuery(String),
    /// Put a term in the search box and submit it (trending pick).
    SearchTerm(String),
    RefreshTrending,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLogs,
    ToggleHelp,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
