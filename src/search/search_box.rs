//! # Search Box Controller
//!
//! Owns the query text, the active/inactive mode, the suggestion dropdown and
//! keyboard navigation. Network work is not done here: a query change returns
//! a [`SuggestionRequest`] for the shell to run, and the response comes back
//! through [`SearchBox::apply_suggestions`] tagged with the same token.
//!
//! ## Stale responses
//!
//! Every query change (and every deactivation) issues a new token. A
//! response is applied only if it carries the latest token, so an answer for
//! `"a"` arriving after the answer for `"ab"` is dropped.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use super::engine::SearchEngine;
use super::engine_menu::EngineMenu;
use super::navigator::Navigator;
use super::suggest::MAX_SUGGESTIONS;

/// Delay between activation and the input taking keyboard focus.
pub const FOCUS_SETTLE: Duration = Duration::from_millis(350);

/// A suggestion fetch the shell should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub token: u64,
    pub query: String,
}

/// Result of feeding a key to the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key meant nothing in the current state.
    Ignored,
    /// State changed; redraw.
    Handled,
    /// The query changed and suggestions should be fetched.
    Fetch(SuggestionRequest),
    /// A search was sent to this URL.
    Searched(String),
    /// The box asks the shell to leave focus mode.
    Deactivate,
}

pub struct SearchBox {
    active: bool,
    query: String,
    suggestions: Vec<String>,
    show_suggestions: bool,
    selected: Option<usize>,
    token: u64,
    input_focused: bool,
    focus_at: Option<Instant>,
    menu: EngineMenu,
}

impl SearchBox {
    pub fn new(menu: EngineMenu) -> Self {
        Self {
            active: false,
            query: String::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            selected: None,
            token: 0,
            input_focused: false,
            focus_at: None,
            menu,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Whether the dropdown is currently shown.
    pub fn suggestions_visible(&self) -> bool {
        self.active && self.show_suggestions && !self.suggestions.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Latest issued request token.
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn engine(&self) -> &'static SearchEngine {
        self.menu.active()
    }

    pub fn menu(&self) -> &EngineMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut EngineMenu {
        &mut self.menu
    }

    /// When the pending input focus lands, if one is scheduled.
    pub fn next_wake(&self) -> Option<Instant> {
        self.focus_at
    }

    pub fn activate(&mut self, now: Instant) {
        if self.active {
            return;
        }
        self.active = true;
        self.input_focused = false;
        self.focus_at = Some(now + FOCUS_SETTLE);
        tracing::debug!("search box activated");
    }

    /// Leave the active state. Query, suggestions and focus are cleared and
    /// any in-flight suggestion request is invalidated.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.query.clear();
        self.clear_suggestions();
        self.input_focused = false;
        self.focus_at = None;
        self.menu.close();
        self.next_token();
        tracing::debug!("search box deactivated");
    }

    /// Apply the pending input focus once it is due. Returns true if focus
    /// was granted.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.focus_at {
            Some(at) if now >= at => {
                self.focus_at = None;
                self.input_focused = self.active;
                self.input_focused
            }
            _ => false,
        }
    }

    /// Replace the query text.
    pub fn set_query(&mut self, text: &str) -> Option<SuggestionRequest> {
        self.query = text.to_string();
        self.on_query_change()
    }

    pub fn insert_char(&mut self, c: char) -> Option<SuggestionRequest> {
        self.query.push(c);
        self.on_query_change()
    }

    pub fn backspace(&mut self) -> Option<SuggestionRequest> {
        self.query.pop();
        self.on_query_change()
    }

    fn on_query_change(&mut self) -> Option<SuggestionRequest> {
        let token = self.next_token();
        if self.active && !self.query.trim().is_empty() {
            Some(SuggestionRequest {
                token,
                query: self.query.clone(),
            })
        } else {
            self.clear_suggestions();
            None
        }
    }

    /// Apply a suggestion response. Returns false when it was dropped as
    /// stale.
    pub fn apply_suggestions(&mut self, token: u64, items: Vec<String>) -> bool {
        if token != self.token || !self.active {
            tracing::trace!(token, latest = self.token, "dropped stale suggestions");
            return false;
        }
        self.suggestions = items;
        self.suggestions.truncate(MAX_SUGGESTIONS);
        self.show_suggestions = !self.suggestions.is_empty();
        self.selected = None;
        true
    }

    pub fn on_key(&mut self, code: KeyCode, navigator: &mut dyn Navigator) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }
        if self.menu.is_open() {
            return self.on_menu_key(code);
        }
        if code == KeyCode::Esc {
            return if self.suggestions_visible() {
                self.show_suggestions = false;
                KeyOutcome::Handled
            } else {
                KeyOutcome::Deactivate
            };
        }
        if !self.input_focused {
            return KeyOutcome::Ignored;
        }

        match code {
            KeyCode::Down => {
                self.select_next();
                KeyOutcome::Handled
            }
            KeyCode::Up => {
                self.select_previous();
                KeyOutcome::Handled
            }
            KeyCode::Enter => {
                let text = match self.selected.and_then(|i| self.suggestions.get(i)) {
                    Some(suggestion) => suggestion.clone(),
                    None => self.query.clone(),
                };
                match self.trigger_search(&text, navigator) {
                    Some(url) => KeyOutcome::Searched(url),
                    None => KeyOutcome::Handled,
                }
            }
            KeyCode::Tab => {
                self.menu.toggle();
                KeyOutcome::Handled
            }
            KeyCode::Backspace => match self.backspace() {
                Some(request) => KeyOutcome::Fetch(request),
                None => KeyOutcome::Handled,
            },
            KeyCode::Char(c) => match self.insert_char(c) {
                Some(request) => KeyOutcome::Fetch(request),
                None => KeyOutcome::Handled,
            },
            _ => KeyOutcome::Ignored,
        }
    }

    fn on_menu_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Up => self.menu.move_highlight(-1),
            KeyCode::Down => self.menu.move_highlight(1),
            KeyCode::Enter => self.menu.select_highlighted(),
            KeyCode::Esc | KeyCode::Tab => self.menu.close(),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// ArrowDown: none → first → … → last → none.
    pub fn select_next(&mut self) {
        let len = self.suggestions.len();
        self.selected = match self.selected {
            None if len > 0 => Some(0),
            Some(i) if i + 1 < len => Some(i + 1),
            _ => None,
        };
    }

    /// ArrowUp: none → last → … → first → none.
    pub fn select_previous(&mut self) {
        let len = self.suggestions.len();
        self.selected = match self.selected {
            None if len > 0 => Some(len - 1),
            Some(i) if i > 0 => Some(i - 1),
            _ => None,
        };
    }

    /// Search for the suggestion at `index`, as a click would.
    pub fn search_suggestion(
        &mut self,
        index: usize,
        navigator: &mut dyn Navigator,
    ) -> Option<String> {
        let text = self.suggestions.get(index)?.clone();
        self.trigger_search(&text, navigator)
    }

    /// Send `text` to the active engine.
    ///
    /// Blank text is ignored entirely. Otherwise the URL is opened, query and
    /// suggestions are cleared, and the input keeps focus for the next
    /// search. Returns the URL that was opened.
    pub fn trigger_search(&mut self, text: &str, navigator: &mut dyn Navigator) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let url = self.engine().search_url(text);
        tracing::info!(engine = %self.engine().id, "search");
        if let Err(e) = navigator.open(&url) {
            tracing::warn!("navigation failed: {e:#}");
        }
        self.query.clear();
        self.clear_suggestions();
        self.next_token();
        self.input_focused = self.active;
        Some(url)
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.show_suggestions = false;
        self.selected = None;
    }

    fn next_token(&mut self) -> u64 {
        self.token = self.token.wrapping_add(1);
        self.token
    }
}
