//! # App Shell
//!
//! Top-level state: focus mode, the typewriter orb, the search box and the
//! wallpaper. Input events and fetch results come in; [`Effect`]s go out for
//! the runtime to execute. Nothing in here touches the network or the
//! terminal.
//!
//! ## Focus mode
//!
//! Focus mode and the search box's active state are the same thing seen from
//! two sides. [`App::set_focus_mode`] is the only place that flips it, and it
//! also pauses the typewriter while the orb is hidden.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use image::RgbImage;
use ratatui::layout::Rect;

use crate::quotes::{Quote, Typewriter};
use crate::remote::RemoteError;
use crate::search::{KeyOutcome, Navigator, SearchBox, SuggestionRequest, ENGINES};
use crate::ui::layout::{Hit, Regions};
use crate::ui::theme::Theme;
use crate::wallpaper::{Treatment, WallpaperController, WallpaperRequest};

/// Cursor blink half-period.
const BLINK_MS: u128 = 530;

/// Work the runtime should start on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSuggestions(SuggestionRequest),
    /// Abort any suggestion fetch still in flight.
    CancelSuggestions,
    FetchQuote,
    LoadWallpaper(WallpaperRequest),
}

/// A finished background fetch.
#[derive(Debug)]
pub enum Fetched {
    Quote(Result<Quote, RemoteError>),
    Suggestions {
        token: u64,
        result: Result<Vec<String>, RemoteError>,
    },
    Wallpaper {
        generation: u64,
        result: Result<RgbImage, RemoteError>,
    },
}

pub struct App {
    pub theme: &'static Theme,
    pub focus_mode: bool,
    /// Number of wallpaper refreshes requested so far.
    pub refresh_count: u64,
    pub typewriter: Typewriter,
    pub search_box: SearchBox,
    pub wallpaper: WallpaperController,
    pub viewport: Rect,
    pub should_quit: bool,
    started: Instant,
    now: Instant,
    effects: Vec<Effect>,
}

impl App {
    pub fn new(
        theme: &'static Theme,
        typewriter: Typewriter,
        search_box: SearchBox,
        wallpaper: WallpaperController,
        now: Instant,
    ) -> Self {
        Self {
            theme,
            focus_mode: false,
            refresh_count: 0,
            typewriter,
            search_box,
            wallpaper,
            viewport: Rect::default(),
            should_quit: false,
            started: now,
            now,
            effects: Vec::new(),
        }
    }

    /// Kick off the first wallpaper load and quote prefetch, then enter the
    /// initial mode.
    pub fn start(&mut self, focused: bool, now: Instant) {
        self.request_wallpaper();
        self.effects.push(Effect::FetchQuote);
        self.set_focus_mode(focused, now);
    }

    pub fn set_focus_mode(&mut self, on: bool, now: Instant) {
        self.focus_mode = on;
        if on {
            self.search_box.activate(now);
            self.typewriter.suspend();
        } else {
            if self.search_box.is_active() {
                self.search_box.deactivate();
                self.effects.push(Effect::CancelSuggestions);
            }
            self.typewriter.resume(now);
        }
        tracing::debug!(focus_mode = on, "focus mode changed");
    }

    /// User-triggered wallpaper refresh.
    pub fn refresh_wallpaper(&mut self) {
        self.refresh_count += 1;
        self.request_wallpaper();
    }

    fn request_wallpaper(&mut self) {
        let request = self
            .wallpaper
            .refresh(chrono::Utc::now().timestamp_millis());
        self.effects.push(Effect::LoadWallpaper(request));
    }

    /// Advance timers. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.now = now;
        let outcome = self.typewriter.tick(now);
        if outcome.prefetch {
            self.effects.push(Effect::FetchQuote);
        }
        let focused = self.search_box.tick(now);
        outcome.changed || focused
    }

    /// Earliest pending timer across components.
    pub fn next_wake(&self) -> Option<Instant> {
        [self.typewriter.next_wake(), self.search_box.next_wake()]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn cursor_visible(&self) -> bool {
        (self.now.saturating_duration_since(self.started).as_millis() / BLINK_MS) % 2 == 0
    }

    pub fn treatment(&self) -> Treatment {
        Treatment::for_focus(self.focus_mode)
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
    }

    /// Repaint cached wallpaper for the current viewport and mode.
    pub fn prepare_frame(&mut self, area: Rect) {
        self.viewport = area;
        let treatment = self.treatment();
        self.wallpaper.prepare(area.width, area.height, treatment);
    }

    pub fn regions(&self) -> Regions {
        let suggestions = if self.search_box.suggestions_visible() {
            self.search_box.suggestions().len()
        } else {
            0
        };
        Regions::compute(
            self.viewport,
            self.focus_mode,
            self.search_box.menu().is_open(),
            suggestions,
        )
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant, navigator: &mut dyn Navigator) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if !self.focus_mode {
            match key.code {
                KeyCode::Enter | KeyCode::Char('/') | KeyCode::Char(' ') => {
                    self.set_focus_mode(true, now);
                }
                KeyCode::Char('r') => self.refresh_wallpaper(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match self.search_box.on_key(key.code, navigator) {
            KeyOutcome::Fetch(request) => self.effects.push(Effect::FetchSuggestions(request)),
            KeyOutcome::Deactivate => self.set_focus_mode(false, now),
            KeyOutcome::Searched(_) => self.effects.push(Effect::CancelSuggestions),
            KeyOutcome::Handled | KeyOutcome::Ignored => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Instant, navigator: &mut dyn Navigator) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let hit = self.regions().hit(mouse.column, mouse.row);

        if !self.focus_mode {
            match hit {
                Hit::Orb => self.set_focus_mode(true, now),
                Hit::Refresh => self.refresh_wallpaper(),
                _ => {}
            }
            return;
        }

        if self.search_box.menu().is_open() {
            match hit {
                Hit::MenuRow(index) => {
                    if let Some(engine) = ENGINES.get(index) {
                        self.search_box.menu_mut().select(engine.id);
                    }
                    return;
                }
                Hit::Menu => return,
                // Clicking the button again closes the menu below.
                _ => self.search_box.menu_mut().close(),
            }
            if hit == Hit::EngineButton {
                return;
            }
        }

        match hit {
            Hit::EngineButton => self.search_box.menu_mut().toggle(),
            Hit::SearchButton => {
                let query = self.search_box.query().to_string();
                if self.search_box.trigger_search(&query, navigator).is_some() {
                    self.effects.push(Effect::CancelSuggestions);
                }
            }
            Hit::Suggestion(index) => {
                if self.search_box.search_suggestion(index, navigator).is_some() {
                    self.effects.push(Effect::CancelSuggestions);
                }
            }
            _ if !hit.inside_search_box() => self.set_focus_mode(false, now),
            _ => {}
        }
    }

    /// Fold a finished fetch into the state.
    pub fn apply(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Quote(Ok(quote)) => {
                tracing::debug!(author = %quote.author, "prefetched quote");
                self.typewriter.set_prefetched(quote);
            }
            Fetched::Quote(Err(e)) => {
                tracing::debug!("quote prefetch failed, local pool stays in use: {e}");
            }
            Fetched::Suggestions { token, result } => match result {
                Ok(items) => {
                    self.search_box.apply_suggestions(token, items);
                }
                Err(e) => tracing::debug!(token, "suggestion fetch failed: {e}"),
            },
            Fetched::Wallpaper { generation, result } => match result {
                Ok(image) => {
                    self.wallpaper.on_loaded(generation, image);
                }
                Err(e) => self.wallpaper.on_failed(generation, &e),
            },
        }
    }

    /// Effects queued since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}
