//! Shared helpers for integration tests.

#![allow(dead_code)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use focus_tab::quotes::{builtin_quotes, Typewriter, TypewriterTiming};
use focus_tab::search::{EngineMenu, SearchBox};
use focus_tab::ui::config::{MemoryStore, PreferenceStore};
use focus_tab::ui::theme::Theme;
use focus_tab::ui::App;
use focus_tab::wallpaper::WallpaperController;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

pub const WALLPAPER_BASE: &str = "https://example.test/img?random=";

/// Helper to create a test app backed by `store`, sized 120x40.
pub fn create_test_app_with(store: Box<dyn PreferenceStore>, now: Instant) -> App {
    build_app(store, TypewriterTiming::default(), now)
}

/// Helper to create a test app with custom typewriter timing.
pub fn create_test_app_with_timing(timing: TypewriterTiming, now: Instant) -> App {
    build_app(Box::new(MemoryStore::new()), timing, now)
}

fn build_app(store: Box<dyn PreferenceStore>, timing: TypewriterTiming, now: Instant) -> App {
    let typewriter =
        Typewriter::with_random_quote(builtin_quotes(), timing, StdRng::seed_from_u64(11), now);
    let search_box = SearchBox::new(EngineMenu::new(store, None));
    let mut app = App::new(
        Theme::default_theme(),
        typewriter,
        search_box,
        WallpaperController::new(WALLPAPER_BASE),
        now,
    );
    app.on_resize(120, 40);
    app
}

pub fn create_test_app(now: Instant) -> App {
    create_test_app_with(Box::new(MemoryStore::new()), now)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::empty(),
    }
}
