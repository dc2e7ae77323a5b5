//! # UI Module
//!
//! Terminal front end of the start page.
//!
//! ## Components
//!
//! - [`App`] - focus mode, typewriter, search box and wallpaper state
//! - [`mod@layout`] - screen geometry shared by drawing and hit testing
//! - [`mod@render`] - draws a frame from an [`App`]
//! - [`mod@config`] - persisted configuration and preferences
//! - [`mod@theme`] - built-in color themes
//!
//! ## Screens
//!
//! ```text
//! ┌───────────────────────────────────────┐   ┌───────────────────────────────────────┐
//! │               wallpaper               │   │      wallpaper (zoomed, blurred)      │
//! │            ╭─────────────╮            │   │  ╭───┬─────────────────────────┬───╮  │
//! │            │   王   知    │            │   │  │ 百▾│ 百度一下，你就知道       │ → │  │
//! │            │   阳   行    │            │   │  ╰───┴─────────────────────────┴───╯  │
//! │            │   明   合    │            │   │  ╭─────────────────────────────────╮  │
//! │            ╰─────────────╯            │   │  │ ⌕ suggestion                    │  │
//! │ 专注 · 沉浸          ⟳ 切换壁纸 [r]  │   │  ╰─────────────────────────────────╯  │
//! └───────────────────────────────────────┘   └───────────────────────────────────────┘
//!                  idle                                      focus mode
//! ```

pub mod app;
pub mod config;
pub mod layout;
pub mod render;
pub mod theme;

pub use app::{App, Effect, Fetched};
pub use render::render;
