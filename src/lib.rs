//! focus-tab - a quiet terminal start page
//!
//! A rotating wallpaper, a typewriter quote orb, and a search box that
//! sends queries to one of several web search engines with live
//! suggestions.

pub mod logging;
pub mod quotes;
pub mod remote;
pub mod runtime;
pub mod search;
pub mod ui;
pub mod wallpaper;
