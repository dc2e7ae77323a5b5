//! # Quotes
//!
//! The built-in quote list and the typewriter engine that animates it.
//!
//! - [`catalog`] - [`Quote`] and the static list
//! - [`typewriter`] - the reveal / hold / erase / rotate state machine

pub mod catalog;
pub mod typewriter;

pub use catalog::{builtin_quotes, Quote, QuoteScale, DEFAULT_AUTHOR};
pub use typewriter::{Phase, TickOutcome, Typewriter, TypewriterTiming};
