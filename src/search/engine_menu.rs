//! # Engine Menu
//!
//! Dropdown state for choosing the active search engine. The chosen id is the
//! only preference written at runtime; it goes through the injected
//! [`PreferenceStore`].

use crate::search::engine::{engine, resolve_engine, EngineId, SearchEngine, ENGINES};
use crate::ui::config::{PreferenceStore, ENGINE_PREFERENCE_KEY};

pub struct EngineMenu {
    active: EngineId,
    open: bool,
    highlighted: usize,
    store: Box<dyn PreferenceStore>,
}

impl EngineMenu {
    /// Read the stored preference once. `session_override` wins for this
    /// run without being persisted.
    pub fn new(store: Box<dyn PreferenceStore>, session_override: Option<EngineId>) -> Self {
        let stored = store.get(ENGINE_PREFERENCE_KEY);
        let active = match session_override {
            Some(id) => id,
            None => resolve_engine(stored.as_deref()).id,
        };
        tracing::debug!(engine = %active, stored = ?stored, "resolved search engine");
        Self {
            active,
            open: false,
            highlighted: index_of(active),
            store,
        }
    }

    pub fn active(&self) -> &'static SearchEngine {
        engine(self.active)
    }

    pub fn active_id(&self) -> EngineId {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
            self.highlighted = index_of(self.active);
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Move the highlight by `delta` rows, wrapping at both ends.
    pub fn move_highlight(&mut self, delta: isize) {
        let len = ENGINES.len() as isize;
        self.highlighted = (self.highlighted as isize + delta).rem_euclid(len) as usize;
    }

    pub fn select_highlighted(&mut self) {
        if let Some(engine) = ENGINES.get(self.highlighted) {
            self.select(engine.id);
        }
    }

    /// Make `id` the active engine, persist it, and close the menu.
    ///
    /// A failed write is logged; the selection still applies for this run.
    pub fn select(&mut self, id: EngineId) {
        self.active = id;
        self.highlighted = index_of(id);
        self.open = false;
        match self.store.set(ENGINE_PREFERENCE_KEY, id.as_str()) {
            Ok(()) => tracing::info!(engine = %id, "selected search engine"),
            Err(e) => tracing::warn!(engine = %id, "failed to persist engine preference: {e:#}"),
        }
    }
}

fn index_of(id: EngineId) -> usize {
    ENGINES.iter().position(|e| e.id == id).unwrap_or(0)
}
