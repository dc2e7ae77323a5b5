//! # Effect Runtime
//!
//! Runs the [`Effect`]s queued by the [`App`](crate::ui::App) as tokio tasks
//! and hands their results back through an unbounded channel. The event loop
//! drains the channel once per iteration with [`Runtime::drain`].
//!
//! Only one suggestion fetch is kept alive: starting a new one aborts the
//! previous task. Stale answers that still slip through are filtered by the
//! search box's request token.
//!
//! Without a [`RemoteClient`] (offline mode) every effect is dropped.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::remote::RemoteClient;
use crate::ui::{Effect, Fetched};

pub struct Runtime {
    client: Option<RemoteClient>,
    tx: mpsc::UnboundedSender<Fetched>,
    rx: mpsc::UnboundedReceiver<Fetched>,
    suggestion_task: Option<JoinHandle<()>>,
}

impl Runtime {
    pub fn new(client: Option<RemoteClient>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            tx,
            rx,
            suggestion_task: None,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    /// Start the work described by `effect`. Must be called from within a
    /// tokio runtime.
    pub fn dispatch(&mut self, effect: Effect) {
        if let Effect::CancelSuggestions = effect {
            self.cancel_suggestions();
            return;
        }
        let Some(client) = self.client.clone() else {
            tracing::trace!(?effect, "offline, effect dropped");
            return;
        };
        let tx = self.tx.clone();

        match effect {
            Effect::FetchSuggestions(request) => {
                self.cancel_suggestions();
                self.suggestion_task = Some(tokio::spawn(async move {
                    let result = client.fetch_suggestions(&request.query).await;
                    let _ = tx.send(Fetched::Suggestions {
                        token: request.token,
                        result,
                    });
                }));
            }
            Effect::FetchQuote => {
                tokio::spawn(async move {
                    let _ = tx.send(Fetched::Quote(client.fetch_quote().await));
                });
            }
            Effect::LoadWallpaper(request) => {
                tokio::spawn(async move {
                    let result = client.fetch_wallpaper(&request.url).await;
                    let _ = tx.send(Fetched::Wallpaper {
                        generation: request.generation,
                        result,
                    });
                });
            }
            Effect::CancelSuggestions => {}
        }
    }

    pub fn dispatch_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }

    fn cancel_suggestions(&mut self) {
        if let Some(task) = self.suggestion_task.take() {
            task.abort();
        }
    }

    /// Results that are ready now, without waiting.
    pub fn drain(&mut self) -> Vec<Fetched> {
        let mut ready = Vec::new();
        while let Ok(fetched) = self.rx.try_recv() {
            ready.push(fetched);
        }
        ready
    }

    /// Wait for the next result.
    pub async fn next(&mut self) -> Option<Fetched> {
        self.rx.recv().await
    }
}
