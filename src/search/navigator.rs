//! Outbound navigation: hand a finished search URL to something that can show
//! it.

use anyhow::{Context, Result};

pub trait Navigator {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn open(&mut self, url: &str) -> Result<()> {
        open::that_detached(url).with_context(|| format!("Failed to open browser for {url}"))
    }
}

/// Records URLs instead of opening them. Used by `--dry-run` and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    pub opened: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn open(&mut self, url: &str) -> Result<()> {
        tracing::info!(url, "navigation recorded");
        self.opened.push(url.to_string());
        Ok(())
    }
}
