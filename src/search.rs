//! Web search and site-opening boundary.
//!
//! Search results open in the default browser via the platform opener;
//! nothing is read back. Failures here are best-effort: the dispatcher
//! logs and keeps going.

use crate::error::{AssistantError, Result};
use std::process::Command;
use tracing::debug;

/// Opens search results and sites for the user.
pub trait WebSearch: Send {
    /// Open search results for a free-text query. No return value is
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be launched.
    fn search(&self, query: &str) -> Result<()>;

    /// Open a site directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be launched.
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Search boundary that builds a query URL and hands it to the platform
/// opener (`open` / `start` / `xdg-open`).
pub struct BrowserSearch {
    query_url: String,
}

impl BrowserSearch {
    #[must_use]
    pub fn new(query_url: impl Into<String>) -> Self {
        Self {
            query_url: query_url.into(),
        }
    }

    /// The results URL for `query`, with the query percent-encoded.
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        format!("{}{}", self.query_url, urlencoding::encode(query))
    }
}

impl WebSearch for BrowserSearch {
    fn search(&self, query: &str) -> Result<()> {
        let url = self.search_url(query);
        debug!("opening search results: {url}");
        self.open_url(&url)
    }

    fn open_url(&self, url: &str) -> Result<()> {
        opener_command(url)
            .spawn()
            .map_err(|e| AssistantError::Search(format!("cannot open browser: {e}")))?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_percent_encodes_query() {
        let search = BrowserSearch::new("https://www.google.com/search?q=");
        assert_eq!(
            search.search_url("capital of france"),
            "https://www.google.com/search?q=capital%20of%20france"
        );
    }

    #[test]
    fn search_url_keeps_plain_words_intact() {
        let search = BrowserSearch::new("https://example.com/?q=");
        assert_eq!(search.search_url("rust"), "https://example.com/?q=rust");
    }
}
