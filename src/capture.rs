//! Voice capture boundary.
//!
//! Capture engines (microphone + speech recognition) are external
//! collaborators. The core consumes them through [`VoiceCapture`]: one
//! blocking listen attempt at a time, bounded by the configured timeout,
//! yielding lowercase text or nothing. A failed or empty capture is never
//! an error; the session just listens again.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Source of transcribed utterances.
#[async_trait]
pub trait VoiceCapture: Send {
    /// Listen for one utterance.
    ///
    /// Blocks up to the implementation's listen timeout and returns `None`
    /// on timeout or recognition failure. Returned text is lowercased.
    async fn listen(&mut self) -> Option<String>;
}

/// Capture backed by a channel of injected text lines.
///
/// Stands in for a microphone engine: the binary feeds stdin lines into
/// the channel. A real speech engine would additionally calibrate for
/// ambient noise before listening; text injection has nothing to
/// calibrate.
pub struct ChannelCapture {
    rx: mpsc::Receiver<String>,
    listen_timeout: Duration,
}

impl ChannelCapture {
    #[must_use]
    pub fn new(rx: mpsc::Receiver<String>, listen_timeout: Duration) -> Self {
        Self { rx, listen_timeout }
    }
}

#[async_trait]
impl VoiceCapture for ChannelCapture {
    async fn listen(&mut self) -> Option<String> {
        match tokio::time::timeout(self.listen_timeout, self.rx.recv()).await {
            Ok(Some(line)) => {
                let utterance = line.trim().to_lowercase();
                if utterance.is_empty() {
                    None
                } else {
                    debug!("heard: {utterance}");
                    Some(utterance)
                }
            }
            Ok(None) => {
                // Input channel closed (stdin EOF). Pace the loop so the
                // session does not spin while waiting for cancellation.
                tokio::time::sleep(self.listen_timeout).await;
                None
            }
            Err(_) => None,
        }
    }
}
