//! Speech emission boundary and the stop-flag wrapper.

use crate::events::{AssistantEvent, AssistantStatus, EventBus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Synthesized speech sink.
///
/// `speak` blocks until the utterance finishes or the engine is stopped.
/// Rate is words per minute and applies to that one utterance.
pub trait SpeechOutput: Send {
    /// Speak one utterance at the given rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the utterance; callers
    /// degrade to a log line.
    fn speak(&mut self, text: &str, rate: u32) -> crate::Result<()>;

    /// Halt any in-progress speech immediately. Best-effort.
    fn stop(&mut self);

    /// Whether the engine is currently speaking.
    fn is_speaking(&self) -> bool;
}

/// Console-backed speech output used by the binary.
///
/// Prints utterances to stdout. Printing is synchronous, so this engine is
/// never busy when a new command arrives.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&mut self, text: &str, _rate: u32) -> crate::Result<()> {
        println!("Aria: {text}");
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_speaking(&self) -> bool {
        false
    }
}

/// Speech wrapper owning the default rate and the stop flag.
///
/// The stop flag is armed by [`Voice::interrupt`] while the engine is
/// speaking, and consumed by the next emission attempt: that attempt keeps
/// the engine silent instead of speaking, then clears the flag. Single
/// writer, single reader; exactly one emission is ever in flight.
pub struct Voice {
    out: Box<dyn SpeechOutput>,
    stop_flag: Arc<AtomicBool>,
    default_rate: u32,
    events: EventBus,
}

impl Voice {
    #[must_use]
    pub fn new(out: Box<dyn SpeechOutput>, default_rate: u32, events: EventBus) -> Self {
        Self {
            out,
            stop_flag: Arc::new(AtomicBool::new(false)),
            default_rate,
            events,
        }
    }

    /// Shared handle to the stop flag.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    /// Speak at the default rate.
    pub fn say(&mut self, text: &str) {
        self.say_at(text, self.default_rate);
    }

    /// Speak one utterance at an overridden rate; the default rate is
    /// restored afterwards.
    pub fn say_at(&mut self, text: &str, rate: u32) {
        self.events
            .publish(AssistantEvent::Status(AssistantStatus::Speaking));

        if self.stop_flag.swap(false, Ordering::SeqCst) {
            self.out.stop();
            debug!("speech suppressed by stop flag: {text}");
        } else if let Err(e) = self.out.speak(text, rate) {
            warn!("speech emission failed: {e}");
        }

        self.events
            .publish(AssistantEvent::Status(AssistantStatus::Idle));
    }

    /// Handle an interrupt phrase: halt the engine if it is speaking and
    /// arm the stop flag so already-queued speech is dropped.
    pub fn interrupt(&mut self) {
        if self.out.is_speaking() {
            self.out.stop();
            self.stop_flag.store(true, Ordering::SeqCst);
            debug!("speech interrupted");
        }
    }
}
