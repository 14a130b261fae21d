//! Assistant session: owns shared state and runs the loops.
//!
//! All mutable state that crosses tasks (the stop flag, the conversation
//! history, the pending-reminder set) is owned here and handed to the
//! dispatch loop and scheduler ticker explicitly. Nothing is global, so
//! the dispatcher can be exercised in tests without a live window.

use crate::apps::AppControl;
use crate::capture::VoiceCapture;
use crate::config::AssistantConfig;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::Result;
use crate::events::{AssistantEvent, AssistantStatus, EventBus};
use crate::llm::ConversationModel;
use crate::scheduler::{Reminder, ReminderScheduler, spawn_ticker};
use crate::search::WebSearch;
use crate::speech::SpeechOutput;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One assistant run: capture/dispatch loop plus the reminder ticker.
pub struct Session {
    config: AssistantConfig,
    capture: Box<dyn VoiceCapture>,
    dispatcher: Dispatcher,
    scheduler: Arc<Mutex<ReminderScheduler>>,
    fired_rx: mpsc::UnboundedReceiver<Reminder>,
    events: EventBus,
    cancel: CancellationToken,
}

impl Session {
    /// Wire a session from its boundaries.
    pub fn new(
        config: AssistantConfig,
        capture: Box<dyn VoiceCapture>,
        speech: Box<dyn SpeechOutput>,
        model: Box<dyn ConversationModel>,
        search: Box<dyn WebSearch>,
        apps: Box<dyn AppControl>,
    ) -> Self {
        let events = EventBus::new(64);
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Arc::new(Mutex::new(ReminderScheduler::new(fired_tx)));
        let dispatcher = Dispatcher::new(
            &config,
            model,
            speech,
            search,
            apps,
            Arc::clone(&scheduler),
            events.clone(),
        );

        Self {
            config,
            capture,
            dispatcher,
            scheduler,
            fired_rx,
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to session events (status text, fired reminders, exit).
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<AssistantEvent> {
        self.events.subscribe()
    }

    /// Token that stops both loops when cancelled (e.g. on window close).
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until the exit command or cancellation.
    ///
    /// The reminder ticker is spawned for the whole session and fires due
    /// reminders into the loop regardless of dispatcher activity. Failed
    /// or empty captures are discarded without a dispatch attempt.
    pub async fn run(self) -> Result<()> {
        let Self {
            config,
            mut capture,
            mut dispatcher,
            scheduler,
            mut fired_rx,
            events,
            cancel,
        } = self;

        let ticker = spawn_ticker(
            Arc::clone(&scheduler),
            Duration::from_millis(config.scheduler.tick_interval_ms.max(1)),
            cancel.clone(),
        );

        info!("session started");
        dispatcher.greet();

        loop {
            events.publish(AssistantEvent::Status(AssistantStatus::Listening));
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("session cancelled");
                    break;
                }
                fired = fired_rx.recv() => {
                    if let Some(reminder) = fired {
                        dispatcher.announce_reminder(&reminder);
                    }
                }
                captured = capture.listen() => {
                    let Some(utterance) = captured else {
                        continue;
                    };
                    if utterance.is_empty() {
                        continue;
                    }
                    events.publish(AssistantEvent::Status(AssistantStatus::Recognizing));
                    if dispatcher.dispatch(&utterance).await == DispatchOutcome::Exit {
                        break;
                    }
                }
            }
        }

        cancel.cancel();
        let _ = ticker.await;
        events.publish(AssistantEvent::Status(AssistantStatus::Idle));
        info!("session ended");
        Ok(())
    }
}
