//! Command dispatch cascade.
//!
//! One transcribed utterance enters, exactly one side effect comes out.
//! [`interpret`] resolves the utterance against a fixed-priority rule list
//! (first match wins, no re-evaluation) and [`Dispatcher::dispatch`]
//! executes the matching handler against the session's boundaries.
//! Anything unmatched falls through to the conversational model; there is
//! no "unrecognized command" path.

use crate::apps::AppControl;
use crate::config::{AssistantConfig, VoiceConfig};
use crate::events::{AssistantEvent, EventBus};
use crate::history::ConversationHistory;
use crate::llm::ConversationModel;
use crate::scheduler::runner::lock_scheduler;
use crate::scheduler::{ParseOutcome, Reminder, ReminderScheduler, parse_reminder};
use crate::search::WebSearch;
use crate::speech::{SpeechOutput, Voice};
use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Spoken once before the capture loop starts.
pub const GREETING: &str = "Hello, I am Aria. Ready to assist you.";

/// Search trigger phrases, stripped from the utterance to form the query.
const SEARCH_TRIGGERS: [&str; 3] = ["search for", "who is", "what is the meaning of"];

const INTERRUPT_CONFIRMATION: &str = "Command sequence terminated.";
const SCHEDULING_APOLOGY: &str =
    "I had trouble setting that reminder. Please state the time clearly.";
const SEARCH_COMPLETE: &str = "Search complete.";
const COMPLIMENT_RESPONSE: &str =
    "Thank you. I am pleased you find my vocal configuration satisfactory.";
const IDENTITY_RESPONSE: &str = "I am Aria, your desktop assistant.";
const FAREWELL: &str = "Shutting down. Goodbye.";

/// One command resolved from an utterance by the dispatch cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Halt in-progress speech and confirm.
    Interrupt,
    /// Register a parsed reminder.
    SetReminder(Reminder),
    /// Scheduling shape matched but the time was unreadable.
    RejectReminder(String),
    /// Search the web with the extracted query.
    Search(String),
    /// Speak the current clock time.
    CurrentTime,
    /// Open a well-known site in the browser.
    OpenSite {
        name: &'static str,
        url: &'static str,
    },
    /// Canned response to a voice compliment.
    Compliment,
    /// Canned identity response.
    Identity,
    /// Terminate the named application.
    CloseApp(String),
    /// Leave the capture loop.
    Exit,
    /// Fall back to the conversational model.
    Converse(String),
}

/// Resolve one lowercased utterance against the fixed rule cascade.
///
/// `now` anchors relative scheduling phrases to the capture time.
#[must_use]
pub fn interpret(utterance: &str, now: NaiveDateTime) -> Command {
    if utterance.contains("stop") || utterance.contains("cancel") {
        return Command::Interrupt;
    }

    if utterance.contains(" at ") || utterance.contains(" in ") {
        match parse_reminder(utterance, now) {
            ParseOutcome::Scheduled(reminder) => return Command::SetReminder(reminder),
            ParseOutcome::Invalid(reason) => return Command::RejectReminder(reason),
            ParseOutcome::NotScheduling => {}
        }
    }

    if SEARCH_TRIGGERS
        .iter()
        .any(|trigger| utterance.contains(trigger))
    {
        let mut query = utterance.to_owned();
        for trigger in SEARCH_TRIGGERS {
            query = query.replace(trigger, "");
        }
        let query = query.trim();
        if !query.is_empty() {
            return Command::Search(query.to_owned());
        }
    }

    if utterance.contains("time") {
        return Command::CurrentTime;
    }
    if utterance.contains("open youtube") {
        return Command::OpenSite {
            name: "YouTube",
            url: "https://youtube.com",
        };
    }
    if utterance.contains("i like your voice") || utterance.contains("your voice is good") {
        return Command::Compliment;
    }
    if utterance.contains("who are you") {
        return Command::Identity;
    }
    if utterance.contains("exit") || utterance.contains("quit") {
        return Command::Exit;
    }
    if utterance.contains("open google") {
        return Command::OpenSite {
            name: "Google",
            url: "https://google.com",
        };
    }
    if let Some(app) = utterance.strip_prefix("close ") {
        let app = app.trim();
        if !app.is_empty() {
            return Command::CloseApp(app.to_owned());
        }
    }

    Command::Converse(utterance.to_owned())
}

/// What the session loop should do after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Continue,
    Exit,
}

/// Executes resolved commands against the session's boundaries.
pub struct Dispatcher {
    history: ConversationHistory,
    model: Box<dyn ConversationModel>,
    voice: Voice,
    search: Box<dyn WebSearch>,
    apps: Box<dyn AppControl>,
    scheduler: Arc<Mutex<ReminderScheduler>>,
    rates: VoiceConfig,
    events: EventBus,
}

impl Dispatcher {
    pub fn new(
        config: &AssistantConfig,
        model: Box<dyn ConversationModel>,
        speech: Box<dyn SpeechOutput>,
        search: Box<dyn WebSearch>,
        apps: Box<dyn AppControl>,
        scheduler: Arc<Mutex<ReminderScheduler>>,
        events: EventBus,
    ) -> Self {
        Self {
            history: ConversationHistory::with_limit(
                &config.llm.system_prompt,
                config.llm.max_history_turns,
            ),
            model,
            voice: Voice::new(speech, config.voice.rate, events.clone()),
            search,
            apps,
            scheduler,
            rates: config.voice.clone(),
            events,
        }
    }

    /// Speak the startup greeting.
    pub fn greet(&mut self) {
        self.voice.say(GREETING);
    }

    /// Dispatch one non-empty utterance.
    pub async fn dispatch(&mut self, utterance: &str) -> DispatchOutcome {
        self.events
            .publish(AssistantEvent::Heard(utterance.to_owned()));
        let command = interpret(utterance, Local::now().naive_local());
        info!("dispatching: {command:?}");
        self.execute(command).await
    }

    async fn execute(&mut self, command: Command) -> DispatchOutcome {
        match command {
            Command::Interrupt => {
                self.voice.interrupt();
                self.voice
                    .say_at(INTERRUPT_CONFIRMATION, self.rates.alert_rate);
            }
            Command::SetReminder(reminder) => {
                let confirmation = format!(
                    "Acknowledged. I will remind you about {} at {:02}:{:02}.",
                    reminder.task, reminder.hour, reminder.minute
                );
                lock_scheduler(&self.scheduler).schedule(reminder);
                self.voice.say(&confirmation);
            }
            Command::RejectReminder(reason) => {
                warn!("scheduling parse failed: {reason}");
                self.voice.say(SCHEDULING_APOLOGY);
            }
            Command::Search(query) => {
                self.voice.say_at(
                    &format!("Searching the web for {query}"),
                    self.rates.announce_rate,
                );
                if let Err(e) = self.search.search(&query) {
                    warn!("web search failed: {e}");
                }
                self.voice.say(SEARCH_COMPLETE);
            }
            Command::CurrentTime => {
                let now = Local::now().format("%H:%M");
                self.voice.say(&format!("The time is {now}"));
            }
            Command::OpenSite { name, url } => {
                if let Err(e) = self.search.open_url(url) {
                    warn!("cannot open {name}: {e}");
                }
                self.voice.say(&format!("Opening {name}"));
            }
            Command::Compliment => {
                self.voice.say_at(COMPLIMENT_RESPONSE, self.rates.warm_rate);
            }
            Command::Identity => {
                self.voice.say(IDENTITY_RESPONSE);
            }
            Command::CloseApp(app) => {
                let signalled = self.apps.terminate(&app);
                info!("close \"{app}\": {signalled} process(es) signalled");
                self.voice.say(&format!("{} closed.", capitalize(&app)));
            }
            Command::Exit => {
                self.voice.say(FAREWELL);
                self.events.publish(AssistantEvent::Exited);
                return DispatchOutcome::Exit;
            }
            Command::Converse(prompt) => {
                let reply = self.model.reply(&mut self.history, &prompt).await;
                info!("model reply: {reply}");
                self.voice.say(&reply);
            }
        }
        DispatchOutcome::Continue
    }

    /// Speak a fired reminder.
    pub fn announce_reminder(&mut self, reminder: &Reminder) {
        self.events
            .publish(AssistantEvent::ReminderFired(reminder.task.clone()));
        self.voice.say(&format!("Reminder! {}", reminder.task));
    }

    /// The bounded conversation history.
    #[must_use]
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
