//! Reminder scheduling.
//!
//! Parses scheduling utterances ("set a reminder to walk the dog at 5:00
//! pm", "... in 10 minutes") into one-shot reminders, and fires due
//! reminders from a ~1 Hz ticker that runs independently of the dispatch
//! loop.

pub mod reminder;
pub mod runner;

pub use reminder::{ParseOutcome, Reminder, parse_reminder};
pub use runner::{ReminderScheduler, spawn_ticker};
