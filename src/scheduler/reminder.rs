//! Reminder definitions and scheduling-phrase parsing.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::sync::OnceLock;

/// Leading phrase stripped from the task portion of a scheduling utterance.
const TASK_PREFIX: &str = "set a reminder to ";

/// Clock-time formats accepted after " at ", tried in order against the
/// upper-cased time text.
const TIME_FORMATS: [&str; 2] = ["%I:%M %p", "%H:%M"];

/// A one-shot reminder pending in the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// What to remind about, spoken back verbatim when the reminder fires.
    pub task: String,
    /// Hour of day (0-23, local wall clock).
    pub hour: u8,
    /// Minute of hour (0-59).
    pub minute: u8,
}

impl Reminder {
    pub fn new(task: impl Into<String>, hour: u8, minute: u8) -> Self {
        Self {
            task: task.into(),
            hour,
            minute,
        }
    }

    /// Returns `true` when `now` falls inside this reminder's fire minute.
    #[must_use]
    pub fn is_due_at(&self, now: NaiveTime) -> bool {
        now.hour() == u32::from(self.hour) && now.minute() == u32::from(self.minute)
    }
}

impl std::fmt::Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {:02}:{:02}", self.task, self.hour, self.minute)
    }
}

/// Outcome of scheduling-phrase parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A reminder was parsed and should be registered.
    Scheduled(Reminder),
    /// Not a scheduling command; the dispatch cascade continues.
    ///
    /// This includes " in " phrases without an `in <N> minute(s)` pattern,
    /// e.g. "remind me in 10 min".
    NotScheduling,
    /// The utterance looked like a scheduling command but the time could
    /// not be read; the utterance is consumed with a spoken apology.
    Invalid(String),
}

fn minutes_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"in\s+(\d+)\s+minute").expect("valid literal regex"))
}

/// Parse one utterance as a scheduling command.
///
/// An absolute phrase ("... at 5:00 pm") takes precedence over a relative
/// one; the first " at " splits the utterance. Relative phrases ("... in N
/// minutes") fire at `now + N`, truncated to minute granularity.
pub fn parse_reminder(utterance: &str, now: NaiveDateTime) -> ParseOutcome {
    if let Some((before, after)) = utterance.split_once(" at ") {
        let time_text = after.trim().to_uppercase();
        return match parse_clock_time(&time_text) {
            Some(time) => ParseOutcome::Scheduled(Reminder::new(
                strip_task_prefix(before),
                time.hour() as u8,
                time.minute() as u8,
            )),
            None => ParseOutcome::Invalid(format!("cannot read clock time \"{}\"", after.trim())),
        };
    }

    if let Some((before, _)) = utterance.split_once(" in ") {
        let Some(captures) = minutes_pattern().captures(utterance) else {
            return ParseOutcome::NotScheduling;
        };
        let Ok(minutes) = captures[1].parse::<i64>() else {
            return ParseOutcome::Invalid("minute count out of range".to_owned());
        };
        let Some(delta) = chrono::TimeDelta::try_minutes(minutes) else {
            return ParseOutcome::Invalid("minute count out of range".to_owned());
        };
        let Some(fire) = now.checked_add_signed(delta) else {
            return ParseOutcome::Invalid("minute count out of range".to_owned());
        };
        return ParseOutcome::Scheduled(Reminder::new(
            strip_task_prefix(before),
            fire.hour() as u8,
            fire.minute() as u8,
        ));
    }

    ParseOutcome::NotScheduling
}

fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

fn strip_task_prefix(text: &str) -> String {
    let trimmed = text.trim();
    trimmed
        .strip_prefix(TASK_PREFIX)
        .unwrap_or(trimmed)
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 45)
            .unwrap()
    }

    fn expect_scheduled(outcome: ParseOutcome) -> Reminder {
        match outcome {
            ParseOutcome::Scheduled(reminder) => reminder,
            other => panic!("expected Scheduled, got {other:?}"),
        }
    }

    #[test]
    fn absolute_twelve_hour_time_parses() {
        let reminder =
            expect_scheduled(parse_reminder("set a reminder to walk the dog at 5:00 pm", noon()));
        assert_eq!(reminder.task, "walk the dog");
        assert_eq!(reminder.hour, 17);
        assert_eq!(reminder.minute, 0);
    }

    #[test]
    fn absolute_twenty_four_hour_time_parses() {
        let reminder = expect_scheduled(parse_reminder("call mom at 17:30", noon()));
        assert_eq!(reminder.task, "call mom");
        assert_eq!(reminder.hour, 17);
        assert_eq!(reminder.minute, 30);
    }

    #[test]
    fn task_prefix_is_only_stripped_when_leading() {
        let reminder = expect_scheduled(parse_reminder("stretch at 9:15 am", noon()));
        assert_eq!(reminder.task, "stretch");
        assert_eq!((reminder.hour, reminder.minute), (9, 15));
    }

    #[test]
    fn first_at_occurrence_splits() {
        let reminder = expect_scheduled(parse_reminder(
            "set a reminder to meet joe in the lobby at 5:00 pm",
            noon(),
        ));
        assert_eq!(reminder.task, "meet joe in the lobby");
        assert_eq!((reminder.hour, reminder.minute), (17, 0));
    }

    #[test]
    fn unreadable_clock_time_is_invalid() {
        let outcome = parse_reminder("set a reminder to call mom at teatime", noon());
        assert!(matches!(outcome, ParseOutcome::Invalid(_)));
    }

    #[test]
    fn relative_minutes_fire_at_capture_time_plus_offset() {
        let reminder =
            expect_scheduled(parse_reminder("set a reminder to hydrate in 10 minutes", noon()));
        assert_eq!(reminder.task, "hydrate");
        // Seconds are truncated: 12:00:45 + 10 min fires in minute 12:10.
        assert_eq!((reminder.hour, reminder.minute), (12, 10));
    }

    #[test]
    fn relative_minutes_cross_the_hour() {
        let reminder = expect_scheduled(parse_reminder("stand up in 75 minutes", noon()));
        assert_eq!((reminder.hour, reminder.minute), (13, 15));
    }

    #[test]
    fn singular_minute_matches() {
        let reminder = expect_scheduled(parse_reminder("stretch in 1 minute", noon()));
        assert_eq!((reminder.hour, reminder.minute), (12, 1));
    }

    #[test]
    fn in_without_minute_word_is_not_scheduling() {
        // "min" does not satisfy the minute pattern; the dispatcher falls
        // through to the conversational fallback.
        assert_eq!(
            parse_reminder("remind me in 10 min", noon()),
            ParseOutcome::NotScheduling
        );
    }

    #[test]
    fn plain_utterance_is_not_scheduling() {
        assert_eq!(
            parse_reminder("tell me a joke", noon()),
            ParseOutcome::NotScheduling
        );
    }

    #[test]
    fn absurd_minute_count_is_invalid_not_a_panic() {
        let outcome = parse_reminder("ping me in 99999999999999999999 minutes", noon());
        assert!(matches!(outcome, ParseOutcome::Invalid(_)));

        let outcome = parse_reminder("ping me in 9223372036854775807 minutes", noon());
        assert!(matches!(outcome, ParseOutcome::Invalid(_)));
    }

    #[test]
    fn is_due_at_matches_fire_minute_only() {
        let reminder = Reminder::new("stretch", 12, 10);
        let due = NaiveTime::from_hms_opt(12, 10, 59).unwrap();
        let early = NaiveTime::from_hms_opt(12, 9, 59).unwrap();
        let late = NaiveTime::from_hms_opt(12, 11, 0).unwrap();
        assert!(reminder.is_due_at(due));
        assert!(!reminder.is_due_at(early));
        assert!(!reminder.is_due_at(late));
    }

    #[test]
    fn display_formats_task_and_time() {
        let reminder = Reminder::new("walk the dog", 17, 5);
        assert_eq!(reminder.to_string(), "walk the dog at 17:05");
    }
}
