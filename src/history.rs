//! Bounded conversation history for the fallback model.

use serde::{Deserialize, Serialize};

/// Non-system turns retained after truncation.
const DEFAULT_MAX_RECENT: usize = 10;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Bounded ordered log of prior exchanges.
///
/// Entry 0 is always the fixed system turn. After every append the log is
/// truncated to the system turn plus the most recent `max_recent` turns,
/// bounding the context sent to the conversational model. Older turns are
/// discarded silently.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: Vec<ChatTurn>,
    max_recent: usize,
}

impl ConversationHistory {
    /// Create a history seeded with the system turn and the default bound.
    #[must_use]
    pub fn new(system_prompt: &str) -> Self {
        Self::with_limit(system_prompt, DEFAULT_MAX_RECENT)
    }

    /// Create a history retaining at most `max_recent` non-system turns.
    #[must_use]
    pub fn with_limit(system_prompt: &str, max_recent: usize) -> Self {
        Self {
            turns: vec![ChatTurn::system(system_prompt)],
            max_recent,
        }
    }

    /// Append a turn, truncating if the bound is exceeded.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
        self.truncate();
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.append(ChatTurn::user(content));
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.append(ChatTurn::assistant(content));
    }

    /// All turns in order, system turn first.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn truncate(&mut self) {
        let cap = 1 + self.max_recent;
        if self.turns.len() > cap {
            let keep_from = self.turns.len() - self.max_recent;
            self.turns.drain(1..keep_from);
        }
    }
}
