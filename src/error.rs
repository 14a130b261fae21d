//! Error types for the assistant.

/// Top-level error type for the voice assistant.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Voice capture error.
    #[error("capture error: {0}")]
    Capture(String),

    /// Speech emission error.
    #[error("speech error: {0}")]
    Speech(String),

    /// Conversational fallback model error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Web search / browser boundary error.
    #[error("search error: {0}")]
    Search(String),

    /// Reminder scheduling error.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AssistantError>;
