//! Transcript Model
//!
//! Append-only conversation messages. A message is never mutated after it is
//! appended; timestamps are monotonically non-decreasing within a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The interviewer/moderator role
    Agent,
    /// The simulated participant
    User,
}

/// Optional annotations attached to a transcript message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    /// Guide question this agent turn asks, when one was matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    /// True when the agent turn is a follow-up probe rather than a main question
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_probe: Option<bool>,
    /// Word count of the message content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Nominal seconds this turn took
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// True when the closing turn was forced by the turn budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_completion: Option<bool>,
}

/// One turn in a simulated interview transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    /// Message author
    pub role: Speaker,
    /// Message text
    pub content: String,
    /// When the turn was appended; non-decreasing within a run
    pub timestamp: DateTime<Utc>,
    /// Annotations
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl ConversationMessage {
    /// Create an interviewer turn.
    pub fn agent(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Speaker::Agent,
            content: content.into(),
            timestamp,
            metadata: MessageMetadata::default(),
        }
    }

    /// Create a participant turn annotated with its word count.
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let content = content.into();
        let word_count = count_words(&content);
        Self {
            role: Speaker::User,
            content,
            timestamp,
            metadata: MessageMetadata {
                word_count: Some(word_count),
                ..MessageMetadata::default()
            },
        }
    }

    /// Attach a matched guide question id.
    pub fn with_question_id(mut self, question_id: impl Into<String>) -> Self {
        self.metadata.question_id = Some(question_id.into());
        self
    }

    /// Mark this agent turn as a probe.
    pub fn as_probe(mut self) -> Self {
        self.metadata.is_probe = Some(true);
        self
    }

    /// Attach a nominal duration in seconds.
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.metadata.duration_seconds = Some(seconds);
        self
    }

    /// Mark the closing turn as forced by the turn budget.
    pub fn forced(mut self) -> Self {
        self.metadata.forced_completion = Some(true);
        self
    }
}

/// Whitespace-separated word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
