use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// A single low-level event produced by a document tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
    Scalar(String),
}

impl fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamStart => write!(f, "stream-start"),
            Self::StreamEnd => write!(f, "stream-end"),
            Self::DocumentStart => write!(f, "document-start"),
            Self::DocumentEnd => write!(f, "document-end"),
            Self::MappingStart => write!(f, "mapping-start"),
            Self::MappingEnd => write!(f, "mapping-end"),
            Self::SequenceStart => write!(f, "sequence-start"),
            Self::SequenceEnd => write!(f, "sequence-end"),
            Self::Scalar(text) => write!(f, "scalar({:?})", text),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Tokenizer error: {message}")]
pub struct TokenizerError {
    pub message: String,
}

impl TokenizerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A pull-based source of parse events.
///
/// Implementors hand out one event per call. Once the stream is exhausted
/// they keep returning [`ParseEvent::StreamEnd`].
pub trait EventSource {
    fn next_event(&mut self) -> Result<ParseEvent, TokenizerError>;
}

/// An in-memory event source over an already tokenized stream.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<ParseEvent>,
}

impl EventQueue {
    pub fn new(events: impl IntoIterator<Item = ParseEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for EventQueue {
    fn next_event(&mut self) -> Result<ParseEvent, TokenizerError> {
        Ok(self.events.pop_front().unwrap_or(ParseEvent::StreamEnd))
    }
}

impl FromIterator<ParseEvent> for EventQueue {
    fn from_iter<I: IntoIterator<Item = ParseEvent>>(iter: I) -> Self {
        Self::new(iter)
    }
}
