use super::event::{EventSource, ParseEvent, TokenizerError};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Decodes the raw text of one scalar into a field of the destination record.
pub type FieldHandler<T> = fn(&mut T, &str);

/// Field name to handler lookup, built once per destination type.
pub struct HandlerTable<T> {
    handlers: HashMap<&'static str, FieldHandler<T>>,
}

impl<T> HandlerTable<T> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(mut self, key: &'static str, handler: FieldHandler<T>) -> Self {
        self.handlers.insert(key, handler);
        self
    }

    pub fn get(&self, key: &str) -> Option<FieldHandler<T>> {
        self.handlers.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for HandlerTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandlerTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort_unstable();
        f.debug_struct("HandlerTable").field("keys", &keys).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Start,
    AcceptingKey,
    AcceptingValue,
    Stopped,
    Failed,
}

impl ReaderState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Start => "waiting for the document mapping",
            Self::AcceptingKey => "expecting a key",
            Self::AcceptingValue => "expecting a scalar value",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Cannot open document '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error("Malformed document: unexpected {event} while {state}{}", key_context(.key))]
    UnexpectedEvent {
        event: ParseEvent,
        state: ReaderState,
        key: Option<String>,
    },
}

fn key_context(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" (key '{}')", k))
        .unwrap_or_default()
}

/// What a completed read did with the key/value pairs it saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub assigned: Vec<String>,
    pub ignored: Vec<String>,
}

/// Streams parse events of a single-level mapping into a destination record.
///
/// The reader knows nothing about the record's schema: every accepted
/// key/value pair is routed through the [`HandlerTable`] it was built with.
/// Keys without a handler are logged and skipped.
#[derive(Debug)]
pub struct EventReader<T> {
    handlers: HandlerTable<T>,
    state: ReaderState,
    pending_key: Option<String>,
    failure: Option<(ParseEvent, ReaderState, Option<String>)>,
    summary: ReadSummary,
}

impl<T> EventReader<T> {
    pub fn new(handlers: HandlerTable<T>) -> Self {
        Self {
            handlers,
            state: ReaderState::Start,
            pending_key: None,
            failure: None,
            summary: ReadSummary::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn summary(&self) -> &ReadSummary {
        &self.summary
    }

    /// Feeds one event through the state machine and returns the new state.
    /// Events arriving after a terminal state are discarded.
    pub fn consume(&mut self, event: ParseEvent, target: &mut T) -> ReaderState {
        trace!(state = ?self.state, %event, "Consuming parse event.");
        self.state = match (self.state, event) {
            (ReaderState::Stopped, _) => ReaderState::Stopped,
            (ReaderState::Failed, _) => ReaderState::Failed,

            (ReaderState::Start, ParseEvent::MappingStart) => ReaderState::AcceptingKey,
            (ReaderState::Start, ParseEvent::StreamEnd) => ReaderState::Stopped,
            (
                ReaderState::Start,
                ParseEvent::StreamStart | ParseEvent::DocumentStart | ParseEvent::DocumentEnd,
            ) => ReaderState::Start,

            (ReaderState::AcceptingKey, ParseEvent::Scalar(key)) => {
                self.pending_key = Some(key);
                ReaderState::AcceptingValue
            }
            (ReaderState::AcceptingKey, ParseEvent::MappingEnd) => ReaderState::Stopped,

            (ReaderState::AcceptingValue, ParseEvent::Scalar(value)) => {
                if let Some(key) = self.pending_key.take() {
                    self.dispatch(key, &value, target);
                }
                ReaderState::AcceptingKey
            }

            (state, event) => {
                let key = self.pending_key.take();
                warn!(%event, %state, "Unexpected parse event; document is not a flat mapping.");
                self.failure = Some((event, state, key));
                ReaderState::Failed
            }
        };
        self.state
    }

    fn dispatch(&mut self, key: String, value: &str, target: &mut T) {
        match self.handlers.get(&key) {
            Some(handler) => {
                debug!(key = %key, "Loading field.");
                handler(target, value);
                self.summary.assigned.push(key);
            }
            None => {
                warn!(key = %key, value = %value, "Ignoring unknown key/value pair.");
                self.summary.ignored.push(key);
            }
        }
    }

    /// Pulls events from `source` until the document ends or breaks.
    ///
    /// On error `target` keeps whatever fields were assigned before the
    /// failure; callers must treat such a partial record as unreliable.
    pub fn read(
        &mut self,
        source: &mut impl EventSource,
        target: &mut T,
    ) -> Result<ReadSummary, ReadError> {
        self.state = ReaderState::Start;
        self.pending_key = None;
        self.failure = None;
        self.summary = ReadSummary::default();

        while !self.state.is_terminal() {
            match source.next_event() {
                Ok(event) => {
                    self.consume(event, target);
                }
                Err(e) => {
                    self.state = ReaderState::Stopped;
                    return Err(e.into());
                }
            }
        }

        if let Some((event, state, key)) = self.failure.take() {
            return Err(ReadError::UnexpectedEvent { event, state, key });
        }
        Ok(self.summary.clone())
    }
}
