//! Provides reading and writing of scenario documents.
//!
//! Reading is split in two: a tokenizer ([`yaml`]) produces a flat stream of
//! [`event::ParseEvent`]s, and a schema-agnostic state machine ([`reader`])
//! dispatches the key/value pairs it accepts to registered field handlers.
//! Writing goes through [`writer::DocumentWriter`].

pub mod event;
pub mod reader;
pub mod writer;
pub mod yaml;
