//! # Core Module
//!
//! This module provides the reusable building blocks of the harness: the
//! scenario document reader and writer, the scenario data model, and the
//! error statistics used to compare computed observables against a recorded
//! reference.
//!
//! ## Architecture
//!
//! - **Error Statistics** ([`stats`]) - The relative-error metric and running accumulators
//! - **Comparison** ([`compare`]) - Per-observable comparison groups and their reports
//! - **Document I/O** ([`io`]) - Parse events, the event-driven reader, YAML tokenizing, and writing
//! - **Scenario Data** ([`models`]) - Scenario records, observables, and field handlers
//!
//! Nothing in this module talks to an engine; it is pure data and arithmetic.

pub mod compare;
pub mod io;
pub mod models;
pub mod stats;
