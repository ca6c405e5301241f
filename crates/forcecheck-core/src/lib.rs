//! # forcecheck
//!
//! A regression harness for force models inside a molecular simulation engine.
//! A scenario document records how to set the engine up and which forces,
//! stress, and energy it produced when the reference was generated; the
//! harness replays the scenario and checks the engine still agrees within a
//! relative-error tolerance, or records a fresh reference.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless data models, the event-driven
//!   document reader and writer, and the error statistics behind every
//!   comparison.
//!
//! - **[`engine`]: The Collaborator Seam.** The [`engine::Engine`] trait the
//!   harness drives, plus a small deterministic sandbox engine that implements it.
//!
//! - **[`workflows`]: The Public API.** Setup, verification, and generation of
//!   scenarios across execution modes.

pub mod core;
pub mod engine;
pub mod workflows;
