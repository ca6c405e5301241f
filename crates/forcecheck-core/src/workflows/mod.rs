//! # Workflows Module
//!
//! High-level entry points that run one regression scenario against an engine.
//!
//! ## Overview
//!
//! A scenario is replayed in two phases: a zero-step static evaluation right
//! after setup, and a short constant-energy run. Verification compares the
//! forces, stress, and energy of both phases against the reference values in
//! the scenario; generation records them instead.
//!
//! ## Architecture
//!
//! - **Execution Modes** ([`mode`]) - Plain and accelerated modes with their tolerance schedules
//! - **Harness** ([`harness`]) - Setup, verification, generation, and multi-mode runs
//! - **Outcomes** ([`outcome`]) - Skip reasons, per-mode results, and run summaries
//! - **Error Handling** ([`error`]) - Harness errors, including tolerance failures with full reports

pub mod error;
pub mod harness;
pub mod mode;
pub mod outcome;
