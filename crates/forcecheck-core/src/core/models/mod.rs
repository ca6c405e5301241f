//! # Core Models Module
//!
//! Data structures for one regression scenario: the scenario record itself,
//! the observables it stores, and the field handlers that populate it from a
//! scenario document.
//!
//! ## Key Components
//!
//! - [`config`] - The [`config::ScenarioConfig`] record, its defaults, and load/save entry points
//! - [`fields`] - Document keys, lenient scalar decoders, block encoders, and the handler table
//! - [`observables`] - Stress tensors and tag-addressed force tables
//!
//! ## Usage
//!
//! ```ignore
//! use forcecheck::core::models::config::ScenarioConfig;
//!
//! let config = ScenarioConfig::from_path("bond-harmonic.yaml")?;
//! assert_eq!(config.init_forces.len(), config.natoms + 1);
//! ```

pub mod config;
pub mod fields;
pub mod observables;
