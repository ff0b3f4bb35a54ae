//! # churnlens-core
//!
//! **Tier 4 (Façade)**
//!
//! The primary library interface for churnlens. An [`Engine`] owns one
//! repository, its `churnlens.toml` and its frequency cache, and answers
//! frequency and change-analysis requests either as typed calls or through
//! the JSON entry point [`run_json`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use churnlens_core::Engine;
//! use churnlens_types::ChangeFrequencyParams;
//!
//! let engine = Engine::open(".").expect("inside a git repository");
//! let report = engine
//!     .change_frequency(&ChangeFrequencyParams::default())
//!     .expect("history is readable");
//! for hotspot in &report.hotspots {
//!     println!("{} ({} contributors)", hotspot.file_path, hotspot.contributors.len());
//! }
//! ```
//!
//! ## What belongs here
//! * Wiring configuration into analyzers, cache and detectors
//! * Structured, code-tagged errors
//! * The JSON request/response envelope
//! * Tracing subscriber bootstrap
//!
//! ## What does NOT belong here
//! * Analysis logic (use churnlens-frequency / churnlens-change)
//! * Transport or request fan-out

#![forbid(unsafe_code)]

mod engine;
mod error;
pub mod ffi;
pub mod logging;

pub use churnlens_settings as settings;
pub use churnlens_types as types;

pub use engine::{Engine, cache_config, fuzzy_metric, metrics_thresholds, pattern_thresholds};
pub use error::{CoreError, ErrorCode, ResponseEnvelope};
pub use ffi::run_json;
pub use logging::init_tracing;
