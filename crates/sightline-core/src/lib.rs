//! Core types and definitions for sightline.
//!
//! This crate defines the vocabulary shared by the analysis engine and its
//! callers: the parser's input batch, combat events, angle math,
//! configuration, errors, and the per-player report. It performs no
//! analysis and no I/O.

pub mod angles;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod input;
pub mod report;
pub mod types;

pub use error::{AnalysisError, Result};
